use app::sync::{sync, SyncParams};

pub async fn sync_cmd(
    source: String, destination: String, delete: bool, log_results: bool,
) -> utils::error::Result<()> {
    if delete {
        println!("Extraneous files in the destination will be deleted.");
    }

    let params = SyncParams {
        source,
        destination,
        delete,
        log: log_results,
    };

    log::info!("Syncing '{}' -> '{}'", params.source, params.destination);
    sync(params).await?;

    Ok(())
}
