use std::path::{Path, PathBuf};
use std::time::Instant;

use storage::{LocalStorage, StorageEntry};
use tokio::sync::broadcast;
use utils::error::{Error, Result};

use crate::consumer::config::ConsumerConfig;
use crate::consumer::ConsumerManager;
use crate::sync::{
    classify_for_copy, classify_for_deletion, SyncAction, SyncDecision, SyncFailure, SyncMessage,
    SyncParams, SyncPhase, SyncSummary,
};

/// Run one full sync pass and report it through the configured consumers.
///
/// Per-entry I/O failures do not abort the pass: the entry is recorded in
/// the summary's failure list and the pass continues. Only invalid roots
/// (and a root vanishing mid-pass) end the run early.
pub async fn sync(params: SyncParams) -> Result<SyncSummary> {
    log::info!("Starting sync with params: {:?}", params);

    let (source, destination) = validate_roots(&params).await?;

    let config = ConsumerConfig::for_run(params.log);
    let mut manager = ConsumerManager::with_config(&config, Path::new(&params.destination));
    let handles = manager.start_consumers().await?;
    let broadcaster = manager.get_broadcaster();

    let summary = run_pass(&params, &source, &destination, &broadcaster).await?;

    let _ = broadcaster.send(SyncMessage::Complete(summary.clone()));
    for handle in handles {
        match handle.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => log::warn!("Consumer exited with error: {}", e),
            Err(e) => log::warn!("Consumer task failed: {}", e),
        }
    }

    log::info!(
        "Sync completed: {} folders and {} files added, {} folders and {} files deleted, {} failures",
        summary.added_folders.len(),
        summary.added_files.len(),
        summary.deleted_folders.len(),
        summary.deleted_files.len(),
        summary.failures.len()
    );

    Ok(summary)
}

/// Check the roots before any filesystem work. The source must exist, the
/// two paths (compared as given, not canonicalized) must differ, and a
/// missing destination is created together with its ancestors.
pub async fn validate_roots(params: &SyncParams) -> Result<(LocalStorage, LocalStorage)> {
    let source = LocalStorage::new(params.source.clone());
    let destination = LocalStorage::new(params.destination.clone());

    if !source.root_exists().await? {
        return Err(Error::validation(format!(
            "Source directory '{}' does not exist",
            params.source
        )));
    }
    if params.source == params.destination {
        return Err(Error::validation(
            "Source and destination directories shall be different",
        ));
    }
    if !destination.root_exists().await? {
        destination.create_root().await?;
        log::info!("Destination directory '{}' created", params.destination);
    }

    Ok((source, destination))
}

async fn run_pass(
    params: &SyncParams, source: &LocalStorage, destination: &LocalStorage,
    broadcaster: &broadcast::Sender<SyncMessage>,
) -> Result<SyncSummary> {
    let started = Instant::now();
    let mut summary = SyncSummary::new(params.delete);

    copy_phase(source, destination, broadcaster, &mut summary).await?;
    if params.delete {
        delete_phase(source, destination, broadcaster, &mut summary).await?;
    }

    summary.total_time = format!("{:.2}s", started.elapsed().as_secs_f64());
    Ok(summary)
}

/// Mirror every source entry into the destination, in enumeration order.
/// Missing ancestor directories are created on demand at copy time, so no
/// ordering of the enumeration is assumed.
async fn copy_phase(
    source: &LocalStorage, destination: &LocalStorage,
    broadcaster: &broadcast::Sender<SyncMessage>, summary: &mut SyncSummary,
) -> Result<()> {
    let entries = collect_entries(source).await?;
    let _ = broadcaster.send(SyncMessage::Phase {
        phase: SyncPhase::Copy,
        total: entries.len(),
    });

    for entry in &entries {
        let relative = entry.relative_path.as_path();

        match classify_for_copy(entry, destination).await {
            Ok(SyncDecision::CreateDirectory) => {
                match destination.create_dir_all(relative).await {
                    Ok(()) => {
                        summary.record_added_folder(relative);
                        notify(
                            broadcaster,
                            SyncDecision::CreateDirectory,
                            None,
                            destination.full_path(relative),
                        );
                    }
                    Err(e) => record_failure(summary, broadcaster, relative, &e),
                }
            }
            Ok(SyncDecision::CopyFile) => match copy_entry(source, destination, relative).await {
                Ok(()) => {
                    summary.record_added_file(relative);
                    notify(
                        broadcaster,
                        SyncDecision::CopyFile,
                        Some(source.full_path(relative)),
                        destination.full_path(relative),
                    );
                }
                Err(e) => record_failure(summary, broadcaster, relative, &e),
            },
            Ok(_) => {
                notify(
                    broadcaster,
                    SyncDecision::Skip,
                    None,
                    destination.full_path(relative),
                );
            }
            Err(e) => record_failure(summary, broadcaster, relative, &e),
        }
    }

    Ok(())
}

/// Remove destination entries with no source counterpart. A directory is
/// removed with its whole subtree; its children, already gone when their
/// turn comes, are skipped without being counted or reported.
async fn delete_phase(
    source: &LocalStorage, destination: &LocalStorage,
    broadcaster: &broadcast::Sender<SyncMessage>, summary: &mut SyncSummary,
) -> Result<()> {
    let entries = collect_entries(destination).await?;
    let _ = broadcaster.send(SyncMessage::Phase {
        phase: SyncPhase::Delete,
        total: entries.len(),
    });

    for entry in &entries {
        let relative = entry.relative_path.as_path();

        // Existence is re-checked immediately before acting.
        match destination.exists(relative).await {
            Ok(true) => {}
            Ok(false) => {
                notify(
                    broadcaster,
                    SyncDecision::Skip,
                    None,
                    destination.full_path(relative),
                );
                continue;
            }
            Err(e) => {
                record_failure(summary, broadcaster, relative, &e);
                continue;
            }
        }

        match classify_for_deletion(entry, source).await {
            Ok(decision @ (SyncDecision::DeleteFile | SyncDecision::DeleteDirectory)) => {
                match destination.delete(relative).await {
                    Ok(()) => {
                        if decision == SyncDecision::DeleteDirectory {
                            summary.record_deleted_folder(relative);
                        } else {
                            summary.record_deleted_file(relative);
                        }
                        notify(broadcaster, decision, None, destination.full_path(relative));
                    }
                    Err(e) => record_failure(summary, broadcaster, relative, &e),
                }
            }
            Ok(_) => {
                notify(
                    broadcaster,
                    SyncDecision::Skip,
                    None,
                    destination.full_path(relative),
                );
            }
            Err(e) => record_failure(summary, broadcaster, relative, &e),
        }
    }

    Ok(())
}

/// Drain one traversal into a list the pass iterates over.
async fn collect_entries(storage: &LocalStorage) -> Result<Vec<StorageEntry>> {
    let mut rx = storage.walkdir().await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::not_found(format!(
                "Directory '{}' vanished before it could be walked",
                storage.get_root()
            ))
        } else {
            Error::Io(e)
        }
    })?;
    let mut entries = Vec::new();
    while let Some(entry) = rx.recv().await {
        entries.push(entry);
    }
    Ok(entries)
}

async fn copy_entry(
    source: &LocalStorage, destination: &LocalStorage, relative: &Path,
) -> std::io::Result<()> {
    let object = source.head(relative).await?;
    destination.copy(&object, relative).await
}

fn notify(
    broadcaster: &broadcast::Sender<SyncMessage>, decision: SyncDecision,
    source: Option<PathBuf>, target: PathBuf,
) {
    let _ = broadcaster.send(SyncMessage::Action(SyncAction {
        decision,
        source,
        target,
    }));
}

fn record_failure(
    summary: &mut SyncSummary, broadcaster: &broadcast::Sender<SyncMessage>, path: &Path,
    reason: &dyn std::fmt::Display,
) {
    let failure = SyncFailure {
        path: path.display().to_string(),
        reason: reason.to_string(),
    };
    log::warn!("Skipping '{}': {}", failure.path, failure.reason);
    summary.record_failure(failure.clone());
    let _ = broadcaster.send(SyncMessage::Failure(failure));
}
