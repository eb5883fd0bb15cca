use clap::Parser;

mod commands;

#[derive(Parser)]
#[command(name = "rust-dirsync")]
#[command(version, about = "Synchronize files between two directories.", long_about = None)]
pub struct Cli {
    /// The source directory to synchronize from.
    pub source_directory: String,

    /// The destination directory to synchronize to.
    pub destination_directory: String,

    /// Delete files and folders in destination that are not in source.
    #[arg(short, long)]
    pub delete: bool,

    /// Log results in the destination folder.
    #[arg(short, long)]
    pub log: bool,
}

pub async fn cli_match() -> utils::error::Result<()> {
    let cli = Cli::parse();

    commands::sync_cmd(
        cli.source_directory,
        cli.destination_directory,
        cli.delete,
        cli.log,
    )
    .await?;

    Ok(())
}
