use std::path::PathBuf;

use tokio::sync::broadcast;
use utils::error::Result;

use crate::consumer::Consumer;
use crate::sync::{SyncMessage, SyncSummary};

/// Log file consumer: writes the pass summary to `log.txt` in the
/// destination root, overwriting the previous run's file.
pub struct LogFileConsumer {
    path: PathBuf,
}

impl LogFileConsumer {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Render the summary in the log file format. Section blocks are
    /// omitted entirely when their list is empty.
    fn render(summary: &SyncSummary) -> String {
        let mut out = String::new();
        let log_time = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S");

        out.push_str(&format!("Syncronization log  {} \n", log_time));
        out.push_str(&format!(
            "Added Folders: {},  Files: {}\n",
            summary.added_folders.len(),
            summary.added_files.len()
        ));
        if summary.has_deletions() {
            out.push_str(&format!(
                "Deleted Folders: {},  Files: {}\n",
                summary.deleted_folders.len(),
                summary.deleted_files.len()
            ));
        }
        if !summary.failures.is_empty() {
            out.push_str(&format!("Failed Entries: {}\n", summary.failures.len()));
        }

        if !summary.added_folders.is_empty() {
            out.push_str("\n    ------Added Folders------    \n");
            for folder in &summary.added_folders {
                out.push_str(folder);
                out.push('\n');
            }
        }
        if !summary.added_files.is_empty() {
            out.push_str("\n    ------Added Files------    \n");
            for file in &summary.added_files {
                out.push_str(file);
                out.push('\n');
            }
        }
        if !summary.deleted_folders.is_empty() {
            out.push_str("\n    ------Deleted Folders------    \n");
            for folder in &summary.deleted_folders {
                out.push_str(folder);
                out.push('\n');
            }
        }
        if !summary.deleted_files.is_empty() {
            out.push_str("\n    ------Deleted Files------    \n");
            for file in &summary.deleted_files {
                out.push_str(file);
                out.push('\n');
            }
        }
        if !summary.failures.is_empty() {
            out.push_str("\n    ------Failures------    \n");
            for failure in &summary.failures {
                out.push_str(&format!("{}: {}\n", failure.path, failure.reason));
            }
        }

        out
    }
}

#[async_trait::async_trait]
impl Consumer for LogFileConsumer {
    async fn start(
        &mut self, mut receiver: broadcast::Receiver<SyncMessage>,
    ) -> Result<tokio::task::JoinHandle<Result<()>>> {
        let path = self.path.clone();

        let handle = tokio::spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(SyncMessage::Complete(summary)) => {
                        let contents = LogFileConsumer::render(&summary);
                        tokio::fs::write(&path, contents).await.map_err(|e| {
                            utils::error::Error::with_source(
                                "Failed to write log file",
                                Box::new(e),
                            )
                        })?;
                        log::info!("Sync log written to '{}'", path.display());
                        break;
                    }
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Closed) => {
                        log::warn!("[LogFileConsumer] Channel closed");
                        break;
                    }
                    Err(broadcast::error::RecvError::Lagged(_)) => {
                        log::warn!("[LogFileConsumer] Channel lagged, skipping messages");
                        continue;
                    }
                }
            }
            Ok(())
        });

        Ok(handle)
    }

    fn name(&self) -> &'static str {
        "log_file_consumer"
    }
}
