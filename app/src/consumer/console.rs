use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::broadcast;
use utils::error::Result;

use crate::consumer::Consumer;
use crate::sync::{SyncDecision, SyncMessage, SyncPhase};

/// Console consumer: progress bar per examined entry, one line per
/// copy/delete action, and the final summary.
pub struct ConsoleConsumer;

#[async_trait::async_trait]
impl Consumer for ConsoleConsumer {
    async fn start(
        &mut self, mut receiver: broadcast::Receiver<SyncMessage>,
    ) -> Result<tokio::task::JoinHandle<Result<()>>> {
        let handle = tokio::spawn(async move {
            // The bar draws on stderr; action lines go to stdout.
            let mut progress: Option<ProgressBar> = None;

            loop {
                match receiver.recv().await {
                    Ok(SyncMessage::Phase { phase, total }) => {
                        if let Some(bar) = progress.take() {
                            bar.finish_and_clear();
                        }
                        let bar = ProgressBar::new(total as u64);
                        bar.set_style(
                            ProgressStyle::with_template("{msg} [{wide_bar}] {pos}/{len}")
                                .unwrap_or_else(|_| ProgressStyle::default_bar()),
                        );
                        bar.set_message(match phase {
                            SyncPhase::Copy => "Syncing files",
                            SyncPhase::Delete => "Deleting files",
                        });
                        progress = Some(bar);
                    }
                    Ok(SyncMessage::Action(action)) => {
                        match (action.decision, &action.source) {
                            (SyncDecision::CopyFile, Some(source)) => {
                                println!(
                                    "Copying {} to {}",
                                    source.display(),
                                    action.target.display()
                                );
                            }
                            (SyncDecision::DeleteFile | SyncDecision::DeleteDirectory, _) => {
                                println!("Deleting {}", action.target.display());
                            }
                            _ => {}
                        }
                        if let Some(bar) = &progress {
                            bar.inc(1);
                        }
                    }
                    Ok(SyncMessage::Failure(failure)) => {
                        eprintln!("Failed '{}': {}", failure.path, failure.reason);
                        if let Some(bar) = &progress {
                            bar.inc(1);
                        }
                    }
                    Ok(SyncMessage::Complete(summary)) => {
                        if let Some(bar) = progress.take() {
                            bar.finish_and_clear();
                        }
                        println!("\n{}", summary);
                        break;
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        log::warn!("[ConsoleConsumer] Channel closed");
                        break;
                    }
                    Err(broadcast::error::RecvError::Lagged(_)) => {
                        log::warn!("[ConsoleConsumer] Channel lagged, skipping messages");
                        continue;
                    }
                }
            }
            Ok(())
        });

        Ok(handle)
    }

    fn name(&self) -> &'static str {
        "console_consumer"
    }
}
