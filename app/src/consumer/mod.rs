use std::path::Path;

use tokio::sync::broadcast;
use utils::error::Result;

use crate::consumer::config::ConsumerConfig;
use crate::sync::SyncMessage;

pub mod config;

mod console;
mod log;

pub use console::ConsoleConsumer;
pub use self::log::LogFileConsumer;

/// Fan-out of sync pass events to the configured consumers.
pub struct ConsumerManager {
    /// Broadcast sender the engine publishes to
    broadcaster: broadcast::Sender<SyncMessage>,
    /// Consumer list
    consumers: Vec<Box<dyn Consumer>>,
}

impl ConsumerManager {
    /// Build the consumer set for one pass against `destination`.
    pub fn with_config(config: &ConsumerConfig, destination: &Path) -> Self {
        let (broadcaster, _) = broadcast::channel(config.channel_capacity);
        let mut manager = Self {
            broadcaster,
            consumers: Vec::new(),
        };

        if config.enable_console_consumer {
            manager.add_consumer(Box::new(ConsoleConsumer));
        }
        if config.enable_log_consumer {
            manager.add_consumer(Box::new(LogFileConsumer::new(destination.join("log.txt"))));
        }

        manager
    }

    pub fn add_consumer(&mut self, consumer: Box<dyn Consumer>) {
        self.consumers.push(consumer);
    }

    /// Start all consumers, each on its own task with its own receiver.
    pub async fn start_consumers(&mut self) -> Result<Vec<tokio::task::JoinHandle<Result<()>>>> {
        let mut handles = Vec::new();

        for consumer in &mut self.consumers {
            let receiver = self.broadcaster.subscribe();
            let consumer_handle = consumer.start(receiver).await?;
            handles.push(consumer_handle);
        }

        Ok(handles)
    }

    pub fn get_broadcaster(&self) -> broadcast::Sender<SyncMessage> {
        self.broadcaster.clone()
    }

    pub fn get_consumer_count(&self) -> usize {
        self.consumers.len()
    }

    pub fn broadcast(&self, message: SyncMessage) -> Result<()> {
        self.broadcaster.send(message).map_err(|e| {
            utils::error::Error::with_source("Failed to broadcast message", Box::new(e))
        })?;
        Ok(())
    }
}

/// Consumer interface. Consumers observe the pass; they never mutate
/// either tree.
#[async_trait::async_trait]
pub trait Consumer: Send + Sync {
    /// Start consuming; returns the join handle of the consumer task.
    async fn start(
        &mut self, receiver: broadcast::Receiver<SyncMessage>,
    ) -> Result<tokio::task::JoinHandle<Result<()>>>;

    /// Consumer name.
    fn name(&self) -> &'static str;
}
