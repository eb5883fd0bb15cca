use serde::{Deserialize, Serialize};
use utils::app_config::AppConfig;

/// Consumer configuration for one sync pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsumerConfig {
    /// Console progress bar and per-action lines.
    pub enable_console_consumer: bool,
    /// `log.txt` summary written into the destination root.
    pub enable_log_consumer: bool,
    /// Broadcast channel capacity.
    pub channel_capacity: usize,
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            enable_console_consumer: true,
            enable_log_consumer: false,
            channel_capacity: 10000,
        }
    }
}

impl ConsumerConfig {
    /// Configuration for a run: console always on, log file per the
    /// `--log` flag, channel capacity from the application configuration
    /// when one is loaded.
    pub fn for_run(log_enabled: bool) -> Self {
        let channel_capacity = AppConfig::get::<usize>("sync.channel_capacity")
            .unwrap_or_else(|_| ConsumerConfig::default().channel_capacity);

        Self {
            enable_console_consumer: true,
            enable_log_consumer: log_enabled,
            channel_capacity,
        }
    }

    /// Log file only; used by tests that assert on the written log.
    pub fn log_only() -> Self {
        Self {
            enable_console_consumer: false,
            enable_log_consumer: true,
            ..Default::default()
        }
    }
}
