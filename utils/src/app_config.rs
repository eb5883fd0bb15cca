use std::path::Path;
use std::sync::RwLock;

use config::{Config, Environment, File, FileFormat};
use lazy_static::lazy_static;
use serde::Deserialize;

use super::error::Result;

lazy_static! {
    // Global configuration store, written once at startup.
    pub static ref CONFIG: RwLock<Config> = RwLock::new(Config::default());
}

/// Logging section.
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    pub level: String,
}

/// Sync engine section.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    pub channel_capacity: usize,
}

/// Typed view of the full configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub debug: bool,
    pub log: LogConfig,
    pub sync: SyncConfig,
}

impl AppConfig {
    /// Initialize the store from the embedded defaults, then let `APP_*`
    /// environment variables override them.
    pub fn init(default_config: Option<&str>) -> Result<()> {
        let mut builder = Config::builder();

        // Embedded into the executable via include_str! at the call site.
        if let Some(config_contents) = default_config {
            builder = builder.add_source(File::from_str(config_contents, FileFormat::Toml));
        }

        let settings = builder
            .add_source(Environment::with_prefix("APP"))
            .build()?;

        {
            let mut w = CONFIG.write()?;
            *w = settings;
        }

        Ok(())
    }

    /// Merge an external configuration file over the store.
    pub fn merge_config(config_file: Option<&Path>) -> Result<()> {
        if let Some(config_file_path) = config_file {
            let mut w = CONFIG.write()?;
            let settings = Config::builder()
                .add_source(w.clone())
                .add_source(File::with_name(config_file_path.to_str().unwrap_or("")))
                .build()?;
            *w = settings;
        }

        Ok(())
    }

    /// Override a single key.
    pub fn set(key: &str, value: &str) -> Result<()> {
        let mut w = CONFIG.write()?;
        let settings = Config::builder()
            .add_source(w.clone())
            .set_override(key, value)?
            .build()?;
        *w = settings;

        Ok(())
    }

    /// Get a single value.
    pub fn get<'de, T>(key: &'de str) -> Result<T>
    where
        T: serde::Deserialize<'de>,
    {
        Ok(CONFIG.read()?.get::<T>(key)?)
    }

    /// Deserialize the whole store into an `AppConfig`. Fetch again after
    /// changing the configuration.
    pub fn fetch() -> Result<AppConfig> {
        let r = CONFIG.read()?;

        Ok(r.clone().try_deserialize()?)
    }
}
