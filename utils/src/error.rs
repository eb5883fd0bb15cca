use std::error::Error as StdError;
use std::sync::PoisonError;

pub type Result<T> = std::result::Result<T, Error>;

/// Error type shared by every crate in the workspace.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Invalid sync roots. Fatal; raised before any filesystem work.
    #[error("{0}")]
    Validation(String),

    /// A path vanished between being listed and being acted on.
    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Logger(#[from] log::SetLoggerError),

    #[error("{message}")]
    WithSource {
        message: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    #[error("{0}")]
    Message(String),
}

impl Error {
    pub fn new(message: &str) -> Self {
        Error::Message(message.to_string())
    }

    pub fn with_source(message: &str, source: Box<dyn StdError + Send + Sync>) -> Self {
        Error::WithSource {
            message: message.to_string(),
            source,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Error::NotFound(message.into())
    }
}

impl<T> From<PoisonError<T>> for Error {
    fn from(_: PoisonError<T>) -> Self {
        Error::Message("configuration lock poisoned".to_string())
    }
}
