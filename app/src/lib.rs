pub mod consumer;
pub mod sync;

/// Common exports for downstream crates.
pub mod prelude {
    pub use crate::consumer::config::ConsumerConfig;
    pub use crate::consumer::ConsoleConsumer;
    pub use crate::consumer::Consumer;
    pub use crate::consumer::ConsumerManager;
    pub use crate::consumer::LogFileConsumer;
    pub use crate::sync::SyncMessage;
}
