use serde::{Deserialize, Serialize};
use std::path::PathBuf;

mod classify;
mod engine;
mod summary;


pub use classify::{classify_for_copy, classify_for_deletion, SyncDecision};
pub use engine::{sync, validate_roots};
pub use summary::{SyncFailure, SyncSummary};

/// Sync parameters from the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncParams {
    /// Directory to mirror from.
    pub source: String,

    /// Directory to mirror into.
    pub destination: String,

    /// Remove destination entries that have no source counterpart.
    pub delete: bool,

    /// Write a summary log file into the destination root.
    pub log: bool,
}

impl Default for SyncParams {
    fn default() -> Self {
        Self {
            source: String::from("."),
            destination: String::from("."),
            delete: false,
            log: false,
        }
    }
}

/// Phase of a sync pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Copy,
    Delete,
}

/// One executed (or skipped) decision, broadcast for reporting.
#[derive(Debug, Clone)]
pub struct SyncAction {
    pub decision: SyncDecision,
    /// Full source path, for copy actions.
    pub source: Option<PathBuf>,
    /// Full destination path the decision applied to.
    pub target: PathBuf,
}

/// Messages broadcast to the consumers during a pass.
#[derive(Debug, Clone)]
pub enum SyncMessage {
    /// A phase is starting; `total` entries will be examined.
    Phase { phase: SyncPhase, total: usize },
    Action(SyncAction),
    Failure(SyncFailure),
    Complete(SyncSummary),
}
