use serde::Serialize;
use std::fmt;
use std::path::Path;

/// Outcome of one sync pass.
///
/// Appended to while the pass runs, read-only afterwards. Paths are
/// relative to the destination root.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncSummary {
    pub added_folders: Vec<String>,
    pub added_files: Vec<String>,
    pub deleted_folders: Vec<String>,
    pub deleted_files: Vec<String>,
    /// Entries that could not be copied or deleted; never counted as
    /// successes.
    pub failures: Vec<SyncFailure>,
    pub deletion_enabled: bool,
    pub total_time: String,
}

/// A per-entry failure the pass skipped over.
#[derive(Debug, Clone, Serialize)]
pub struct SyncFailure {
    pub path: String,
    pub reason: String,
}

impl SyncSummary {
    pub fn new(deletion_enabled: bool) -> Self {
        Self {
            deletion_enabled,
            ..Default::default()
        }
    }

    pub fn record_added_folder(&mut self, path: &Path) {
        self.added_folders.push(path.display().to_string());
    }

    pub fn record_added_file(&mut self, path: &Path) {
        self.added_files.push(path.display().to_string());
    }

    pub fn record_deleted_folder(&mut self, path: &Path) {
        self.deleted_folders.push(path.display().to_string());
    }

    pub fn record_deleted_file(&mut self, path: &Path) {
        self.deleted_files.push(path.display().to_string());
    }

    pub fn record_failure(&mut self, failure: SyncFailure) {
        self.failures.push(failure);
    }

    pub fn has_deletions(&self) -> bool {
        !self.deleted_folders.is_empty() || !self.deleted_files.is_empty()
    }
}

impl fmt::Display for SyncSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Synchronization complete")?;
        write!(
            f,
            "\tAdded Folders: {},\tFiles: {}",
            self.added_folders.len(),
            self.added_files.len()
        )?;
        if self.deletion_enabled {
            write!(
                f,
                "\n\tDeleted Folders: {},\tFiles: {}",
                self.deleted_folders.len(),
                self.deleted_files.len()
            )?;
        }
        if !self.failures.is_empty() {
            write!(f, "\n\tFailed: {}", self.failures.len())?;
        }
        if !self.total_time.is_empty() {
            write!(f, "\n\tTotal time: {}", self.total_time)?;
        }
        Ok(())
    }
}
