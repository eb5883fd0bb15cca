use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::SystemTime;

/// Kind of a filesystem entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    File,
    Directory,
}

/// A file or directory listed relative to the walked root.
///
/// Snapshot taken at traversal time; the filesystem may have moved on since.
#[derive(Debug, Clone)]
pub struct StorageEntry {
    /// Final path component.
    pub name: String,
    /// Path relative to the walked root.
    pub relative_path: PathBuf,
    pub kind: EntryKind,
    /// Size in bytes as reported by the filesystem.
    pub size: u64,
    /// Last modification time.
    pub modified: SystemTime,
}

impl StorageEntry {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}
