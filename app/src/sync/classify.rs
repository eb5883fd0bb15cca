use storage::{EntryKind, LocalStorage, StorageEntry};
use utils::error::Result;

/// Decision for a single entry within one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncDecision {
    CreateDirectory,
    CopyFile,
    Skip,
    DeleteFile,
    DeleteDirectory,
}

/// Decide how to bring the destination side of a source entry up to date.
///
/// Existing files are compared shallowly: equal size and modification time
/// mean equal, bytes are never read. A path that exists under the same name
/// with the opposite kind is classified by presence alone; the mismatch
/// surfaces at the I/O layer.
pub async fn classify_for_copy(
    entry: &StorageEntry, destination: &LocalStorage,
) -> Result<SyncDecision> {
    let present = destination.exists(&entry.relative_path).await?;

    match entry.kind {
        EntryKind::Directory if !present => Ok(SyncDecision::CreateDirectory),
        EntryKind::Directory => Ok(SyncDecision::Skip),
        EntryKind::File if !present => Ok(SyncDecision::CopyFile),
        EntryKind::File => {
            if shallow_equal(entry, destination).await? {
                Ok(SyncDecision::Skip)
            } else {
                Ok(SyncDecision::CopyFile)
            }
        }
    }
}

/// Decide whether a destination entry is orphaned. Only invoked when
/// deletion mode is enabled.
pub async fn classify_for_deletion(
    entry: &StorageEntry, source: &LocalStorage,
) -> Result<SyncDecision> {
    if source.exists(&entry.relative_path).await? {
        return Ok(SyncDecision::Skip);
    }

    match entry.kind {
        EntryKind::Directory => Ok(SyncDecision::DeleteDirectory),
        EntryKind::File => Ok(SyncDecision::DeleteFile),
    }
}

async fn shallow_equal(entry: &StorageEntry, destination: &LocalStorage) -> Result<bool> {
    let existing = destination.head(&entry.relative_path).await?;
    Ok(existing.size() == entry.size && existing.mtime() == entry.modified)
}
