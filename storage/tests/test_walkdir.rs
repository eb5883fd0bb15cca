use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use storage::{EntryKind, LocalStorage, StorageEntry};
use tempfile::tempdir;

async fn collect(storage: &LocalStorage) -> io::Result<Vec<StorageEntry>> {
    let mut rx = storage.walkdir().await?;
    let mut entries = Vec::new();
    while let Some(entry) = rx.recv().await {
        entries.push(entry);
    }
    Ok(entries)
}

#[tokio::test]
async fn test_walkdir_lists_relative_entries() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path();

    fs::create_dir_all(root.join("dir1")).unwrap();
    fs::create_dir_all(root.join("dir2")).unwrap();
    fs::write(root.join("file1.txt"), "content1").unwrap();
    fs::write(root.join("dir1").join("file2.txt"), "content2").unwrap();

    let storage = LocalStorage::new(root.to_string_lossy().into_owned());
    let entries = collect(&storage).await.unwrap();

    let by_path: BTreeMap<PathBuf, EntryKind> = entries
        .iter()
        .map(|e| (e.relative_path.clone(), e.kind))
        .collect();

    assert_eq!(entries.len(), 4);
    assert_eq!(by_path.get(&PathBuf::from("dir1")), Some(&EntryKind::Directory));
    assert_eq!(by_path.get(&PathBuf::from("dir2")), Some(&EntryKind::Directory));
    assert_eq!(by_path.get(&PathBuf::from("file1.txt")), Some(&EntryKind::File));
    assert_eq!(
        by_path.get(&PathBuf::from("dir1/file2.txt")),
        Some(&EntryKind::File)
    );
}

#[tokio::test]
async fn test_walkdir_does_not_list_the_root() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path();
    fs::write(root.join("file.txt"), "content").unwrap();

    let storage = LocalStorage::new(root.to_string_lossy().into_owned());
    let entries = collect(&storage).await.unwrap();

    assert!(entries.iter().all(|e| !e.relative_path.as_os_str().is_empty()));
    assert_eq!(entries.len(), 1);
}

#[tokio::test]
async fn test_walkdir_reports_size_and_mtime() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path();
    fs::write(root.join("file.txt"), "12345").unwrap();

    let storage = LocalStorage::new(root.to_string_lossy().into_owned());
    let entries = collect(&storage).await.unwrap();
    let entry = &entries[0];

    let metadata = fs::metadata(root.join("file.txt")).unwrap();
    assert_eq!(entry.size, 5);
    assert_eq!(entry.modified, metadata.modified().unwrap());
    assert!(!entry.is_dir());
    assert_eq!(entry.name, "file.txt");
}

#[tokio::test]
async fn test_walkdir_fails_on_missing_root() {
    let temp_dir = tempdir().unwrap();
    let missing = temp_dir.path().join("missing");

    let storage = LocalStorage::new(missing.to_string_lossy().into_owned());
    let result = storage.walkdir().await;

    assert!(result.is_err());
    assert_eq!(result.err().unwrap().kind(), io::ErrorKind::NotFound);
}

#[tokio::test]
async fn test_walkdir_is_restartable() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path();
    fs::write(root.join("a.txt"), "a").unwrap();

    let storage = LocalStorage::new(root.to_string_lossy().into_owned());
    let first = collect(&storage).await.unwrap();

    // A second walk reflects the current state of the tree
    fs::write(root.join("b.txt"), "b").unwrap();
    let second = collect(&storage).await.unwrap();

    assert_eq!(first.len(), 1);
    assert_eq!(second.len(), 2);
}
