use std::fs::Metadata;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use filetime::FileTime;
use tokio::fs as tokio_fs;
use tokio::sync::mpsc;
use walkdir::WalkDir;

use crate::common::{EntryKind, StorageEntry};

const CHANNEL_CAPACITY: usize = 1000;

/// Local storage rooted at one directory.
pub struct LocalStorage {
    root: String,
}

/// File metadata snapshot used for shallow comparison and copying.
#[derive(Clone)]
pub struct FileObject {
    info: Metadata,
    path: PathBuf,
    name: String,
}

impl FileObject {
    /// Get file name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get file size
    pub fn size(&self) -> u64 {
        self.info.len()
    }

    /// Get modification time
    pub fn mtime(&self) -> SystemTime {
        self.info.modified().unwrap_or(SystemTime::UNIX_EPOCH)
    }

    /// Get access time, falling back to the modification time
    pub fn atime(&self) -> SystemTime {
        self.info.accessed().unwrap_or_else(|_| self.mtime())
    }

    /// Check if it's a directory
    pub fn is_dir(&self) -> bool {
        self.info.is_dir()
    }

    /// Get full file system path
    pub fn full_path(&self) -> PathBuf {
        self.path.clone()
    }
}

impl LocalStorage {
    /// Create new local storage instance
    pub fn new(root: String) -> Self {
        Self { root }
    }

    pub fn get_root(&self) -> &str {
        &self.root
    }

    /// Get full path for a root-relative path
    pub fn full_path(&self, relative: &Path) -> PathBuf {
        PathBuf::from(&self.root).join(relative)
    }

    /// Check whether the root directory itself exists
    pub async fn root_exists(&self) -> io::Result<bool> {
        tokio_fs::try_exists(&self.root).await
    }

    /// Create the root directory and any missing ancestors
    pub async fn create_root(&self) -> io::Result<()> {
        tokio_fs::create_dir_all(&self.root).await
    }

    /// Streaming recursive traversal. Entries are produced on a blocking
    /// task and handed over a channel; every call walks afresh. The root
    /// itself is not listed and symbolic links are not followed.
    ///
    /// Fails up front when the root does not exist.
    pub async fn walkdir(&self) -> io::Result<mpsc::Receiver<StorageEntry>> {
        let root = PathBuf::from(&self.root);
        tokio_fs::metadata(&root).await?;

        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);

        tokio::task::spawn_blocking(move || {
            let walker = WalkDir::new(&root)
                .follow_links(false)
                .min_depth(1)
                .max_open(100);

            for entry in walker {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        log::warn!("Skipping unreadable entry: {}", e);
                        continue;
                    }
                };
                let metadata = match entry.metadata() {
                    Ok(metadata) => metadata,
                    Err(e) => {
                        log::warn!("Skipping '{}': {}", entry.path().display(), e);
                        continue;
                    }
                };
                let relative_path = match entry.path().strip_prefix(&root) {
                    Ok(relative) => relative.to_path_buf(),
                    Err(_) => continue,
                };

                let item = StorageEntry {
                    name: entry.file_name().to_string_lossy().into_owned(),
                    relative_path,
                    kind: if metadata.is_dir() {
                        EntryKind::Directory
                    } else {
                        EntryKind::File
                    },
                    size: metadata.len(),
                    modified: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
                };

                if tx.blocking_send(item).is_err() {
                    // Receiver dropped, stop walking
                    break;
                }
            }
        });

        Ok(rx)
    }

    /// Get file metadata asynchronously
    pub async fn head(&self, relative: &Path) -> io::Result<FileObject> {
        let path = self.full_path(relative);
        let metadata = tokio_fs::metadata(&path).await?;

        let name = relative
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .into_owned();

        Ok(FileObject {
            info: metadata,
            path,
            name,
        })
    }

    /// Check if a root-relative path exists
    pub async fn exists(&self, relative: &Path) -> io::Result<bool> {
        tokio_fs::try_exists(self.full_path(relative)).await
    }

    /// Create a directory and any missing ancestors; a directory that is
    /// already present is not an error
    pub async fn create_dir_all(&self, relative: &Path) -> io::Result<()> {
        tokio_fs::create_dir_all(self.full_path(relative)).await
    }

    /// Copy a file into this storage, creating missing parent directories
    /// and carrying the source timestamps over
    pub async fn copy(&self, src: &FileObject, relative: &Path) -> io::Result<()> {
        let target = self.full_path(relative);

        if let Some(parent) = target.parent() {
            if !tokio_fs::try_exists(parent).await? {
                tokio_fs::create_dir_all(parent).await?;
            }
        }

        tokio_fs::copy(&src.path, &target).await?;

        let atime = FileTime::from_system_time(src.atime());
        let mtime = FileTime::from_system_time(src.mtime());
        filetime::set_file_times(&target, atime, mtime)?;

        Ok(())
    }

    /// Delete a file or directory tree; a path that is already gone is
    /// not an error
    pub async fn delete(&self, relative: &Path) -> io::Result<()> {
        let path = self.full_path(relative);
        match tokio_fs::remove_file(&path).await {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(_) => tokio_fs::remove_dir_all(&path).await.or_else(|e| {
                if e.kind() == io::ErrorKind::NotFound {
                    Ok(())
                } else {
                    Err(e)
                }
            }),
        }
    }
}
