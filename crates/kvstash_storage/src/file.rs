//! File-based storage backend for persistent storage.

use crate::backend::StorageBackend;
use crate::error::{StorageError, StorageResult};
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

/// Suffix of the sibling file a replacement is staged in.
const TEMP_SUFFIX: &str = ".tmp";

/// A file-based storage backend.
///
/// The image lives in a single file. Data survives process restarts.
///
/// # Durability
///
/// `replace` uses the write-then-rename pattern:
/// 1. Write the new image to `<file>.tmp`
/// 2. Sync the temporary file (when `sync` is enabled)
/// 3. Rename it over the target
/// 4. Sync the parent directory (when `sync` is enabled, Unix only)
///
/// Readers therefore see either the old image or the new one, never a
/// truncated mix.
///
/// # Handles
///
/// No file handle is kept open between calls. Each read or write opens the
/// file, processes it in full and closes it before returning.
///
/// # Example
///
/// ```no_run
/// use kvstash_storage::{StorageBackend, FileBackend};
/// use std::path::Path;
///
/// let mut backend = FileBackend::open(Path::new("kvstash.json")).unwrap();
/// backend.replace(b"{}").unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
    temp_path: PathBuf,
    sync: bool,
}

impl FileBackend {
    /// Opens a file backend at the given path.
    ///
    /// The file itself is not created until the first `replace`.
    ///
    /// # Errors
    ///
    /// Returns an error if the path has no file name component or points
    /// at a directory.
    pub fn open(path: &Path) -> StorageResult<Self> {
        let file_name = path
            .file_name()
            .ok_or_else(|| StorageError::InvalidPath(path.to_path_buf()))?;

        if path.is_dir() {
            return Err(StorageError::InvalidPath(path.to_path_buf()));
        }

        let mut temp_name = file_name.to_os_string();
        temp_name.push(TEMP_SUFFIX);

        Ok(Self {
            path: path.to_path_buf(),
            temp_path: path.with_file_name(temp_name),
            sync: true,
        })
    }

    /// Opens a file backend, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directories cannot be created or the path is
    /// not usable.
    pub fn open_with_create_dirs(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Self::open(path)
    }

    /// Sets whether each replacement is synced to disk.
    #[must_use]
    pub fn with_sync(mut self, sync: bool) -> Self {
        self.sync = sync;
        self
    }

    /// Returns the path to the underlying file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_temp(&self, data: &[u8]) -> io::Result<()> {
        let mut file = File::create(&self.temp_path)?;
        file.write_all(data)?;
        if self.sync {
            file.sync_all()?;
        }
        Ok(())
    }

    /// Syncs the parent directory so the rename itself is durable.
    #[cfg(unix)]
    fn sync_parent(&self) -> io::Result<()> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        File::open(parent)?.sync_all()
    }

    #[cfg(not(unix))]
    fn sync_parent(&self) -> io::Result<()> {
        // NTFS journals metadata; there is no directory handle to sync
        Ok(())
    }
}

impl StorageBackend for FileBackend {
    fn read_all(&self) -> StorageResult<Option<Vec<u8>>> {
        let mut file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        Ok(Some(data))
    }

    fn replace(&mut self, data: &[u8]) -> StorageResult<()> {
        if let Err(e) = self.write_temp(data) {
            let _ = fs::remove_file(&self.temp_path);
            return Err(e.into());
        }

        if let Err(e) = fs::rename(&self.temp_path, &self.path) {
            let _ = fs::remove_file(&self.temp_path);
            return Err(e.into());
        }

        if self.sync {
            self.sync_parent()?;
        }

        Ok(())
    }

    fn exists(&self) -> StorageResult<bool> {
        Ok(self.path.is_file())
    }
}
