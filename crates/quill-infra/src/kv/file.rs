//! File-backed key-value store. One JSON file per slot inside a data directory.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use quill_core::StorageError;
use quill_core::ports::KeyValueStore;

/// Durable slots stored as `<dir>/<key>.json`.
///
/// Every write goes to its own temporary file in the same directory and is
/// renamed into place, so a reader never sees a half-written slot and
/// concurrent writers never share a temporary file.
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| match c {
                'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' | '.' => c,
                _ => '_',
            })
            .collect();
        self.dir.join(format!("{}.json", name))
    }
}

fn io_error(path: &Path, err: std::io::Error) -> StorageError {
    StorageError::Io(format!("{}: {}", path.display(), err))
}

fn write_replacing(dir: &Path, target: &Path, contents: &str) -> Result<(), StorageError> {
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| io_error(dir, e))?;
    tmp.write_all(contents.as_bytes())
        .map_err(|e| io_error(tmp.path(), e))?;
    tmp.as_file().sync_all().map_err(|e| io_error(tmp.path(), e))?;
    tmp.persist(target).map_err(|e| io_error(target, e.error))?;
    Ok(())
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.slot_path(key);
        match tokio::fs::read_to_string(&path).await {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(&path, e)),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| io_error(&self.dir, e))?;

        let path = self.slot_path(key);
        let dir = self.dir.clone();
        let target = path.clone();
        let contents = value.to_owned();
        tokio::task::spawn_blocking(move || write_replacing(&dir, &target, &contents))
            .await
            .map_err(|e| StorageError::Io(format!("{}: write task failed: {}", path.display(), e)))??;

        tracing::debug!(path = %path.display(), bytes = value.len(), "Slot written");
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let path = self.slot_path(key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(&path, e)),
        }
    }
}
