use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use super::StorageBackend;
use crate::errors::StorageError;

/// File-backed storage: one UTF-8 file per key inside a data directory.
///
/// This is the persistent analogue of per-browser local storage. Keys map
/// to `<dir>/<key>.json`; a key that has never been written simply has no
/// file. Writes replace the whole file (last write wins).
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Create a storage rooted at `dir`. The directory is created on the
    /// first write if it does not exist yet.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Directory this storage writes into.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl StorageBackend for FileStorage {
    async fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if !self.dir.exists() {
            debug!("Creating data directory {}", self.dir.display());
            fs::create_dir_all(&self.dir).await?;
        }
        fs::write(self.path_for(key), value).await?;
        Ok(())
    }
}
