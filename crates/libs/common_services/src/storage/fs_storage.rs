use crate::storage::{MediaStorage, StorageError};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Stores files directly inside one folder.
#[derive(Debug, Clone)]
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps a stored name to its path, refusing anything that could leave the root folder.
    fn resolve(&self, name: &str) -> Result<PathBuf, StorageError> {
        let is_plain = !name.is_empty()
            && name != "."
            && !name.contains("..")
            && !name.contains(['/', '\\', '\0']);
        if !is_plain {
            return Err(StorageError::InvalidName(name.to_owned()));
        }
        Ok(self.root.join(name))
    }

    fn io_error(name: &str, source: std::io::Error) -> StorageError {
        if source.kind() == ErrorKind::NotFound {
            StorageError::NotFound(name.to_owned())
        } else {
            StorageError::Io {
                name: name.to_owned(),
                source,
            }
        }
    }
}

#[async_trait]
impl MediaStorage for FsStorage {
    async fn write(&self, name: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let path = self.resolve(name)?;
        fs::create_dir_all(&self.root)
            .await
            .map_err(|e| Self::io_error(name, e))?;
        fs::write(&path, bytes)
            .await
            .map_err(|e| Self::io_error(name, e))?;
        debug!("Stored {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }

    async fn read(&self, name: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.resolve(name)?;
        fs::read(&path).await.map_err(|e| Self::io_error(name, e))
    }

    async fn delete(&self, name: &str) -> Result<(), StorageError> {
        let path = self.resolve(name)?;
        fs::remove_file(&path)
            .await
            .map_err(|e| Self::io_error(name, e))?;
        debug!("Removed {}", path.display());
        Ok(())
    }
}
