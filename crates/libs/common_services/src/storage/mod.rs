mod fs_storage;

pub use fs_storage::FsStorage;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid file name: '{0}'")]
    InvalidName(String),

    #[error("File not found: '{0}'")]
    NotFound(String),

    #[error("I/O error on '{name}': {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Flat, name-addressed byte storage for originals and derivatives.
#[async_trait]
pub trait MediaStorage: Send + Sync {
    async fn write(&self, name: &str, bytes: &[u8]) -> Result<(), StorageError>;

    async fn read(&self, name: &str) -> Result<Vec<u8>, StorageError>;

    async fn delete(&self, name: &str) -> Result<(), StorageError>;
}
