mod error;
pub mod stores;

pub use error::*;
pub use stores::*;

use common_types::{AccessTicket, Album, AlbumId, Photo, PhotoId, Tag, TagId};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Entity arena plus the join sets relating photos, albums and tags.
#[derive(Debug, Default)]
pub struct Tables {
    pub photos: HashMap<PhotoId, Photo>,
    pub albums: HashMap<AlbumId, Album>,
    pub tags: HashMap<TagId, Tag>,
    /// Keyed by token.
    pub tickets: HashMap<String, AccessTicket>,
    pub photo_album: BTreeSet<(PhotoId, AlbumId)>,
    pub photo_tag: BTreeSet<(PhotoId, TagId)>,
    pub album_tag: BTreeSet<(AlbumId, TagId)>,
}

/// Shared handle to the in-memory repository. Cloning is cheap.
///
/// Each store call takes the lock once, so a single call is atomic with respect
/// to every other call.
#[derive(Debug, Clone, Default)]
pub struct Database {
    tables: Arc<RwLock<Tables>>,
}

impl Database {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().await
    }
}
