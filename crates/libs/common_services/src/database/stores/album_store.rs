use crate::database::{Database, DbError};
use common_types::{Album, AlbumId, Photo, PhotoId, Tag, TagId};

pub struct AlbumStore;

impl AlbumStore {
    pub async fn create(db: &Database, album: Album) -> Result<Album, DbError> {
        let mut tables = db.write().await;
        if tables.albums.contains_key(&album.id) {
            return Err(DbError::Conflict {
                entity: "album",
                id: album.id.to_string(),
            });
        }
        tables.albums.insert(album.id, album.clone());
        Ok(album)
    }

    pub async fn find_by_id(db: &Database, album_id: AlbumId) -> Result<Album, DbError> {
        db.read()
            .await
            .albums
            .get(&album_id)
            .cloned()
            .ok_or_else(|| DbError::not_found("album", album_id))
    }

    /// Every album, newest first.
    pub async fn list_all(db: &Database) -> Vec<Album> {
        let mut albums: Vec<Album> = db.read().await.albums.values().cloned().collect();
        albums.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        albums
    }

    /// Adds photos to an album. Photos already in it are skipped.
    /// Returns how many were newly added. Does not touch `photo_count`.
    pub async fn add_photos(
        db: &Database,
        album_id: AlbumId,
        photo_ids: &[PhotoId],
    ) -> Result<usize, DbError> {
        let mut tables = db.write().await;
        if !tables.albums.contains_key(&album_id) {
            return Err(DbError::not_found("album", album_id));
        }
        if let Some(missing) = photo_ids.iter().find(|id| !tables.photos.contains_key(id)) {
            return Err(DbError::not_found("photo", missing));
        }
        let added = photo_ids
            .iter()
            .filter(|&&photo_id| tables.photo_album.insert((photo_id, album_id)))
            .count();
        Ok(added)
    }

    /// Photos in the album, oldest capture first.
    pub async fn photos(db: &Database, album_id: AlbumId) -> Vec<Photo> {
        let tables = db.read().await;
        let mut photos: Vec<Photo> = tables
            .photo_album
            .iter()
            .filter(|(_, a)| *a == album_id)
            .filter_map(|(p, _)| tables.photos.get(p).cloned())
            .collect();
        photos.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        photos
    }

    /// Recomputes the cached photo count from the membership set and stores it.
    pub async fn refresh_photo_count(db: &Database, album_id: AlbumId) -> Result<u32, DbError> {
        let mut tables = db.write().await;
        let count = tables
            .photo_album
            .iter()
            .filter(|(_, a)| *a == album_id)
            .count();
        let count = u32::try_from(count).unwrap_or(u32::MAX);
        let album = tables
            .albums
            .get_mut(&album_id)
            .ok_or_else(|| DbError::not_found("album", album_id))?;
        album.photo_count = count;
        Ok(count)
    }

    pub async fn increment_view_count(db: &Database, album_id: AlbumId) -> Result<Album, DbError> {
        let mut tables = db.write().await;
        let album = tables
            .albums
            .get_mut(&album_id)
            .ok_or_else(|| DbError::not_found("album", album_id))?;
        album.view_count = album.view_count.saturating_add(1);
        Ok(album.clone())
    }

    /// Links a tag to an album. Returns false when the link already existed.
    pub async fn attach_tag(
        db: &Database,
        album_id: AlbumId,
        tag_id: TagId,
    ) -> Result<bool, DbError> {
        let mut tables = db.write().await;
        if !tables.albums.contains_key(&album_id) {
            return Err(DbError::not_found("album", album_id));
        }
        if !tables.tags.contains_key(&tag_id) {
            return Err(DbError::not_found("tag", tag_id));
        }
        Ok(tables.album_tag.insert((album_id, tag_id)))
    }

    pub async fn tags_of(db: &Database, album_id: AlbumId) -> Vec<Tag> {
        let tables = db.read().await;
        let mut tags: Vec<Tag> = tables
            .album_tag
            .iter()
            .filter(|(a, _)| *a == album_id)
            .filter_map(|(_, t)| tables.tags.get(t).cloned())
            .collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        tags
    }
}
