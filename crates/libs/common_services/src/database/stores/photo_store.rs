use crate::database::{Database, DbError};
use common_types::{AlbumId, Photo, PhotoId, Tag, TagId};

pub struct PhotoStore;

impl PhotoStore {
    pub async fn insert(db: &Database, photo: Photo) -> Result<Photo, DbError> {
        let mut tables = db.write().await;
        if tables.photos.contains_key(&photo.id) {
            return Err(DbError::Conflict {
                entity: "photo",
                id: photo.id.to_string(),
            });
        }
        tables.photos.insert(photo.id, photo.clone());
        Ok(photo)
    }

    /// Deletes a photo with its album and tag links. Returns the removed photo, if any.
    pub async fn remove(db: &Database, photo_id: PhotoId) -> Option<Photo> {
        let mut tables = db.write().await;
        tables.photo_album.retain(|(p, _)| *p != photo_id);
        tables.photo_tag.retain(|(p, _)| *p != photo_id);
        tables.photos.remove(&photo_id)
    }

    pub async fn find_by_id(db: &Database, photo_id: PhotoId) -> Result<Photo, DbError> {
        db.read()
            .await
            .photos
            .get(&photo_id)
            .cloned()
            .ok_or_else(|| DbError::not_found("photo", photo_id))
    }

    /// Albums the photo belongs to.
    pub async fn albums_of(db: &Database, photo_id: PhotoId) -> Vec<AlbumId> {
        db.read()
            .await
            .photo_album
            .iter()
            .filter(|(p, _)| *p == photo_id)
            .map(|(_, a)| *a)
            .collect()
    }

    pub async fn tags_of(db: &Database, photo_id: PhotoId) -> Vec<Tag> {
        let tables = db.read().await;
        let mut tags: Vec<Tag> = tables
            .photo_tag
            .iter()
            .filter(|(p, _)| *p == photo_id)
            .filter_map(|(_, t)| tables.tags.get(t).cloned())
            .collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        tags
    }

    /// Links a tag to a photo. Returns false when the link already existed.
    pub async fn attach_tag(
        db: &Database,
        photo_id: PhotoId,
        tag_id: TagId,
    ) -> Result<bool, DbError> {
        let mut tables = db.write().await;
        if !tables.photos.contains_key(&photo_id) {
            return Err(DbError::not_found("photo", photo_id));
        }
        if !tables.tags.contains_key(&tag_id) {
            return Err(DbError::not_found("tag", tag_id));
        }
        Ok(tables.photo_tag.insert((photo_id, tag_id)))
    }

    pub async fn increment_view_count(db: &Database, photo_id: PhotoId) -> Result<Photo, DbError> {
        let mut tables = db.write().await;
        let photo = tables
            .photos
            .get_mut(&photo_id)
            .ok_or_else(|| DbError::not_found("photo", photo_id))?;
        photo.view_count = photo.view_count.saturating_add(1);
        Ok(photo.clone())
    }
}
