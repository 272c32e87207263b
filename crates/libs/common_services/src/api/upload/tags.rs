use crate::database::{AlbumStore, Database, DbError, PhotoStore, TagStore};
use common_types::{AlbumId, PhotoId, Tag};
use tracing::debug;

/// Maps free-text tags onto shared [`Tag`] rows and links them to a photo or an album.
pub struct TagReconciler;

/// Trimmed, non-empty names in input order, each once.
fn distinct_names(names: &[String]) -> Vec<&str> {
    let mut distinct: Vec<&str> = Vec::with_capacity(names.len());
    for name in names.iter().map(|n| n.trim()).filter(|n| !n.is_empty()) {
        if !distinct.contains(&name) {
            distinct.push(name);
        }
    }
    distinct
}

impl TagReconciler {
    /// Trims and de-duplicates `names`, finds or creates each tag and attaches it to the photo.
    /// Returns the attached tags in input order.
    pub async fn reconcile(
        db: &Database,
        photo_id: PhotoId,
        names: &[String],
    ) -> Result<Vec<Tag>, DbError> {
        let mut tags: Vec<Tag> = Vec::with_capacity(names.len());
        for name in distinct_names(names) {
            let tag = TagStore::find_or_create(db, name).await?;
            if PhotoStore::attach_tag(db, photo_id, tag.id).await? {
                debug!(tag = %tag.name, %photo_id, "Tag attached");
            }
            tags.push(tag);
        }
        Ok(tags)
    }

    pub async fn reconcile_album(
        db: &Database,
        album_id: AlbumId,
        names: &[String],
    ) -> Result<Vec<Tag>, DbError> {
        let mut tags: Vec<Tag> = Vec::with_capacity(names.len());
        for name in distinct_names(names) {
            let tag = TagStore::find_or_create(db, name).await?;
            if AlbumStore::attach_tag(db, album_id, tag.id).await? {
                debug!(tag = %tag.name, %album_id, "Album tag attached");
            }
            tags.push(tag);
        }
        Ok(tags)
    }
}
