use crate::database::{Database, DbError};
use common_types::Tag;

pub struct TagStore;

impl TagStore {
    /// Returns the tag named `name`, creating it when absent.
    ///
    /// Lookup and insert happen under one write lock, so concurrent callers asking for the
    /// same new name all get the same tag. A slug already taken by a different name gets a
    /// numeric suffix.
    pub async fn find_or_create(db: &Database, name: &str) -> Result<Tag, DbError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DbError::Invalid {
                entity: "tag",
                reason: "name is empty",
            });
        }

        let mut tables = db.write().await;
        if let Some(existing) = tables.tags.values().find(|t| t.name == name) {
            return Ok(existing.clone());
        }

        let mut tag = Tag::new(name.to_owned());
        let base = if tag.slug.is_empty() {
            "tag".to_owned()
        } else {
            tag.slug.clone()
        };
        let mut slug = base.clone();
        let mut n = 2;
        while tables.tags.values().any(|t| t.slug == slug) {
            slug = format!("{base}-{n}");
            n += 1;
        }
        tag.slug = slug;

        tables.tags.insert(tag.id, tag.clone());
        Ok(tag)
    }

    pub async fn list_all(db: &Database) -> Vec<Tag> {
        let mut tags: Vec<Tag> = db.read().await.tags.values().cloned().collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        tags
    }
}
