use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

pub type TagId = Uuid;

#[derive(Debug, Serialize, ToSchema, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    #[schema(value_type = String, format = Uuid)]
    pub id: TagId,
    /// Unique, compared exactly.
    pub name: String,
    pub slug: String,
}

impl Tag {
    #[must_use]
    pub fn new(name: String) -> Self {
        let slug = slugify(&name);
        Self {
            id: Uuid::new_v4(),
            name,
            slug,
        }
    }
}

/// Lowercase ASCII alphanumerics, every other run of characters collapsed into one `-`.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}
