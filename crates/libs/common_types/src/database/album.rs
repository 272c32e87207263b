use crate::{PhotoId, PrivacyLevel, StoredPrivacy, UserId};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

pub type AlbumId = Uuid;

#[derive(Debug, Serialize, ToSchema, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    #[schema(value_type = String, format = Uuid)]
    pub id: AlbumId,
    pub owner_id: UserId,
    pub name: String,
    pub description: Option<String>,
    #[schema(value_type = Option<String>, format = Uuid)]
    pub cover_photo_id: Option<PhotoId>,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Number of photos in the album, refreshed after each ingestion batch.
    pub photo_count: u32,
    pub view_count: u64,
    pub view_privacy: StoredPrivacy,
    pub created_at: DateTime<Utc>,
}

impl Album {
    #[must_use]
    pub fn new(owner_id: UserId, name: String, privacy: PrivacyLevel) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            name,
            description: None,
            cover_photo_id: None,
            location: None,
            latitude: None,
            longitude: None,
            photo_count: 0,
            view_count: 0,
            view_privacy: privacy.into(),
            created_at: Utc::now(),
        }
    }
}
