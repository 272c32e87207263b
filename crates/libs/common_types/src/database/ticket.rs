use crate::AlbumId;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// A bearer grant giving its holder view access to one album.
#[derive(Debug, Serialize, ToSchema, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AccessTicket {
    /// Unguessable, unique.
    pub token: String,
    #[schema(value_type = String, format = Uuid)]
    pub album_id: AlbumId,
    pub email: String,
    pub message: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    /// `None` never expires.
    pub expires_at: Option<DateTime<Utc>>,
    pub last_accessed_at: Option<DateTime<Utc>>,
}

impl AccessTicket {
    #[must_use]
    pub fn new(
        album_id: AlbumId,
        email: String,
        message: Option<String>,
        valid_for: Option<Duration>,
    ) -> Self {
        let now = Utc::now();
        Self {
            token: Uuid::new_v4().to_string(),
            album_id,
            email,
            message,
            is_active: true,
            created_at: now,
            expires_at: valid_for.map(|d| now + d),
            last_accessed_at: None,
        }
    }

    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| now > expires_at)
    }

    /// Active and not past its expiry at `now`.
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active && !self.is_expired_at(now)
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }
}
