use app_state::AppSettings;
use chrono::Duration;
use common_types::{Album, Photo, Tag};
use serde::{Deserialize, Serialize};
use url::Url;
use utoipa::ToSchema;

// --- Request Payloads ---

#[derive(Serialize, Deserialize, ToSchema, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateAlbumRequest {
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// One of `public`, `member`, `friend`, `family`, `private`. Defaults to `public`.
    pub privacy: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ShareAlbumRequest {
    /// Comma separated recipient addresses.
    pub emails: String,
    pub message: Option<String>,
}

// --- Response Payloads ---

#[derive(Serialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AlbumView {
    pub album: Album,
    pub tags: Vec<Tag>,
    /// The album photos this viewer may see.
    pub photos: Vec<Photo>,
    /// Whether access was granted through a ticket.
    pub via_ticket: bool,
    /// The redeemed ticket token, to be stored in the bypass cookie.
    #[serde(skip)]
    pub ticket: Option<String>,
}

#[derive(Serialize, ToSchema, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FailedRecipient {
    pub email: String,
    pub reason: String,
}

#[derive(Serialize, ToSchema, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ShareReport {
    pub success_count: usize,
    pub failed_recipients: Vec<FailedRecipient>,
}

// --- Internal ---

/// Settings needed to create tickets and invitation links.
#[derive(Debug, Clone)]
pub struct ShareOptions {
    pub public_url: Url,
    pub ticket_expiry: Duration,
    pub mail_from: String,
}

impl ShareOptions {
    #[must_use]
    pub fn from_settings(settings: &AppSettings) -> Self {
        Self {
            public_url: settings.api.public_url.clone(),
            ticket_expiry: Duration::days(settings.sharing.ticket_expiry_days),
            mail_from: settings.sharing.mail_from.clone(),
        }
    }
}
