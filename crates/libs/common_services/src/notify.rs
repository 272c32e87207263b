use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::info;
use url::Url;

#[derive(Debug, Error)]
#[error("Could not deliver invitation to {recipient}: {reason}")]
pub struct NotifyError {
    pub recipient: String,
    pub reason: String,
}

/// An album share invitation for one recipient.
#[derive(Debug, Clone)]
pub struct Invitation {
    pub from: String,
    pub to: String,
    pub album_name: String,
    pub link: Url,
    pub message: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Invitation {
    #[must_use]
    pub fn subject(&self) -> String {
        format!("You've been invited to view the album \"{}\"", self.album_name)
    }
}

/// Delivers share invitations.
#[async_trait]
pub trait ShareNotifier: Send + Sync {
    async fn notify(&self, invitation: &Invitation) -> Result<(), NotifyError>;
}

/// Writes invitations to the `email` log target instead of sending mail.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl ShareNotifier for LogNotifier {
    async fn notify(&self, invitation: &Invitation) -> Result<(), NotifyError> {
        info!(
            target: "email",
            from = %invitation.from,
            to = %invitation.to,
            subject = %invitation.subject(),
            link = %invitation.link,
            message = invitation.message.as_deref().unwrap_or_default(),
            expires_at = ?invitation.expires_at,
            "Album invitation"
        );
        Ok(())
    }
}
