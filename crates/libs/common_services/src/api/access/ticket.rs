use crate::api::access::{AccessDecision, AccessError, AccessPolicy, ProtectedResource};
use crate::database::{Database, TicketStore};
use chrono::{DateTime, Utc};
use common_types::{AccessTicket, AlbumId, Viewer};
use tracing::{debug, info, instrument};

/// Cookies holding redeemed tickets are named `album_access_<album id>`.
pub const TICKET_COOKIE_PREFIX: &str = "album_access_";

#[must_use]
pub fn ticket_cookie_name(album_id: AlbumId) -> String {
    format!("{TICKET_COOKIE_PREFIX}{album_id}")
}

/// Proof that a ticket for one album was checked. Only the validator hands these out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TicketPass {
    album_id: AlbumId,
}

impl TicketPass {
    pub(crate) const fn for_album(album_id: AlbumId) -> Self {
        Self { album_id }
    }

    #[must_use]
    pub const fn album_id(&self) -> AlbumId {
        self.album_id
    }

    #[must_use]
    pub fn covers(&self, album_ids: &[AlbumId]) -> bool {
        album_ids.contains(&self.album_id)
    }
}

pub struct TicketValidator;

impl TicketValidator {
    pub async fn resolve(db: &Database, token: &str) -> Result<AccessTicket, AccessError> {
        TicketStore::find_by_token(db, token).await.map_err(|e| {
            if e.is_not_found() {
                AccessError::TicketNotFound
            } else {
                AccessError::Database(e)
            }
        })
    }

    /// Pure check, safe to call any number of times.
    #[must_use]
    pub fn is_redeemable(ticket: &AccessTicket, album_id: AlbumId) -> bool {
        Self::is_redeemable_at(ticket, album_id, Utc::now())
    }

    #[must_use]
    pub fn is_redeemable_at(ticket: &AccessTicket, album_id: AlbumId, now: DateTime<Utc>) -> bool {
        ticket.is_valid_at(now) && ticket.album_id == album_id
    }

    /// Records a redemption by setting `last_accessed_at` to now.
    pub async fn redeem(db: &Database, ticket: &AccessTicket) -> Result<AccessTicket, AccessError> {
        let redeemed = TicketStore::touch_last_accessed(db, &ticket.token, Utc::now()).await?;
        Ok(redeemed)
    }

    /// Resolves `token` against `album_id` and redeems it once. Unknown, expired,
    /// inactive or foreign tickets yield `None` so the caller falls back to the
    /// normal privacy rules.
    #[instrument(skip(db, token))]
    pub async fn redeem_for_album(
        db: &Database,
        token: &str,
        album_id: AlbumId,
    ) -> Result<Option<TicketPass>, AccessError> {
        let ticket = match Self::resolve(db, token).await {
            Ok(ticket) => ticket,
            Err(AccessError::TicketNotFound) => {
                debug!("Presented ticket does not exist");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };
        if !Self::is_redeemable(&ticket, album_id) {
            info!(
                ticket_album = %ticket.album_id,
                is_active = ticket.is_active,
                "Presented ticket is not redeemable for this album"
            );
            return Ok(None);
        }

        Self::redeem(db, &ticket).await?;
        info!(email = %ticket.email, "Ticket redeemed");
        Ok(Some(TicketPass::for_album(album_id)))
    }

    /// Finds a pass among `tokens` for any of `album_ids` without recording a redemption.
    pub async fn check_any(
        db: &Database,
        tokens: &[String],
        album_ids: &[AlbumId],
    ) -> Result<Option<TicketPass>, AccessError> {
        let now = Utc::now();
        for token in tokens {
            let ticket = match Self::resolve(db, token).await {
                Ok(ticket) => ticket,
                Err(AccessError::TicketNotFound) => continue,
                Err(e) => return Err(e),
            };
            if let Some(&album_id) = album_ids
                .iter()
                .find(|&&id| Self::is_redeemable_at(&ticket, id, now))
            {
                return Ok(Some(TicketPass::for_album(album_id)));
            }
        }
        Ok(None)
    }
}

impl AccessPolicy {
    /// Evaluates a resource, redeeming `ticket` first when one is presented.
    /// The ticket is tried against each of the resource's albums and redeemed at most once.
    pub async fn can_view(
        &self,
        db: &Database,
        viewer: Option<&Viewer>,
        resource: &ProtectedResource<'_>,
        ticket: Option<&str>,
    ) -> Result<AccessDecision, AccessError> {
        let mut pass = None;
        if let Some(token) = ticket {
            let ticket = match TicketValidator::resolve(db, token).await {
                Ok(ticket) => Some(ticket),
                Err(AccessError::TicketNotFound) => None,
                Err(e) => return Err(e),
            };
            if let Some(ticket) = ticket.filter(|t| {
                resource
                    .album_ids
                    .iter()
                    .any(|&id| TicketValidator::is_redeemable(t, id))
            }) {
                TicketValidator::redeem(db, &ticket).await?;
                pass = Some(TicketPass::for_album(ticket.album_id));
            }
        }
        Ok(self.evaluate(viewer, resource, pass.as_ref()))
    }
}
