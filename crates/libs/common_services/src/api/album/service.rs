use crate::api::access::{AccessPolicy, ProtectedResource, TicketValidator};
use crate::api::album::error::AlbumError;
use crate::api::album::interfaces::{
    AlbumView, CreateAlbumRequest, FailedRecipient, ShareAlbumRequest, ShareOptions, ShareReport,
};
use crate::api::upload::tags::TagReconciler;
use crate::database::{AlbumStore, Database, TicketStore};
use crate::notify::{Invitation, ShareNotifier};
use common_types::{AccessTicket, Album, AlbumId, PrivacyLevel, ValidationError, Viewer};
use std::slice;
use tracing::{info, instrument, warn};
use url::Url;
use validator::ValidateEmail;

/// Only the owner, or an admin, may change an album or hand out tickets for it.
pub(crate) fn ensure_can_manage(viewer: &Viewer, album: &Album) -> Result<(), AlbumError> {
    if viewer.id == album.owner_id || viewer.is_admin() {
        Ok(())
    } else {
        Err(AlbumError::Forbidden(format!(
            "user {} does not own album {}",
            viewer.id, album.id
        )))
    }
}

#[instrument(skip(db, request), fields(owner = owner.id))]
pub async fn create_album(
    db: &Database,
    owner: &Viewer,
    request: CreateAlbumRequest,
) -> Result<Album, AlbumError> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(ValidationError::Other("album name must not be empty".to_owned()).into());
    }
    let privacy = match request.privacy.as_deref() {
        Some(value) => value.parse::<PrivacyLevel>()?,
        None => PrivacyLevel::Public,
    };

    let mut album = Album::new(owner.id, name.to_owned(), privacy);
    album.description = request.description.filter(|d| !d.trim().is_empty());
    album.location = request.location.filter(|l| !l.trim().is_empty());
    album.latitude = request.latitude;
    album.longitude = request.longitude;

    let album = AlbumStore::create(db, album).await?;
    TagReconciler::reconcile_album(db, album.id, &request.tags).await?;
    info!(album_id = %album.id, %privacy, "Album created");
    Ok(album)
}

/// Every album the viewer may see without a ticket.
#[instrument(skip(db, policy, viewer))]
pub async fn list_visible_albums(
    db: &Database,
    policy: &AccessPolicy,
    viewer: Option<&Viewer>,
) -> Vec<Album> {
    AlbumStore::list_all(db)
        .await
        .into_iter()
        .filter(|album| {
            policy
                .evaluate(viewer, &ProtectedResource::album(album), None)
                .is_allowed()
        })
        .collect()
}

/// Renders one album. A presented ticket is redeemed at most once, whatever the number
/// of photos, and its pass covers every photo of the album.
#[instrument(skip(db, policy, viewer, ticket))]
pub async fn view_album(
    db: &Database,
    policy: &AccessPolicy,
    viewer: Option<&Viewer>,
    album_id: AlbumId,
    ticket: Option<&str>,
) -> Result<AlbumView, AlbumError> {
    let album = AlbumStore::find_by_id(db, album_id).await?;

    let pass = match ticket {
        Some(token) => TicketValidator::redeem_for_album(db, token, album.id).await?,
        None => None,
    };
    policy
        .evaluate(viewer, &ProtectedResource::album(&album), pass.as_ref())
        .into_result()?;

    let album_ids = slice::from_ref(&album.id);
    let photos = AlbumStore::photos(db, album.id)
        .await
        .into_iter()
        .filter(|photo| {
            policy
                .evaluate(
                    viewer,
                    &ProtectedResource::photo(photo, album_ids),
                    pass.as_ref(),
                )
                .is_allowed()
        })
        .collect();

    let album = AlbumStore::increment_view_count(db, album.id).await?;
    let tags = AlbumStore::tags_of(db, album.id).await;
    Ok(AlbumView {
        album,
        tags,
        photos,
        via_ticket: pass.is_some(),
        ticket: pass.and(ticket.map(ToOwned::to_owned)),
    })
}

/// Splits a comma separated list into trimmed addresses, dropping empty and repeated entries.
fn split_recipients(emails: &str) -> Vec<String> {
    let mut recipients: Vec<String> = Vec::new();
    for email in emails.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        if !recipients.iter().any(|r| r.eq_ignore_ascii_case(email)) {
            recipients.push(email.to_owned());
        }
    }
    recipients
}

fn ticket_link(public_url: &Url, album_id: AlbumId, token: &str) -> Result<Url, AlbumError> {
    let base = public_url.as_str().trim_end_matches('/');
    Ok(Url::parse(&format!("{base}/album/{album_id}/t/{token}"))?)
}

/// Creates one ticket per valid recipient and sends each an invitation.
/// Recipients fail independently, the report lists every failure.
#[instrument(skip(db, options, notifier, request), fields(sharer = sharer.id))]
pub async fn share_album(
    db: &Database,
    options: &ShareOptions,
    notifier: &dyn ShareNotifier,
    sharer: &Viewer,
    album_id: AlbumId,
    request: ShareAlbumRequest,
) -> Result<ShareReport, AlbumError> {
    let album = AlbumStore::find_by_id(db, album_id).await?;
    ensure_can_manage(sharer, &album)?;

    let (valid, invalid): (Vec<String>, Vec<String>) = split_recipients(&request.emails)
        .into_iter()
        .partition(|email| email.validate_email());
    if valid.is_empty() {
        return Err(ValidationError::InvalidEmail(request.emails).into());
    }

    let mut report = ShareReport {
        success_count: 0,
        failed_recipients: invalid
            .into_iter()
            .map(|email| FailedRecipient {
                email,
                reason: "invalid email address".to_owned(),
            })
            .collect(),
    };
    let message = request.message.filter(|m| !m.trim().is_empty());

    for email in valid {
        let ticket = AccessTicket::new(
            album.id,
            email.clone(),
            message.clone(),
            Some(options.ticket_expiry),
        );
        let ticket = TicketStore::insert(db, ticket).await?;
        let invitation = Invitation {
            from: options.mail_from.clone(),
            to: email.clone(),
            album_name: album.name.clone(),
            link: ticket_link(&options.public_url, album.id, &ticket.token)?,
            message: message.clone(),
            expires_at: ticket.expires_at,
        };

        match notifier.notify(&invitation).await {
            Ok(()) => {
                info!(target: "email", to = %email, album_id = %album.id, "Invitation sent");
                report.success_count += 1;
            }
            Err(e) => {
                warn!(target: "email", to = %email, album_id = %album.id, "Invitation failed: {e}");
                TicketStore::deactivate(db, &ticket.token).await?;
                report.failed_recipients.push(FailedRecipient {
                    email,
                    reason: e.reason,
                });
            }
        }
    }

    info!(
        target: "email",
        album_id = %album.id,
        success_count = report.success_count,
        failure_count = report.failed_recipients.len(),
        "Album share finished"
    );
    Ok(report)
}
