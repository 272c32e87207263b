use crate::api::access::{AccessPolicy, ProtectedResource, TicketValidator};
use crate::api::photos::error::PhotosError;
use crate::api::photos::interfaces::{PhotoDetails, ServedPhoto};
use crate::database::{Database, PhotoStore};
use crate::storage::MediaStorage;
use common_types::{AlbumId, ImageSize, Photo, PhotoId, Viewer};
use tracing::{debug, instrument};

/// Loads a photo and checks it against the policy. Tickets are only checked here,
/// redemption is recorded when the album itself is viewed.
async fn load_visible_photo(
    db: &Database,
    policy: &AccessPolicy,
    viewer: Option<&Viewer>,
    photo_id: PhotoId,
    ticket_tokens: &[String],
) -> Result<(Photo, Vec<AlbumId>), PhotosError> {
    let photo = PhotoStore::find_by_id(db, photo_id).await?;
    let album_ids = PhotoStore::albums_of(db, photo_id).await;

    let pass = TicketValidator::check_any(db, ticket_tokens, &album_ids).await?;
    policy
        .evaluate(
            viewer,
            &ProtectedResource::photo(&photo, &album_ids),
            pass.as_ref(),
        )
        .into_result()?;
    Ok((photo, album_ids))
}

/// Reads the stored file for the requested size. A missing derivative falls back to the original.
#[instrument(skip(db, storage, policy, viewer, ticket_tokens))]
pub async fn serve_photo(
    db: &Database,
    storage: &dyn MediaStorage,
    policy: &AccessPolicy,
    viewer: Option<&Viewer>,
    photo_id: PhotoId,
    size: ImageSize,
    ticket_tokens: &[String],
) -> Result<ServedPhoto, PhotosError> {
    let (photo, _) = load_visible_photo(db, policy, viewer, photo_id, ticket_tokens).await?;

    let filename = photo.filename_for(size).to_owned();
    let bytes = storage.read(&filename).await?;
    let content_type = mime_guess::from_path(&filename)
        .first_or_octet_stream()
        .to_string();
    debug!(%filename, %content_type, "Serving photo");

    Ok(ServedPhoto {
        bytes,
        content_type,
        filename,
    })
}

/// Photo page data. Counts one view per call.
#[instrument(skip(db, policy, viewer, ticket_tokens))]
pub async fn get_photo(
    db: &Database,
    policy: &AccessPolicy,
    viewer: Option<&Viewer>,
    photo_id: PhotoId,
    ticket_tokens: &[String],
) -> Result<PhotoDetails, PhotosError> {
    let (_, album_ids) = load_visible_photo(db, policy, viewer, photo_id, ticket_tokens).await?;
    let photo = record_photo_view(db, photo_id).await?;
    let tags = PhotoStore::tags_of(db, photo_id).await;

    Ok(PhotoDetails {
        photo,
        tags,
        album_ids,
    })
}

pub async fn record_photo_view(db: &Database, photo_id: PhotoId) -> Result<Photo, PhotosError> {
    Ok(PhotoStore::increment_view_count(db, photo_id).await?)
}
