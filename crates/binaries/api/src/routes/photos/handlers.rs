use crate::api_state::ApiContext;
use crate::auth::middlewares::optional_user::OptionalUser;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use axum_extra::extract::cookie::CookieJar;
use common_services::api::access::TICKET_COOKIE_PREFIX;
use common_services::api::photos::error::PhotosError;
use common_services::api::photos::interfaces::PhotoDetails;
use common_services::api::photos::service::{get_photo, serve_photo};
use common_types::{ImageSize, PhotoId};
use http::header;

/// Ticket tokens from every `album_access_*` cookie on the request.
fn ticket_tokens(jar: &CookieJar) -> Vec<String> {
    jar.iter()
        .filter(|cookie| cookie.name().starts_with(TICKET_COOKIE_PREFIX))
        .map(|cookie| cookie.value().to_owned())
        .collect()
}

/// Get a photo with its tags and albums.
///
/// Counts as one view of the photo.
#[utoipa::path(
    get,
    path = "/photo/{photo_id}",
    tag = "Photos",
    params(
        ("photo_id" = String, Path, description = "The unique ID of the photo.")
    ),
    responses(
        (status = 200, description = "The photo and its details.", body = PhotoDetails),
        (status = 403, description = "The viewer may not see this photo."),
        (status = 404, description = "Photo not found."),
    ),
    security((), ("bearer_auth" = []))
)]
pub async fn get_photo_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<OptionalUser>,
    Path(photo_id): Path<PhotoId>,
    jar: CookieJar,
) -> Result<Json<PhotoDetails>, PhotosError> {
    let details = get_photo(
        &context.db,
        &context.policy,
        user.viewer(),
        photo_id,
        &ticket_tokens(&jar),
    )
    .await?;
    Ok(Json(details))
}

async fn serve(
    context: &ApiContext,
    user: &OptionalUser,
    photo_id: PhotoId,
    size: ImageSize,
    jar: &CookieJar,
) -> Result<Response, PhotosError> {
    let served = serve_photo(
        &context.db,
        context.storage.as_ref(),
        &context.policy,
        user.viewer(),
        photo_id,
        size,
        &ticket_tokens(jar),
    )
    .await?;

    let headers = [
        (header::CONTENT_TYPE, served.content_type),
        (
            header::CONTENT_DISPOSITION,
            format!("inline; filename=\"{}\"", served.filename),
        ),
        (header::CACHE_CONTROL, "private, max-age=3600".to_owned()),
    ];
    Ok((headers, served.bytes).into_response())
}

/// Serve the desktop rendition of a photo.
#[utoipa::path(
    get,
    path = "/photo/serve/{photo_id}",
    tag = "Photos",
    params(
        ("photo_id" = String, Path, description = "The unique ID of the photo.")
    ),
    responses(
        (status = 200, description = "The image file.", body = Vec<u8>, content_type = "image/*"),
        (status = 403, description = "The viewer may not see this photo."),
        (status = 404, description = "Photo or file not found."),
    ),
    security((), ("bearer_auth" = []))
)]
pub async fn serve_photo_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<OptionalUser>,
    Path(photo_id): Path<PhotoId>,
    jar: CookieJar,
) -> Result<Response, PhotosError> {
    serve(&context, &user, photo_id, ImageSize::default(), &jar).await
}

/// Serve one rendition of a photo.
///
/// `size` is `thumbnail`, `tablet`, `desktop` or `original`. Unknown sizes serve the original.
#[utoipa::path(
    get,
    path = "/photo/serve/{photo_id}/{size}",
    tag = "Photos",
    params(
        ("photo_id" = String, Path, description = "The unique ID of the photo."),
        ("size" = String, Path, description = "Requested rendition."),
    ),
    responses(
        (status = 200, description = "The image file.", body = Vec<u8>, content_type = "image/*"),
        (status = 403, description = "The viewer may not see this photo."),
        (status = 404, description = "Photo or file not found."),
    ),
    security((), ("bearer_auth" = []))
)]
pub async fn serve_photo_size_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<OptionalUser>,
    Path((photo_id, size)): Path<(PhotoId, String)>,
    jar: CookieJar,
) -> Result<Response, PhotosError> {
    serve(&context, &user, photo_id, ImageSize::from_selector(&size), &jar).await
}
