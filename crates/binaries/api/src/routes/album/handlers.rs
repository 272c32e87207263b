use crate::api_state::ApiContext;
use crate::auth::middlewares::optional_user::OptionalUser;
use axum::extract::{Multipart, Path, State};
use axum::extract::multipart::Field;
use axum::http::StatusCode;
use axum::{Extension, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use bytes::Bytes;
use common_services::api::access::ticket_cookie_name;
use common_services::api::album::error::AlbumError;
use common_services::api::album::interfaces::{
    AlbumView, CreateAlbumRequest, ShareAlbumRequest, ShareReport,
};
use common_services::api::album::service::{
    create_album, list_visible_albums, share_album, view_album,
};
use common_services::api::upload::error::UploadError;
use common_services::api::upload::interfaces::{FileBlob, UploadResponse};
use common_services::api::upload::service::upload_photos;
use common_types::{Album, AlbumId, ValidationError, Viewer};
use tracing::{info, instrument};
use utoipa::ToSchema;

/// Create a new album.
///
/// The user creating the album will be designated as the owner.
#[utoipa::path(
    post,
    path = "/albums",
    tag = "Album",
    request_body = CreateAlbumRequest,
    responses(
        (status = 201, description = "Album created successfully.", body = Album),
        (status = 400, description = "The name is empty or the privacy level is unknown."),
        (status = 401, description = "Missing or invalid bearer token."),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_album_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<Viewer>,
    Json(payload): Json<CreateAlbumRequest>,
) -> Result<(StatusCode, Json<Album>), AlbumError> {
    info!("Create album handler {:?}", payload);
    let album = create_album(&context.db, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(album)))
}

/// List the albums the current viewer may see.
///
/// Anonymous viewers only get public albums.
#[utoipa::path(
    get,
    path = "/albums",
    tag = "Album",
    responses(
        (status = 200, description = "The visible albums.", body = Vec<Album>),
    ),
    security((), ("bearer_auth" = []))
)]
pub async fn list_albums_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<OptionalUser>,
) -> Json<Vec<Album>> {
    Json(list_visible_albums(&context.db, &context.policy, user.viewer()).await)
}

/// View an album and the photos in it.
///
/// An `album_access_<album_id>` cookie, set after a ticket link was opened, is honoured.
#[utoipa::path(
    get,
    path = "/album/{album_id}",
    tag = "Album",
    params(
        ("album_id" = String, Path, description = "The unique ID of the album.")
    ),
    responses(
        (status = 200, description = "The album and the photos this viewer may see.", body = AlbumView),
        (status = 403, description = "The viewer may not see this album."),
        (status = 404, description = "Album not found."),
    ),
    security((), ("bearer_auth" = []))
)]
pub async fn view_album_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<OptionalUser>,
    Path(album_id): Path<AlbumId>,
    jar: CookieJar,
) -> Result<Json<AlbumView>, AlbumError> {
    let ticket = jar
        .get(&ticket_cookie_name(album_id))
        .map(|cookie| cookie.value().to_owned());
    let view = view_album(
        &context.db,
        &context.policy,
        user.viewer(),
        album_id,
        ticket.as_deref(),
    )
    .await?;
    Ok(Json(view))
}

/// Open an album through a shared ticket link.
///
/// On success the ticket is stored in an `album_access_<album_id>` cookie so the
/// plain album URL keeps working.
#[utoipa::path(
    get,
    path = "/album/{album_id}/t/{ticket}",
    tag = "Album",
    params(
        ("album_id" = String, Path, description = "The unique ID of the album."),
        ("ticket" = String, Path, description = "The ticket token from the invitation."),
    ),
    responses(
        (status = 200, description = "The album and its photos.", body = AlbumView),
        (status = 403, description = "The ticket is not valid and the viewer may not see this album."),
        (status = 404, description = "Album not found."),
    ),
    security((), ("bearer_auth" = []))
)]
pub async fn view_album_with_ticket_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<OptionalUser>,
    Path((album_id, ticket)): Path<(AlbumId, String)>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<AlbumView>), AlbumError> {
    let view = view_album(
        &context.db,
        &context.policy,
        user.viewer(),
        album_id,
        Some(&ticket),
    )
    .await?;

    let jar = match view.ticket.clone() {
        Some(token) if view.via_ticket => {
            let cookie = Cookie::build((ticket_cookie_name(album_id), token))
                .path("/")
                .secure(true)
                .http_only(true)
                .same_site(SameSite::Lax)
                .max_age(cookie::time::Duration::days(
                    context.settings.access.ticket_cookie_days,
                ));
            jar.add(cookie)
        }
        _ => jar,
    };
    Ok((jar, Json(view)))
}

/// Share an album by email.
///
/// Every valid address gets its own ticket link. Recipients that could not be
/// reached are listed in the report, the others are still invited.
#[utoipa::path(
    post,
    path = "/album/{album_id}/share",
    tag = "Album",
    params(
        ("album_id" = String, Path, description = "The unique ID of the album to share.")
    ),
    request_body = ShareAlbumRequest,
    responses(
        (status = 200, description = "Per recipient outcome.", body = ShareReport),
        (status = 400, description = "No valid email address was given."),
        (status = 403, description = "Only the owner or an admin may share this album."),
        (status = 404, description = "Album not found."),
    ),
    security(("bearer_auth" = []))
)]
pub async fn share_album_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<Viewer>,
    Path(album_id): Path<AlbumId>,
    Json(payload): Json<ShareAlbumRequest>,
) -> Result<Json<ShareReport>, AlbumError> {
    let report = share_album(
        &context.db,
        &context.share_options,
        context.notifier.as_ref(),
        &user,
        album_id,
        payload,
    )
    .await?;
    Ok(Json(report))
}

/// Form accepted by the photo upload endpoint.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadPhotosForm {
    /// One of `public`, `member`, `friend`, `family`, `private`. Defaults to `public`.
    privacy: Option<String>,
    #[schema(value_type = Vec<String>, format = Binary)]
    photos: Vec<Vec<u8>>,
}

fn multipart_error(error: impl std::fmt::Display) -> UploadError {
    ValidationError::Other(format!("Invalid multipart body: {error}")).into()
}

async fn read_file_field(field: Field<'_>) -> Result<FileBlob, UploadError> {
    let original_name = field.file_name().unwrap_or_default().to_owned();
    let bytes: Bytes = field.bytes().await.map_err(multipart_error)?;
    Ok(FileBlob {
        original_name,
        bytes,
    })
}

/// Upload photos into an album.
///
/// Files are processed independently. The response lists what was created and why
/// the other files were rejected.
#[utoipa::path(
    post,
    path = "/albums/{album_id}/photos",
    tag = "Album",
    params(
        ("album_id" = String, Path, description = "The unique ID of the target album.")
    ),
    request_body(content = UploadPhotosForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Per file outcome of the upload.", body = UploadResponse),
        (status = 400, description = "Invalid privacy level or no files were sent."),
        (status = 403, description = "Only the owner or an admin may upload to this album."),
        (status = 404, description = "Album not found."),
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip_all, fields(uploader = user.id, %album_id))]
pub async fn upload_photos_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<Viewer>,
    Path(album_id): Path<AlbumId>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, UploadError> {
    let mut privacy: Option<String> = None;
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        match field.name() {
            Some("privacy") => {
                let value = field.text().await.map_err(multipart_error)?;
                let value = value.trim();
                if !value.is_empty() {
                    privacy = Some(value.to_owned());
                }
            }
            Some("photos") => files.push(read_file_field(field).await?),
            _ => {}
        }
    }

    let response = upload_photos(
        &context.db,
        &context.pipeline,
        &user,
        album_id,
        privacy.as_deref(),
        files,
        &context.shutdown,
    )
    .await?;
    Ok(Json(response))
}
