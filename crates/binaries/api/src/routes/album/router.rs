use crate::api_state::ApiContext;
use crate::routes::album::handlers::{
    create_album_handler, list_albums_handler, share_album_handler, upload_photos_handler,
    view_album_handler, view_album_with_ticket_handler,
};
use axum::extract::DefaultBodyLimit;
use axum::{
    Router,
    routing::{get, post},
};

pub fn album_auth_optional_router() -> Router<ApiContext> {
    Router::new()
        .route("/albums", get(list_albums_handler))
        .route("/album/{album_id}", get(view_album_handler))
        .route(
            "/album/{album_id}/t/{ticket}",
            get(view_album_with_ticket_handler),
        )
}

pub fn album_protected_router() -> Router<ApiContext> {
    Router::new()
        .route("/albums", post(create_album_handler))
        .route("/album/{album_id}/share", post(share_album_handler))
        // Size is enforced per file by the ingestion pipeline.
        .route(
            "/albums/{album_id}/photos",
            post(upload_photos_handler).layer(DefaultBodyLimit::disable()),
        )
}
