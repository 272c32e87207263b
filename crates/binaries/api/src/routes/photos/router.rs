use crate::api_state::ApiContext;
use crate::routes::photos::handlers::{
    get_photo_handler, serve_photo_handler, serve_photo_size_handler,
};
use axum::{Router, routing::get};

pub fn photos_auth_optional_router() -> Router<ApiContext> {
    Router::new()
        .route("/photo/{photo_id}", get(get_photo_handler))
        .route("/photo/serve/{photo_id}", get(serve_photo_handler))
        .route("/photo/serve/{photo_id}/{size}", get(serve_photo_size_handler))
}
