use crate::api_state::ApiContext;
use crate::auth::middlewares::common::extract_viewer;
use axum::{
    extract::{FromRequestParts, State},
    http::request::Parts,
};
use common_services::api::auth::error::AuthError;
use common_types::Viewer;

/// A signed-in viewer. Requests without a valid bearer token are rejected with 401.
#[derive(Clone, Debug)]
pub struct ApiUser(pub Viewer);

impl<S> FromRequestParts<S> for ApiUser
where
    S: Send + Sync,
    State<ApiContext>: FromRequestParts<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let viewer = extract_viewer(parts, state).await?;
        parts.extensions.insert(viewer.clone());
        Ok(Self(viewer))
    }
}
