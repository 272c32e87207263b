use crate::api_state::ApiContext;
use crate::auth::middlewares::common::extract_viewer;
use axum::{
    extract::{FromRequestParts, State},
    http::request::Parts,
};
use common_services::api::auth::error::AuthError;
use common_types::Viewer;

/// The viewer if a bearer token was sent, `None` for anonymous requests.
/// A token that is present but invalid is still rejected.
#[derive(Clone, Debug)]
pub struct OptionalUser(pub Option<Viewer>);

impl OptionalUser {
    #[must_use]
    pub const fn viewer(&self) -> Option<&Viewer> {
        self.0.as_ref()
    }
}

impl<S> FromRequestParts<S> for OptionalUser
where
    S: Send + Sync,
    State<ApiContext>: FromRequestParts<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = match extract_viewer(parts, state).await {
            Ok(viewer) => Self(Some(viewer)),
            Err(AuthError::MissingToken) => Self(None),
            Err(e) => return Err(e),
        };
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}
