use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use color_eyre::eyre;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing authentication token")]
    MissingToken,

    #[error("Invalid authentication token")]
    InvalidToken,

    #[error("Internal server error: {0}")]
    Internal(#[from] eyre::Report),
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        Self::Internal(eyre::eyre!("JWT error: {err}"))
    }
}

fn log_error(error: &AuthError) {
    match error {
        AuthError::MissingToken | AuthError::InvalidToken => warn!("Auth failure: {error}"),
        AuthError::Internal(e) => error!("Internal auth error: {e:?}"),
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        log_error(&self);

        let (status, error_message) = match self {
            Self::MissingToken => (StatusCode::UNAUTHORIZED, "Missing authentication token."),
            Self::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid authentication token."),
            Self::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected internal error occurred.",
            ),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
