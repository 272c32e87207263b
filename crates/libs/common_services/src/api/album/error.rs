use crate::api::access::AccessError;
use crate::database::DbError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use color_eyre::eyre;
use common_types::ValidationError;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum AlbumError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("Database error: {0}")]
    Database(DbError),

    #[error("internal error")]
    Internal(#[from] eyre::Report),
}

fn log_error(error: &AlbumError) {
    match error {
        AlbumError::Validation(e) => warn!("Album -> Bad request: {e}"),
        AlbumError::NotFound(id) => warn!("Album not found: {id}"),
        AlbumError::Forbidden(message) => warn!("Album -> Forbidden: {message}"),
        AlbumError::Database(e) => error!("Album -> Database error: {e}"),
        AlbumError::Internal(e) => error!("Album -> Internal error: {e:?}"),
        // Logged by its own response.
        AlbumError::Access(_) => {}
    }
}

impl IntoResponse for AlbumError {
    fn into_response(self) -> Response {
        log_error(&self);

        let (status, error_message) = match self {
            Self::Access(e) => return e.into_response(),
            Self::Validation(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            Self::NotFound(id) => (StatusCode::NOT_FOUND, format!("Album not found: {id}")),
            Self::Forbidden(message) => (StatusCode::FORBIDDEN, format!("Forbidden: {message}")),
            Self::Database(_) | Self::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected internal error occurred.".to_string(),
            ),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

impl From<DbError> for AlbumError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { id, .. } => Self::NotFound(id),
            DbError::Invalid { entity, reason } => {
                Self::Validation(ValidationError::Other(format!("invalid {entity}: {reason}")))
            }
            err @ DbError::Conflict { .. } => Self::Database(err),
        }
    }
}

impl From<url::ParseError> for AlbumError {
    fn from(err: url::ParseError) -> Self {
        Self::Internal(eyre::Report::new(err))
    }
}
