use crate::database::DbError;
use crate::storage::StorageError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use color_eyre::eyre;
use common_types::ValidationError;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// Why one file of a batch was not ingested. The message is shown to the uploader.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("could not store file: {0}")]
    Storage(#[from] StorageError),

    #[error("could not save photo: {0}")]
    Database(#[from] DbError),

    #[error("ingestion cancelled")]
    Cancelled,
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Album not found: {0}")]
    AlbumNotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Database error: {0}")]
    Database(DbError),

    #[error("internal error")]
    Internal(#[from] eyre::Report),
}

fn log_error(error: &UploadError) {
    match error {
        UploadError::Validation(e) => warn!("Upload -> Bad request: {e}"),
        UploadError::AlbumNotFound(id) => warn!("Upload -> Album not found: {id}"),
        UploadError::Forbidden(message) => warn!("Upload -> Forbidden: {message}"),
        UploadError::Database(e) => error!("Upload -> Database error: {e}"),
        UploadError::Internal(e) => error!("Upload -> Internal error: {e:?}"),
    }
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        log_error(&self);

        let (status, error_message) = match self {
            Self::Validation(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            Self::AlbumNotFound(id) => (StatusCode::NOT_FOUND, format!("Album not found: {id}")),
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

impl From<DbError> for UploadError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { id, .. } => Self::AlbumNotFound(id),
            err => Self::Database(err),
        }
    }
}

impl From<tokio::task::JoinError> for UploadError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Internal(eyre::Report::new(err))
    }
}
