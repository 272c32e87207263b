use crate::api::access::AccessError;
use crate::database::DbError;
use crate::storage::StorageError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum PhotosError {
    #[error("Photo not found: {0}")]
    PhotoNotFound(String),

    #[error("Stored file missing: {0}")]
    FileNotFound(String),

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("Storage error: {0}")]
    Storage(StorageError),

    #[error("Database error: {0}")]
    Database(DbError),
}

impl IntoResponse for PhotosError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            Self::Access(e) => return e.into_response(),
            Self::PhotoNotFound(photo_id) => {
                warn!("Photo not found: {photo_id}");
                (
                    StatusCode::NOT_FOUND,
                    format!("Photo not found: {photo_id}"),
                )
            }
            Self::FileNotFound(name) => {
                warn!("Stored file missing: {name}");
                (StatusCode::NOT_FOUND, "Image file not found.".to_string())
            }
            Self::Storage(e) => {
                error!("Reading photo failed: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected internal error occurred.".to_string(),
                )
            }
            Self::Database(e) => {
                error!("Photo query failed: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred.".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

impl From<DbError> for PhotosError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { id, .. } => Self::PhotoNotFound(id),
            err => Self::Database(err),
        }
    }
}

impl From<StorageError> for PhotosError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(name) => Self::FileNotFound(name),
            err => Self::Storage(err),
        }
    }
}
