use crate::api::access::DenyReason;
use crate::database::DbError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum AccessError {
    #[error("Access denied: {0}")]
    Denied(DenyReason),

    #[error("Ticket not found")]
    TicketNotFound,

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

fn log_error(error: &AccessError) {
    match error {
        AccessError::Denied(reason) => warn!("Access denied: {reason}"),
        AccessError::TicketNotFound => warn!("Access ticket not found"),
        AccessError::Database(e) => error!("Access check failed: {e}"),
    }
}

impl IntoResponse for AccessError {
    fn into_response(self) -> Response {
        log_error(&self);

        // The deny reason is only logged, callers get a generic message.
        let (status, error_message) = match self {
            Self::Denied(_) => (
                StatusCode::FORBIDDEN,
                "You do not have permission to view this item.",
            ),
            Self::TicketNotFound => (StatusCode::NOT_FOUND, "Ticket not found."),
            Self::Database(e) if e.is_not_found() => (StatusCode::NOT_FOUND, "Not found."),
            Self::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected internal error occurred.",
            ),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
