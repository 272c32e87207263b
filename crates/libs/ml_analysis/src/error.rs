use language_model::ChatError;
use thiserror::Error;

/// Anything that can go wrong while talking to an analysis backend.
/// Never leaves [`ImageAnalysisProvider::analyze`](crate::ImageAnalysisProvider::analyze).
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Chat completion failed: {0}")]
    Chat(#[from] ChatError),

    #[error("Invalid JSON in response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Backend returned status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl AnalysisError {
    /// Reads an unsuccessful response into a [`AnalysisError::Status`].
    pub async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Self::Status { status, body }
    }
}
