use bytes::Bytes;
use common_types::PhotoId;
use serde::Serialize;
use utoipa::ToSchema;

/// One uploaded file, as received.
#[derive(Debug, Clone)]
pub struct FileBlob {
    pub original_name: String,
    /// The type is detected from these, never taken from the client.
    pub bytes: Bytes,
}

#[derive(Serialize, ToSchema, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FileFailure {
    pub filename: String,
    pub reason: String,
}

/// Outcome of one ingestion batch. `success_count + failure_count` equals the number of files.
#[derive(Serialize, ToSchema, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub success_count: usize,
    pub failure_count: usize,
    pub per_file_errors: Vec<FileFailure>,
    #[schema(value_type = Vec<String>)]
    pub created_photos: Vec<PhotoId>,
}

#[derive(Serialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    #[serde(flatten)]
    pub report: BatchReport,
    /// Human readable summary, one line per outcome.
    pub messages: Vec<String>,
}
