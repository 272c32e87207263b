use crate::api::upload::error::UploadError;
use crate::api::upload::interfaces::{BatchReport, FileBlob, UploadResponse};
use crate::api::upload::pipeline::IngestionPipeline;
use crate::database::{AlbumStore, Database};
use common_types::{AlbumId, PrivacyLevel, ValidationError, Viewer};
use tokio_util::sync::CancellationToken;
use tracing::instrument;

fn summary_messages(report: &BatchReport, album_name: &str) -> Vec<String> {
    let mut messages = Vec::with_capacity(report.per_file_errors.len() + 1);
    if report.success_count > 0 {
        messages.push(format!(
            "Successfully uploaded {} photo(s) to \"{album_name}\"",
            report.success_count
        ));
    }
    messages.extend(
        report
            .per_file_errors
            .iter()
            .map(|f| format!("File '{}': {}", f.filename, f.reason)),
    );
    messages
}

/// Uploads a batch of photos into an album owned by `uploader`.
///
/// `privacy` applies to every photo of the batch and defaults to `public`.
#[instrument(skip(db, pipeline, files, cancel), fields(uploader = uploader.id, files = files.len()))]
pub async fn upload_photos(
    db: &Database,
    pipeline: &IngestionPipeline,
    uploader: &Viewer,
    album_id: AlbumId,
    privacy: Option<&str>,
    files: Vec<FileBlob>,
    cancel: &CancellationToken,
) -> Result<UploadResponse, UploadError> {
    let album = AlbumStore::find_by_id(db, album_id).await?;
    if album.owner_id != uploader.id && !uploader.is_admin() {
        return Err(UploadError::Forbidden(format!(
            "user {} cannot upload to album {}",
            uploader.id, album.id
        )));
    }

    let privacy = match privacy.map(str::trim).filter(|p| !p.is_empty()) {
        Some(value) => value.parse::<PrivacyLevel>()?,
        None => PrivacyLevel::Public,
    };
    if files.is_empty() {
        return Err(ValidationError::Other("no files were uploaded".to_owned()).into());
    }

    let report = pipeline
        .ingest(files, album.id, uploader, privacy, cancel)
        .await?;
    let messages = summary_messages(&report, &album.name);
    Ok(UploadResponse { report, messages })
}
