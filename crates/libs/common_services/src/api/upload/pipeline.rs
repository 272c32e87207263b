use crate::api::upload::error::{FileError, UploadError};
use crate::api::upload::interfaces::{BatchReport, FileBlob, FileFailure};
use crate::api::upload::naming::{
    derivative_filename, detect_image_type, fallback_name, storage_filename,
};
use crate::api::upload::tags::TagReconciler;
use crate::database::{AlbumStore, Database, DbError, PhotoStore};
use crate::storage::MediaStorage;
use app_state::IngestionSettings;
use common_types::{
    AlbumId, CameraMetadata, Photo, PrivacyLevel, UserId, ValidationError, Viewer,
};
use exif_metadata::extract_metadata;
use futures_util::{StreamExt, stream};
use generate_thumbnails::{Derivative, generate_derivatives};
use image::ImageFormat;
use ml_analysis::{ImageAnalysisProvider, ImageRef};
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

/// Turns uploaded files into stored photos with derivatives, metadata and tags.
#[derive(Clone)]
pub struct IngestionPipeline {
    db: Database,
    storage: Arc<dyn MediaStorage>,
    analyzer: Arc<dyn ImageAnalysisProvider>,
    max_upload_bytes: u64,
    allowed_extensions: Vec<String>,
    concurrency: usize,
}

impl IngestionPipeline {
    #[must_use]
    pub fn new(
        db: Database,
        storage: Arc<dyn MediaStorage>,
        analyzer: Arc<dyn ImageAnalysisProvider>,
        settings: &IngestionSettings,
    ) -> Self {
        Self {
            db,
            storage,
            analyzer,
            max_upload_bytes: settings.max_upload_bytes,
            allowed_extensions: settings.allowed_extensions.clone(),
            concurrency: settings.concurrency.max(1),
        }
    }

    /// Ingests every file independently, up to `concurrency` at a time.
    ///
    /// A failing file is reported and never stops the batch. Files not yet started when
    /// `cancel` fires are reported as cancelled. The album's photo count is refreshed once,
    /// after the last file.
    #[instrument(skip_all, fields(album_id = %album_id, files = files.len()))]
    pub async fn ingest(
        &self,
        files: Vec<FileBlob>,
        album_id: AlbumId,
        uploader: &Viewer,
        privacy: PrivacyLevel,
        cancel: &CancellationToken,
    ) -> Result<BatchReport, UploadError> {
        let started = Instant::now();
        let owner_id = uploader.id;

        let outcomes: Vec<(String, Result<Photo, FileError>)> = stream::iter(files)
            .map(|file| async move {
                let outcome = if cancel.is_cancelled() {
                    Err(FileError::Cancelled)
                } else {
                    self.ingest_file(&file, album_id, owner_id, privacy).await
                };
                (file.original_name, outcome)
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let mut report = BatchReport::default();
        for (filename, outcome) in outcomes {
            match outcome {
                Ok(photo) => {
                    report.success_count += 1;
                    report.created_photos.push(photo.id);
                }
                Err(e) => {
                    report.failure_count += 1;
                    report.per_file_errors.push(FileFailure {
                        filename,
                        reason: e.to_string(),
                    });
                }
            }
        }

        let photo_count = AlbumStore::refresh_photo_count(&self.db, album_id).await?;
        info!(
            success_count = report.success_count,
            failure_count = report.failure_count,
            photo_count,
            duration_ms = started.elapsed().as_millis(),
            "Ingestion batch finished"
        );
        Ok(report)
    }

    fn check_upload(&self, file: &FileBlob) -> Result<(ImageFormat, &'static str), FileError> {
        let size = file.bytes.len() as u64;
        if size > self.max_upload_bytes {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_upload_bytes,
            }
            .into());
        }
        let (format, extension) =
            detect_image_type(&file.bytes).ok_or(ValidationError::UnsupportedFileType)?;
        if !self.allowed_extensions.iter().any(|e| e == extension) {
            return Err(ValidationError::UnsupportedFileType.into());
        }
        Ok((format, extension))
    }

    async fn ingest_file(
        &self,
        file: &FileBlob,
        album_id: AlbumId,
        owner_id: UserId,
        privacy: PrivacyLevel,
    ) -> Result<Photo, FileError> {
        let original_name = file.original_name.as_str();
        let result = self
            .process_file(file, album_id, owner_id, privacy)
            .await;
        match &result {
            Ok(photo) => info!(original_name, photo_id = %photo.id, filename = %photo.filename, "File ingested"),
            Err(e) => warn!(original_name, "File rejected: {e}"),
        }
        result
    }

    async fn process_file(
        &self,
        file: &FileBlob,
        album_id: AlbumId,
        owner_id: UserId,
        privacy: PrivacyLevel,
    ) -> Result<Photo, FileError> {
        let (format, extension) = self.check_upload(file)?;
        let storage_name = storage_filename(&file.original_name, extension);
        self.storage.write(&storage_name, &file.bytes).await?;

        let (derivatives, camera) = self.derive_and_extract(&storage_name, file, format).await;
        let analysis = self
            .analyzer
            .analyze(ImageRef {
                stored_filename: &storage_name,
                bytes: &file.bytes,
            })
            .await;

        let name = analysis
            .name
            .unwrap_or_else(|| fallback_name(&file.original_name, &storage_name));
        let mut photo = Photo::new(owner_id, name, storage_name.clone());
        photo.description = analysis.description;
        photo.set_privacy(privacy);
        if let Some(captured_at) = camera.captured_at {
            photo.created_at = captured_at.and_utc();
        }
        photo.camera = camera;

        let mut stored = vec![storage_name.clone()];
        for derivative in derivatives {
            let name = derivative_filename(&storage_name, derivative.size);
            match self.storage.write(&name, &derivative.bytes).await {
                Ok(()) => {
                    stored.push(name.clone());
                    photo.set_derivative(derivative.size, name);
                }
                Err(e) => warn!(filename = %name, "Could not store derivative: {e}"),
            }
        }

        let photo = match self.insert_linked(photo, album_id).await {
            Ok(photo) => photo,
            Err(e) => {
                self.discard_files(&stored).await;
                return Err(e.into());
            }
        };
        if let Err(e) = TagReconciler::reconcile(&self.db, photo.id, &analysis.tags).await {
            warn!(photo_id = %photo.id, "Tag reconciliation failed: {e}");
        }
        Ok(photo)
    }

    /// Inserts the photo and links it to the album. A photo that cannot be linked is removed again.
    async fn insert_linked(&self, photo: Photo, album_id: AlbumId) -> Result<Photo, DbError> {
        let photo = PhotoStore::insert(&self.db, photo).await?;
        if let Err(e) = AlbumStore::add_photos(&self.db, album_id, &[photo.id]).await {
            PhotoStore::remove(&self.db, photo.id).await;
            return Err(e);
        }
        Ok(photo)
    }

    async fn discard_files(&self, names: &[String]) {
        for name in names {
            if let Err(e) = self.storage.delete(name).await {
                warn!(filename = %name, "Could not remove stored file: {e}");
            }
        }
    }

    /// Resizes and reads metadata on the blocking pool. Both are best-effort.
    async fn derive_and_extract(
        &self,
        storage_name: &str,
        file: &FileBlob,
        format: ImageFormat,
    ) -> (Vec<Derivative>, CameraMetadata) {
        let bytes = file.bytes.clone();
        let result = tokio::task::spawn_blocking(move || {
            (generate_derivatives(&bytes, format), extract_metadata(&bytes))
        })
        .await;

        match result {
            Ok((Ok(derivatives), camera)) => (derivatives, camera),
            Ok((Err(e), camera)) => {
                warn!(filename = storage_name, "Derivative generation failed, keeping the original only: {e}");
                (Vec::new(), camera)
            }
            Err(e) => {
                warn!(filename = storage_name, "Derivative task failed: {e}");
                (Vec::new(), CameraMetadata::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::TagStore;
    use crate::test_utils::{
        FailingAnalyzer, FlakyStorage, MemoryStorage, StaticAnalyzer, blob, jpeg_bytes,
        jpeg_with_capture_time, pipeline_with, png_bytes, viewer,
    };
    use chrono::NaiveDate;
    use color_eyre::Result;
    use common_types::{Album, ImageSize, ViewerRole};
    use ml_analysis::{DisabledProvider, ImageAnalysis};

    async fn album(db: &Database) -> Result<Album> {
        Ok(AlbumStore::create(db, Album::new(1, "Batch".to_owned(), PrivacyLevel::Public)).await?)
    }

    fn owner() -> Viewer {
        viewer(1, ViewerRole::User)
    }

    #[tokio::test]
    async fn test_storage_failures_are_counted_per_file() -> Result<()> {
        let db = Database::new();
        let album = album(&db).await?;
        let storage = Arc::new(FlakyStorage {
            prefix: "broken",
            ..Default::default()
        });
        let pipeline = pipeline_with(&db, storage, Arc::new(DisabledProvider));
        let files = vec![
            blob("one.jpg", jpeg_bytes(16, 16)),
            blob("broken one.jpg", jpeg_bytes(16, 16)),
            blob("two.png", png_bytes(16, 16)),
            blob("broken two.png", png_bytes(16, 16)),
            blob("three.jpg", jpeg_bytes(16, 16)),
        ];

        let report = pipeline
            .ingest(files, album.id, &owner(), PrivacyLevel::Public, &CancellationToken::new())
            .await?;

        assert_eq!(report.success_count + report.failure_count, 5);
        assert_eq!(report.failure_count, 2);
        let mut failed: Vec<&str> = report
            .per_file_errors
            .iter()
            .map(|f| f.filename.as_str())
            .collect();
        failed.sort_unstable();
        assert_eq!(failed, vec!["broken one.jpg", "broken two.png"]);
        assert_eq!(report.created_photos.len(), 3);

        let album = AlbumStore::find_by_id(&db, album.id).await?;
        assert_eq!(album.photo_count, 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_shared_new_tag_is_created_once() -> Result<()> {
        let db = Database::new();
        let album = album(&db).await?;
        let analyzer = StaticAnalyzer(ImageAnalysis {
            name: Some("Evening sky".to_owned()),
            description: Some("An orange sky.".to_owned()),
            tags: vec!["sunset".to_owned(), " sky ".to_owned()],
        });
        let pipeline = pipeline_with(&db, Arc::new(MemoryStorage::default()), Arc::new(analyzer));
        let files = vec![
            blob("a.jpg", jpeg_bytes(16, 16)),
            blob("b.jpg", jpeg_bytes(16, 16)),
        ];

        let report = pipeline
            .ingest(files, album.id, &owner(), PrivacyLevel::Friend, &CancellationToken::new())
            .await?;
        assert_eq!(report.success_count, 2);

        let sunsets: Vec<_> = TagStore::list_all(&db)
            .await
            .into_iter()
            .filter(|t| t.name == "sunset")
            .collect();
        assert_eq!(sunsets.len(), 1);
        for photo_id in &report.created_photos {
            let tags = PhotoStore::tags_of(&db, *photo_id).await;
            assert!(tags.iter().any(|t| t.id == sunsets[0].id));
            let photo = PhotoStore::find_by_id(&db, *photo_id).await?;
            assert_eq!(photo.name, "Evening sky");
            assert_eq!(photo.view_privacy.level(), Some(PrivacyLevel::Friend));
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_analysis_falls_back_to_file_name() -> Result<()> {
        let db = Database::new();
        let album = album(&db).await?;
        let pipeline = pipeline_with(
            &db,
            Arc::new(MemoryStorage::default()),
            Arc::new(FailingAnalyzer),
        );

        let report = pipeline
            .ingest(
                vec![blob("Lake Como 2019.jpg", jpeg_bytes(16, 16))],
                album.id,
                &owner(),
                PrivacyLevel::Public,
                &CancellationToken::new(),
            )
            .await?;

        let photo = PhotoStore::find_by_id(&db, report.created_photos[0]).await?;
        assert_eq!(photo.name, "Lake Como 2019");
        assert_eq!(photo.description, None);
        assert!(PhotoStore::tags_of(&db, photo.id).await.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_unlinkable_photo_leaves_nothing_behind() -> Result<()> {
        let db = Database::new();
        let storage = Arc::new(MemoryStorage::default());
        let analyzer = StaticAnalyzer(ImageAnalysis {
            tags: vec!["lake".to_owned()],
            ..ImageAnalysis::default()
        });
        let pipeline = pipeline_with(&db, storage.clone(), Arc::new(analyzer));

        let result = pipeline
            .ingest(
                vec![blob("lake.jpg", jpeg_bytes(640, 480))],
                uuid::Uuid::new_v4(),
                &owner(),
                PrivacyLevel::Public,
                &CancellationToken::new(),
            )
            .await;

        assert!(matches!(result, Err(UploadError::AlbumNotFound(_))));
        assert!(db.read().await.photos.is_empty());
        assert!(TagStore::list_all(&db).await.is_empty());
        assert!(storage.names().await.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_rejects_unsupported_and_oversized_files() -> Result<()> {
        let db = Database::new();
        let album = album(&db).await?;
        let storage = Arc::new(MemoryStorage::default());
        let pipeline = pipeline_with(&db, storage.clone(), Arc::new(DisabledProvider));
        let oversized = vec![0xFF; 2 * 1024 * 1024];

        let report = pipeline
            .ingest(
                vec![
                    blob("notes.jpg", b"just some text".to_vec()),
                    blob("huge.jpg", oversized),
                ],
                album.id,
                &owner(),
                PrivacyLevel::Public,
                &CancellationToken::new(),
            )
            .await?;

        assert_eq!(report.failure_count, 2);
        assert!(storage.names().await.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_derivatives_and_capture_time() -> Result<()> {
        let db = Database::new();
        let album = album(&db).await?;
        let storage = Arc::new(MemoryStorage::default());
        let pipeline = pipeline_with(&db, storage.clone(), Arc::new(DisabledProvider));
        let bytes = jpeg_with_capture_time(2000, 1000, "2019:07:14 18:30:00");

        let report = pipeline
            .ingest(
                vec![blob("bastille.jpg", bytes)],
                album.id,
                &owner(),
                PrivacyLevel::Public,
                &CancellationToken::new(),
            )
            .await?;
        let photo = PhotoStore::find_by_id(&db, report.created_photos[0]).await?;

        let expected = NaiveDate::from_ymd_opt(2019, 7, 14)
            .and_then(|d| d.and_hms_opt(18, 30, 0))
            .map(|t| t.and_utc());
        assert_eq!(Some(photo.created_at), expected);
        assert!(photo.uploaded_at > photo.created_at);

        let names = storage.names().await;
        assert_eq!(names.len(), 4);
        for size in ImageSize::DERIVATIVES {
            let name = photo.filename_for(size);
            assert_ne!(name, photo.filename);
            assert!(names.iter().any(|n| n == name));
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_cancelled_batch_reports_every_file() -> Result<()> {
        let db = Database::new();
        let album = album(&db).await?;
        let pipeline = pipeline_with(
            &db,
            Arc::new(MemoryStorage::default()),
            Arc::new(DisabledProvider),
        );
        let cancel = CancellationToken::new();
        cancel.cancel();

        let report = pipeline
            .ingest(
                vec![
                    blob("a.jpg", jpeg_bytes(8, 8)),
                    blob("b.jpg", jpeg_bytes(8, 8)),
                ],
                album.id,
                &owner(),
                PrivacyLevel::Public,
                &cancel,
            )
            .await?;

        assert_eq!(report.success_count, 0);
        assert_eq!(report.failure_count, 2);
        assert!(
            report
                .per_file_errors
                .iter()
                .all(|f| f.reason == "ingestion cancelled")
        );
        Ok(())
    }
}
