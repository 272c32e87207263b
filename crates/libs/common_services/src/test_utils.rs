#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::api::album::interfaces::ShareOptions;
use crate::api::upload::interfaces::FileBlob;
use crate::api::upload::pipeline::IngestionPipeline;
use crate::database::Database;
use crate::notify::{Invitation, NotifyError, ShareNotifier};
use crate::storage::{MediaStorage, StorageError};
use app_state::{AppSettings, settings_from_yaml};
use async_trait::async_trait;
use bytes::Bytes;
use common_types::{UserId, Viewer, ViewerRole};
use exif::experimental::Writer;
use exif::{Field, In, Tag, Value};
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb, Rgba};
use ml_analysis::{AnalysisError, ImageAnalysis, ImageAnalysisProvider, ImageRef};
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

const TEST_SETTINGS: &str = r"
ingestion:
  upload_folder: uploads/photos
  max_upload_bytes: 1048576
  allowed_extensions: [jpg, jpeg, png, gif, webp]
  concurrency: 4
  analyzer:
    provider: disabled
    custom:
      url: http://localhost:8000/analyze
      api_key: key
      timeout_seconds: 130
      max_tags: 10
    openai:
      base_url: https://api.openai.com
      api_key: key
      model: gpt-4o-mini
      timeout_seconds: 60
    google:
      base_url: https://vision.googleapis.com
      api_key: key
      timeout_seconds: 30
      min_label_score: 0.7
      max_tags: 10
access:
  admin_can_view_private: false
  ticket_cookie_days: 30
sharing:
  ticket_expiry_days: 30
  mail_from: gallery@example.com
logging:
  level: info
api:
  host: 127.0.0.1
  port: 9475
  allowed_origins: [http://localhost:9475]
  public_url: http://localhost:9475
secrets:
  jwt: test-secret
";

pub fn test_settings() -> AppSettings {
    settings_from_yaml(TEST_SETTINGS).expect("test settings parse")
}

pub fn viewer(id: UserId, role: ViewerRole) -> Viewer {
    Viewer {
        id,
        email: format!("user{id}@example.com"),
        role,
    }
}

pub fn share_options() -> ShareOptions {
    ShareOptions::from_settings(&test_settings())
}

pub fn pipeline_with(
    db: &Database,
    storage: Arc<dyn MediaStorage>,
    analyzer: Arc<dyn ImageAnalysisProvider>,
) -> IngestionPipeline {
    IngestionPipeline::new(db.clone(), storage, analyzer, &test_settings().ingestion)
}

// --- Images ---

fn encode(img: DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), format).unwrap();
    bytes
}

pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = ImageBuffer::from_fn(width, height, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 90]));
    encode(DynamicImage::ImageRgb8(img), ImageFormat::Jpeg)
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = ImageBuffer::from_fn(width, height, |x, _| Rgba([200, 30, (x % 256) as u8, 128]));
    encode(DynamicImage::ImageRgba8(img), ImageFormat::Png)
}

/// A JPEG carrying an EXIF `DateTimeOriginal` in an APP1 segment.
pub fn jpeg_with_capture_time(width: u32, height: u32, taken: &str) -> Vec<u8> {
    let field = Field {
        tag: Tag::DateTimeOriginal,
        ifd_num: In::PRIMARY,
        value: Value::Ascii(vec![taken.as_bytes().to_vec()]),
    };
    let mut writer = Writer::new();
    writer.push_field(&field);
    let mut tiff = Cursor::new(Vec::new());
    writer.write(&mut tiff, false).unwrap();
    let tiff = tiff.into_inner();

    let jpeg = jpeg_bytes(width, height);
    let mut payload = b"Exif\0\0".to_vec();
    payload.extend_from_slice(&tiff);
    let length = u16::try_from(payload.len() + 2).unwrap();

    let mut out = jpeg[..2].to_vec();
    out.extend_from_slice(&[0xFF, 0xE1]);
    out.extend_from_slice(&length.to_be_bytes());
    out.extend_from_slice(&payload);
    out.extend_from_slice(&jpeg[2..]);
    out
}

pub fn blob(name: &str, bytes: Vec<u8>) -> FileBlob {
    FileBlob {
        original_name: name.to_owned(),
        bytes: Bytes::from(bytes),
    }
}

// --- Storage ---

#[derive(Debug, Default)]
pub struct MemoryStorage {
    files: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    pub async fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.files.lock().await.keys().cloned().collect();
        names.sort();
        names
    }
}

#[async_trait]
impl MediaStorage for MemoryStorage {
    async fn write(&self, name: &str, bytes: &[u8]) -> Result<(), StorageError> {
        self.files
            .lock()
            .await
            .insert(name.to_owned(), bytes.to_vec());
        Ok(())
    }

    async fn read(&self, name: &str) -> Result<Vec<u8>, StorageError> {
        self.files
            .lock()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(name.to_owned()))
    }

    async fn delete(&self, name: &str) -> Result<(), StorageError> {
        self.files
            .lock()
            .await
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound(name.to_owned()))
    }
}

/// Refuses to write any file whose stored name starts with `prefix`.
#[derive(Debug, Default)]
pub struct FlakyStorage {
    pub prefix: &'static str,
    pub inner: MemoryStorage,
}

#[async_trait]
impl MediaStorage for FlakyStorage {
    async fn write(&self, name: &str, bytes: &[u8]) -> Result<(), StorageError> {
        if name.starts_with(self.prefix) {
            return Err(StorageError::Io {
                name: name.to_owned(),
                source: std::io::Error::other("disk full"),
            });
        }
        self.inner.write(name, bytes).await
    }

    async fn read(&self, name: &str) -> Result<Vec<u8>, StorageError> {
        self.inner.read(name).await
    }

    async fn delete(&self, name: &str) -> Result<(), StorageError> {
        self.inner.delete(name).await
    }
}

// --- Analysis ---

/// Returns the same analysis for every image.
pub struct StaticAnalyzer(pub ImageAnalysis);

#[async_trait]
impl ImageAnalysisProvider for StaticAnalyzer {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn try_analyze(&self, _: ImageRef<'_>) -> Result<ImageAnalysis, AnalysisError> {
        // Lets sibling files interleave.
        tokio::time::sleep(Duration::from_millis(5)).await;
        Ok(self.0.clone())
    }
}

pub struct FailingAnalyzer;

#[async_trait]
impl ImageAnalysisProvider for FailingAnalyzer {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn try_analyze(&self, _: ImageRef<'_>) -> Result<ImageAnalysis, AnalysisError> {
        Err(AnalysisError::Malformed("timed out".to_owned()))
    }
}

// --- Notifiers ---

#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Invitation>>,
}

impl RecordingNotifier {
    pub async fn sent(&self) -> Vec<Invitation> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl ShareNotifier for RecordingNotifier {
    async fn notify(&self, invitation: &Invitation) -> Result<(), NotifyError> {
        self.sent.lock().await.push(invitation.clone());
        Ok(())
    }
}

pub struct FailingNotifier;

#[async_trait]
impl ShareNotifier for FailingNotifier {
    async fn notify(&self, invitation: &Invitation) -> Result<(), NotifyError> {
        Err(NotifyError {
            recipient: invitation.to.clone(),
            reason: "mailbox unavailable".to_owned(),
        })
    }
}
