use crate::{AnalysisError, ImageAnalysis, ImageAnalysisProvider, ImageRef};
use app_state::CustomAnalyzerSettings;
use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use url::Url;

const TASKS: [&str; 3] = ["generate_title", "generate_description", "extract_tags"];

#[derive(Serialize)]
struct AnalyzeRequest<'a> {
    filename: &'a str,
    /// Standard base64 of the stored original.
    image_base64: String,
    tasks: [&'a str; 3],
    options: AnalyzeOptions<'a>,
}

#[derive(Serialize)]
struct AnalyzeOptions<'a> {
    max_tags: usize,
    description_length: &'a str,
}

#[derive(Deserialize)]
struct AnalyzeResponse {
    title: Option<String>,
    name: Option<String>,
    description: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
}

/// A self-hosted analysis service. The image travels inline, base64 encoded.
pub struct CustomHttpProvider {
    http: reqwest::Client,
    url: Url,
    api_key: String,
    max_tags: usize,
}

impl CustomHttpProvider {
    pub fn new(settings: &CustomAnalyzerSettings) -> Result<Self, AnalysisError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()?;
        Ok(Self {
            http,
            url: settings.url.clone(),
            api_key: settings.api_key.clone(),
            max_tags: settings.max_tags,
        })
    }
}

#[async_trait]
impl ImageAnalysisProvider for CustomHttpProvider {
    fn name(&self) -> &'static str {
        "custom"
    }

    async fn try_analyze(&self, image: ImageRef<'_>) -> Result<ImageAnalysis, AnalysisError> {
        let body = AnalyzeRequest {
            filename: image.stored_filename,
            image_base64: general_purpose::STANDARD.encode(image.bytes),
            tasks: TASKS,
            options: AnalyzeOptions {
                max_tags: self.max_tags,
                description_length: "medium",
            },
        };
        debug!(
            url = %self.url,
            filename = image.stored_filename,
            bytes = image.bytes.len(),
            "Custom analysis request"
        );

        let response = self
            .http
            .post(self.url.clone())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(AnalysisError::from_response(response).await);
        }

        let data: AnalyzeResponse = response.json().await?;
        Ok(ImageAnalysis {
            name: data.title.or(data.name),
            description: data.description,
            tags: data.tags,
        })
    }
}
