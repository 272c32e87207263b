use crate::{AnalysisError, ImageAnalysis, ImageAnalysisProvider, ImageRef};
use app_state::GoogleAnalyzerSettings;
use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use url::Url;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<AnnotateResult>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateResult {
    #[serde(default)]
    label_annotations: Vec<LabelAnnotation>,
    error: Option<AnnotateError>,
}

#[derive(Deserialize)]
struct AnnotateError {
    message: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LabelAnnotation {
    pub description: String,
    pub score: f32,
}

/// Google Cloud Vision label detection. Labels become tags, the title and
/// description are composed from the strongest labels.
pub struct GoogleVisionProvider {
    http: reqwest::Client,
    endpoint: Url,
    api_key: String,
    min_label_score: f32,
    max_tags: usize,
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Keeps labels scoring above `min_score`, lowercased, at most `max_tags`.
#[must_use]
pub fn labels_to_analysis(
    labels: &[LabelAnnotation],
    min_score: f32,
    max_tags: usize,
) -> ImageAnalysis {
    let tags: Vec<String> = labels
        .iter()
        .filter(|l| l.score > min_score)
        .map(|l| l.description.to_lowercase())
        .take(max_tags)
        .collect();

    let name = (!tags.is_empty()).then(|| {
        tags.iter()
            .take(2)
            .map(|t| capitalize(t))
            .collect::<Vec<_>>()
            .join(" ")
    });
    let description = (!tags.is_empty()).then(|| {
        let featured: Vec<&str> = tags.iter().take(3).map(String::as_str).collect();
        format!("An image featuring {}.", featured.join(", "))
    });

    ImageAnalysis {
        name,
        description,
        tags,
    }
}

impl GoogleVisionProvider {
    pub fn new(settings: &GoogleAnalyzerSettings) -> Result<Self, AnalysisError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()?;
        Ok(Self {
            http,
            endpoint: settings.base_url.join("v1/images:annotate")?,
            api_key: settings.api_key.clone(),
            min_label_score: settings.min_label_score,
            max_tags: settings.max_tags,
        })
    }
}

#[async_trait]
impl ImageAnalysisProvider for GoogleVisionProvider {
    fn name(&self) -> &'static str {
        "google"
    }

    async fn try_analyze(&self, image: ImageRef<'_>) -> Result<ImageAnalysis, AnalysisError> {
        let body = json!({
            "requests": [{
                "image": { "content": general_purpose::STANDARD.encode(image.bytes) },
                "features": [{ "type": "LABEL_DETECTION", "maxResults": self.max_tags }],
            }]
        });
        let response = self
            .http
            .post(self.endpoint.clone())
            .query(&[("key", &self.api_key)])
            .json(&body)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(AnalysisError::from_response(response).await);
        }

        let data: AnnotateResponse = response.json().await?;
        let result = data
            .responses
            .into_iter()
            .next()
            .ok_or_else(|| AnalysisError::Malformed("no annotation result".to_owned()))?;
        if let Some(error) = result.error {
            return Err(AnalysisError::Malformed(error.message));
        }

        Ok(labels_to_analysis(
            &result.label_annotations,
            self.min_label_score,
            self.max_tags,
        ))
    }
}
