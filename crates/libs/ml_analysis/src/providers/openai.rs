use crate::{AnalysisError, ImageAnalysis, ImageAnalysisProvider, ImageRef};
use app_state::OpenAiAnalyzerSettings;
use async_trait::async_trait;
use language_model::ChatClient;
use serde::Deserialize;
use std::time::Duration;

const CURATOR_PROMPT: &str = "You are a professional photo curator. Analyze this image and \
provide: 1) A short, descriptive title (max 60 chars), 2) A detailed description (2-3 \
sentences), 3) Relevant tags (max 10 tags). Format your response as JSON with keys: title, \
description, tags (array).";

#[derive(Deserialize)]
struct CuratorReply {
    title: Option<String>,
    description: Option<String>,
    #[serde(default)]
    tags: CuratorTags,
}

/// Models sometimes answer with a comma separated string instead of an array.
#[derive(Deserialize, Default)]
#[serde(untagged)]
enum CuratorTags {
    List(Vec<String>),
    Joined(String),
    #[default]
    Missing,
}

impl From<CuratorTags> for Vec<String> {
    fn from(tags: CuratorTags) -> Self {
        match tags {
            CuratorTags::List(list) => list,
            CuratorTags::Joined(joined) => joined.split(',').map(str::to_owned).collect(),
            CuratorTags::Missing => Self::new(),
        }
    }
}

/// Parses the curator reply, tolerating markdown code fences around the JSON.
pub fn parse_curator_reply(content: &str) -> Result<ImageAnalysis, AnalysisError> {
    let cleaned = content.replace("```json", "").replace("```", "");
    let reply: CuratorReply = serde_json::from_str(cleaned.trim())?;
    Ok(ImageAnalysis {
        name: reply.title,
        description: reply.description,
        tags: reply.tags.into(),
    })
}

/// Chat-completions vision model, the image is sent inline as a base64 data URL.
pub struct OpenAiVisionProvider {
    client: ChatClient,
}

impl OpenAiVisionProvider {
    pub fn new(settings: &OpenAiAnalyzerSettings) -> Result<Self, AnalysisError> {
        let client = ChatClient::with_base_url(settings.base_url.clone())
            .model(settings.model.clone())
            .api_key(settings.api_key.clone())
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .max_tokens(500)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ImageAnalysisProvider for OpenAiVisionProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn try_analyze(&self, image: ImageRef<'_>) -> Result<ImageAnalysis, AnalysisError> {
        let reply = self
            .client
            .chat(CURATOR_PROMPT)
            .images(&[image.bytes])
            .call()
            .await?;
        parse_curator_reply(&reply)
    }
}
