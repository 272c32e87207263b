use base64::{Engine as _, engine::general_purpose};
use bon::bon;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::debug;
use url::Url;

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("API error (status {status}): {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("The model returned no content")]
    EmptyResponse,
}

pub type ChatResult<T> = Result<T, ChatError>;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Message {
    pub role: String,
    pub content: MessageContent,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<MessagePart>),
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "type")]
pub enum MessagePart {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ImageUrl {
    pub url: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    stream: bool,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
pub struct ChatFullResponse {
    pub choices: Vec<FullChoice>,
}

#[derive(Deserialize)]
pub struct FullChoice {
    pub message: FullMessage,
}

#[derive(Deserialize)]
pub struct FullMessage {
    pub content: Option<String>,
}

/// Client for an OpenAI-compatible `/v1/chat/completions` endpoint.
#[derive(Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: Option<String>,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

/// Inlines image bytes as a `data:` URL, sniffing the mime type from magic bytes.
#[must_use]
pub fn image_data_url(bytes: &[u8]) -> String {
    let mime_type = infer::get(bytes).map_or("image/jpeg", |kind| kind.mime_type());
    let b64 = general_purpose::STANDARD.encode(bytes);
    format!("data:{mime_type};base64,{b64}")
}

#[bon]
impl ChatClient {
    #[builder(start_fn = with_base_url)]
    pub fn new(
        #[builder(start_fn)] base_url: Url,
        model: Option<String>,
        api_key: Option<String>,
        timeout: Option<Duration>,
        temperature: Option<f32>,
        max_tokens: Option<u32>,
    ) -> ChatResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout.unwrap_or(Duration::from_secs(60)))
            .build()?;
        Ok(Self {
            http,
            base_url,
            api_key: api_key.filter(|k| !k.is_empty()),
            model: model.unwrap_or_default(),
            temperature: temperature.unwrap_or(0.3),
            max_tokens: max_tokens.unwrap_or(500),
        })
    }

    #[must_use]
    pub fn prepare_message(prompt: &str, images: &[&[u8]]) -> Message {
        let mut parts = vec![MessagePart::Text {
            text: prompt.to_string(),
        }];
        for bytes in images {
            parts.push(MessagePart::ImageUrl {
                image_url: ImageUrl {
                    url: image_data_url(bytes),
                },
            });
        }
        Message {
            role: "user".to_string(),
            content: MessageContent::Parts(parts),
        }
    }

    /// Sends one user turn with optional inline images and returns the reply text.
    #[builder]
    pub async fn chat(
        &self,
        #[builder(start_fn)] prompt: &str,
        images: Option<&[&[u8]]>,
    ) -> ChatResult<String> {
        let msg = Self::prepare_message(prompt, images.unwrap_or_default());
        self.call(vec![msg]).await
    }

    pub async fn call(&self, messages: Vec<Message>) -> ChatResult<String> {
        let req_body = self.build_request(messages);
        let url = self.base_url.join("v1/chat/completions")?;
        let started = Instant::now();

        let mut request = self.http.post(url).json(&req_body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(ChatError::Api {
                status: response.status(),
                body: response.text().await.unwrap_or_default(),
            });
        }
        let full: ChatFullResponse = response.json().await?;
        debug!(
            model = %self.model,
            elapsed_ms = started.elapsed().as_millis(),
            "Chat completion received"
        );

        full.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(ChatError::EmptyResponse)
    }

    fn build_request(&self, messages: Vec<Message>) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages,
            stream: false,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use color_eyre::Result;

    #[test]
    fn test_message_serializes_openai_shape() -> Result<()> {
        let png_magic: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];
        let msg = ChatClient::prepare_message("Describe this", &[png_magic]);
        let json = serde_json::to_value(&msg)?;

        assert_eq!(json["role"], "user");
        assert_eq!(json["content"][0]["type"], "text");
        assert_eq!(json["content"][0]["text"], "Describe this");
        assert_eq!(json["content"][1]["type"], "image_url");
        let url = json["content"][1]["image_url"]["url"]
            .as_str()
            .unwrap_or_default();
        assert!(url.starts_with("data:image/png;base64,"));
        Ok(())
    }

    #[test]
    fn test_unknown_bytes_default_to_jpeg() {
        assert!(image_data_url(b"????").starts_with("data:image/jpeg;base64,"));
    }
}
