use serde::Deserialize;
use std::path::PathBuf;
use url::Url;

#[derive(Debug, Deserialize, Clone)]
pub struct RawSettings {
    pub ingestion: RawIngestionSettings,
    pub access: AccessSettings,
    pub sharing: SharingSettings,
    pub logging: LoggingSettings,
    pub api: ApiSettings,
    pub secrets: SecretSettings,
}

/// Upload storage and ingestion pipeline settings, as written in the settings file.
#[derive(Debug, Deserialize, Clone)]
pub struct RawIngestionSettings {
    /// Folder that receives originals and their derivatives.
    pub upload_folder: PathBuf,
    /// Files larger than this are rejected before anything is written.
    pub max_upload_bytes: u64,
    /// Lowercase extensions of the image types that may be uploaded.
    pub allowed_extensions: Vec<String>,
    /// How many files of one batch are processed at the same time.
    pub concurrency: usize,
    pub analyzer: AnalyzerSettings,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AnalyzerProvider {
    Custom,
    OpenAi,
    Google,
    Disabled,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AnalyzerSettings {
    pub provider: AnalyzerProvider,
    pub custom: CustomAnalyzerSettings,
    pub openai: OpenAiAnalyzerSettings,
    pub google: GoogleAnalyzerSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CustomAnalyzerSettings {
    pub url: Url,
    pub api_key: String,
    pub timeout_seconds: u64,
    pub max_tags: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OpenAiAnalyzerSettings {
    pub base_url: Url,
    pub api_key: String,
    pub model: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GoogleAnalyzerSettings {
    pub base_url: Url,
    pub api_key: String,
    pub timeout_seconds: u64,
    /// Labels scoring at or below this are not turned into tags.
    pub min_label_score: f32,
    pub max_tags: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AccessSettings {
    /// Lets admins see `private` items of other owners. Off means private stays owner-only.
    pub admin_can_view_private: bool,
    /// Lifetime of the `album_access_*` cookie set after a ticket was redeemed.
    pub ticket_cookie_days: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SharingSettings {
    pub ticket_expiry_days: i64,
    pub mail_from: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    pub level: String,
}

const LOGGED_CRATES: [&str; 5] = [
    "api",
    "app_state",
    "common_services",
    "ml_analysis",
    "tower_http",
];

impl LoggingSettings {
    /// `EnvFilter` directives used when `RUST_LOG` is not set.
    #[must_use]
    pub fn fallback_filter(&self) -> String {
        LOGGED_CRATES
            .iter()
            .map(|target| format!("{target}={}", self.level))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Configuration for the API server.
#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    pub host: String,
    pub port: u32,
    pub allowed_origins: Vec<String>,
    pub public_url: Url,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SecretSettings {
    pub jwt: String,
}
