use crate::{
    AccessSettings, AnalyzerSettings, ApiSettings, LoggingSettings, RawSettings, SecretSettings,
    SharingSettings,
};
use serde::Deserialize;
use std::path::{Path, PathBuf, absolute};

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub ingestion: IngestionSettings,
    pub access: AccessSettings,
    pub sharing: SharingSettings,
    pub logging: LoggingSettings,
    pub api: ApiSettings,
    pub secrets: SecretSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct IngestionSettings {
    pub upload_folder: PathBuf,
    pub max_upload_bytes: u64,
    pub allowed_extensions: Vec<String>,
    pub concurrency: usize,
    pub analyzer: AnalyzerSettings,
}

impl From<RawSettings> for AppSettings {
    fn from(raw: RawSettings) -> Self {
        // Relative folders are resolved against the working directory once, at load time.
        let upload_folder =
            absolute(&raw.ingestion.upload_folder).unwrap_or(raw.ingestion.upload_folder);
        let ingestion = IngestionSettings {
            upload_folder,
            max_upload_bytes: raw.ingestion.max_upload_bytes,
            allowed_extensions: raw
                .ingestion
                .allowed_extensions
                .into_iter()
                .map(|e| e.to_lowercase())
                .collect(),
            concurrency: raw.ingestion.concurrency.max(1),
            analyzer: raw.ingestion.analyzer,
        };

        Self {
            ingestion,
            access: raw.access,
            sharing: raw.sharing,
            logging: raw.logging,
            api: raw.api,
            secrets: raw.secrets,
        }
    }
}

impl IngestionSettings {
    #[must_use]
    pub fn is_allowed_extension(&self, extension: &str) -> bool {
        let extension = extension.to_lowercase();
        self.allowed_extensions.contains(&extension)
    }

    #[must_use]
    pub fn is_allowed_file(&self, file: &Path) -> bool {
        file.extension()
            .map(|e| e.to_string_lossy())
            .is_some_and(|e| self.is_allowed_extension(&e))
    }
}
