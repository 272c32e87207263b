use crate::{AppSettings, RawSettings};
use color_eyre::eyre::Result;
use config::{Config, Environment, File, FileFormat};
use std::fs;
use std::path::Path;

const SETTINGS_PATH: &str = "config/settings.yaml";

fn environment_source() -> Environment {
    Environment::with_prefix("APP")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("api.allowed_origins")
        .with_list_parse_key("ingestion.allowed_extensions")
}

/// Loads settings from `config/settings.yaml`, overridden by `APP__*` environment variables.
pub fn load_app_settings() -> Result<AppSettings> {
    // Need to load from dotenv to get it to overwrite secrets from env.
    dotenv::from_path(".env").ok();
    let config_path = Path::new(SETTINGS_PATH).canonicalize()?;

    let raw_settings = Config::builder()
        .add_source(File::from(config_path))
        .add_source(environment_source())
        .build()?
        .try_deserialize::<RawSettings>()?;
    let settings: AppSettings = raw_settings.into();

    fs::create_dir_all(&settings.ingestion.upload_folder)?;

    Ok(settings)
}

/// Parses settings from a YAML string without touching the environment or the file system.
pub fn settings_from_yaml(yaml: &str) -> Result<AppSettings> {
    let raw_settings = Config::builder()
        .add_source(File::from_str(yaml, FileFormat::Yaml))
        .build()?
        .try_deserialize::<RawSettings>()?;
    Ok(raw_settings.into())
}
