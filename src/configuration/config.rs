use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, info};
use reqwest::Url;
use serde::Deserialize;

use super::cli::Cli;
use super::types::*;
use crate::backend::client::DEFAULT_BACKEND_URL;
use crate::error_handling::types::ConfigError;
use crate::storage::file_storage::DEFAULT_STORE_FILE;

/// Application configuration structure that defines all runtime parameters.
///
/// Read from an optional TOML file, then overridden by command-line flags and
/// their environment variables (see `Cli`). Every field has a default, so an
/// empty file or no file at all is a valid configuration.
///
/// # Examples
///
/// ```toml
/// backend_url = "http://localhost:5000"
/// store_path = "/var/lib/contraste/saved_images.json"
/// request_timeout_secs = 60
///
/// [ocr]
/// engine = "tesseract"
/// languages = "spa+eng"
/// ```
///
/// # Fields Overview
///
/// - `backend_url`: base URL of the extraction/OCR/analysis service
/// - `store_path`: JSON file holding the image collection
/// - `request_timeout_secs`: timeout applied to every HTTP call, none by default
/// - `ocr`: engine selection and Tesseract settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub backend_url: String,
    pub store_path: PathBuf,
    pub request_timeout_secs: Option<u64>,
    pub ocr: OcrConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            store_path: PathBuf::from(DEFAULT_STORE_FILE),
            request_timeout_secs: None,
            ocr: OcrConfig::default(),
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        info!("Reading configuration from {}", path.display());
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::TomlError(e.to_string()))
    }

    /// Builds the effective configuration for a command line: file (if any),
    /// then flag/env overrides, then validation.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(cli);
        config.validate()?;
        debug!("Effective configuration: {:?}", config);
        Ok(config)
    }

    pub fn apply_overrides(&mut self, cli: &Cli) {
        if let Some(url) = &cli.backend_url {
            self.backend_url = url.clone();
        }
        if let Some(path) = &cli.store {
            self.store_path = path.clone();
        }
        if let Some(engine) = cli.ocr {
            self.ocr.engine = engine;
        }
        if let Some(secs) = cli.timeout_secs {
            self.request_timeout_secs = Some(secs);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.backend_url)
            .map_err(|e| ConfigError::BadBackendUrl(format!("{}: {}", self.backend_url, e)))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::BadBackendUrl(format!(
                "{}: scheme must be http or https",
                self.backend_url
            )));
        }
        if self.request_timeout_secs == Some(0) {
            return Err(ConfigError::NotInRange(
                "request_timeout_secs must be greater than 0".into(),
            ));
        }
        if self.store_path.as_os_str().is_empty() {
            return Err(ConfigError::MissingValue("store_path".into()));
        }
        if self.ocr.engine == OcrEngineKind::Tesseract && self.ocr.languages.trim().is_empty() {
            return Err(ConfigError::MissingValue("ocr.languages".into()));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
