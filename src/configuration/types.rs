use std::path::PathBuf;

use serde::Deserialize;

use crate::ocr::tesseract::{DEFAULT_LANGUAGES, DEFAULT_TESSERACT_BINARY};

/// Which engine turns stored images into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OcrEngineKind {
    /// The backend's `/extract-text` endpoint
    #[default]
    Backend,
    /// A local `tesseract` executable
    Tesseract,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OcrConfig {
    pub engine: OcrEngineKind,
    pub tesseract_path: PathBuf,
    pub languages: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            engine: OcrEngineKind::Backend,
            tesseract_path: PathBuf::from(DEFAULT_TESSERACT_BINARY),
            languages: DEFAULT_LANGUAGES.to_string(),
        }
    }
}
