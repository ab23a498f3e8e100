use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};
use reqwest::{Client, Url};
use tempfile::NamedTempFile;
use tokio::process::Command;

use crate::error_handling::types::OcrError;
use crate::ocr::recognizer::TextRecognizer;

pub const DEFAULT_TESSERACT_BINARY: &str = "tesseract";
pub const DEFAULT_LANGUAGES: &str = "spa+eng";

/// Where the image bytes come from.
#[derive(Debug, PartialEq)]
enum ImageSource {
    Local(PathBuf),
    Remote(Url),
}

fn classify(image_url: &str) -> Result<ImageSource, OcrError> {
    match Url::parse(image_url) {
        Ok(url) if url.scheme() == "file" => url
            .to_file_path()
            .map(ImageSource::Local)
            .map_err(|_| OcrError::DownloadFailed(format!("bad file URL {}", image_url))),
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {
            Ok(ImageSource::Remote(url))
        }
        Ok(url) => Err(OcrError::DownloadFailed(format!(
            "unsupported scheme {}",
            url.scheme()
        ))),
        Err(_) => Ok(ImageSource::Local(PathBuf::from(image_url))),
    }
}

/// OCR with a local `tesseract` executable.
///
/// Remote images are downloaded into a temporary file that lives until the
/// engine exits.
pub struct TesseractEngine {
    client: Client,
    binary: PathBuf,
    languages: String,
}

impl TesseractEngine {
    pub fn new(
        binary: impl Into<PathBuf>,
        languages: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, OcrError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| OcrError::EngineUnavailable(e.to_string()))?;
        Ok(Self {
            client,
            binary: binary.into(),
            languages: languages.into(),
        })
    }

    async fn download(&self, url: Url) -> Result<NamedTempFile, OcrError> {
        debug!("Downloading {} for OCR", url);
        let bytes = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| OcrError::DownloadFailed(e.to_string()))?
            .bytes()
            .await
            .map_err(|e| OcrError::DownloadFailed(e.to_string()))?;

        let mut file = NamedTempFile::new().map_err(|e| OcrError::DownloadFailed(e.to_string()))?;
        file.write_all(&bytes)
            .map_err(|e| OcrError::DownloadFailed(e.to_string()))?;
        Ok(file)
    }

    async fn run(&self, image: &Path) -> Result<String, OcrError> {
        let output = Command::new(&self.binary)
            .arg(image)
            .arg("stdout")
            .arg("-l")
            .arg(&self.languages)
            .output()
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => OcrError::EngineUnavailable(format!(
                    "{} not found",
                    self.binary.display()
                )),
                _ => OcrError::EngineFailed(e.to_string()),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::EngineFailed(stderr.trim().to_string()));
        }

        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if text.is_empty() {
            return Err(OcrError::NoText);
        }
        Ok(text)
    }
}

#[async_trait]
impl TextRecognizer for TesseractEngine {
    async fn recognize(&self, image_url: &str) -> Result<String, OcrError> {
        let text = match classify(image_url)? {
            ImageSource::Local(path) => self.run(&path).await?,
            ImageSource::Remote(url) => {
                let file = self.download(url).await?;
                self.run(file.path()).await?
            }
        };
        info!("Recognized {} character(s) from {}", text.chars().count(), image_url);
        Ok(text)
    }

    fn engine_name(&self) -> &str {
        "tesseract"
    }
}
