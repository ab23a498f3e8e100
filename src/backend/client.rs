use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, Url};
use serde::Serialize;

use crate::backend::types::{
    AnalysisText, AnalyzeTextsRequest, BackendReply, ExtractImageRequest, ExtractTextRequest,
};
use crate::error_handling::types::BackendError;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";

const EXTRACT_IMAGE_PATH: &str = "extract-image";
const EXTRACT_TEXT_PATH: &str = "extract-text";
const ANALYZE_TEXTS_PATH: &str = "analyze-texts";

/// Longest slice of a non-JSON error body echoed back to the user.
const MAX_ERROR_BODY: usize = 200;

/// The external extraction/OCR/analysis service.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Resolves the media URL behind a social-media link.
    async fn extract_image(&self, url: &str) -> Result<String, BackendError>;

    /// Runs server-side OCR on an image the backend can reach.
    async fn extract_text(&self, image_url: &str) -> Result<String, BackendError>;

    /// Sends every text in one batch and returns the analysis.
    async fn analyze_texts(&self, texts: &[AnalysisText]) -> Result<String, BackendError>;
}

/// `Backend` over HTTP+JSON.
pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, BackendError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| BackendError::InitializationFailed(e.to_string()))?;
        Self::with_client(client, base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Result<Self, BackendError> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| BackendError::InitializationFailed(format!("{}: {}", base_url, e)))?;
        // joined paths must land under the base, not replace its last segment
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        self.base_url
            .join(path)
            .map_err(|e| BackendError::InitializationFailed(e.to_string()))
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<BackendReply, BackendError> {
        let url = self.endpoint(path)?;
        debug!("POST {}", url);

        let response = self
            .client
            .post(url.clone())
            .json(body)
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        let reply = serde_json::from_str::<BackendReply>(&body);

        if !status.is_success() {
            let message = match reply {
                Ok(BackendReply { error: Some(e), .. }) => e,
                _ => truncate(&body, MAX_ERROR_BODY),
            };
            warn!("{} answered {}: {}", url, status, message);
            return Err(BackendError::Status {
                status: status.as_u16(),
                message,
            });
        }

        reply.map_err(|e| BackendError::MalformedReply(format!("{}: {}", url, e)))
    }
}

/// Picks the payload out of a 2xx reply.
fn payload(
    mut reply: BackendReply,
    field: &'static str,
    take: impl FnOnce(&mut BackendReply) -> Option<String>,
    fallback: &str,
) -> Result<String, BackendError> {
    if !reply.success {
        return Err(BackendError::Rejected(
            reply.error.unwrap_or_else(|| fallback.to_string()),
        ));
    }
    match take(&mut reply) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(BackendError::MalformedReply(format!(
            "successful reply without `{}`",
            field
        ))),
    }
}

fn truncate(s: &str, max: usize) -> String {
    let s = s.trim();
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn extract_image(&self, url: &str) -> Result<String, BackendError> {
        let reply = self
            .post(EXTRACT_IMAGE_PATH, &ExtractImageRequest { url })
            .await?;
        payload(
            reply,
            "image_url",
            |r| r.image_url.take(),
            "Could not get the image",
        )
    }

    async fn extract_text(&self, image_url: &str) -> Result<String, BackendError> {
        let reply = self
            .post(EXTRACT_TEXT_PATH, &ExtractTextRequest { image_url })
            .await?;
        payload(
            reply,
            "text",
            |r| r.text.take(),
            "Could not extract text from the image",
        )
    }

    async fn analyze_texts(&self, texts: &[AnalysisText]) -> Result<String, BackendError> {
        let reply = self
            .post(ANALYZE_TEXTS_PATH, &AnalyzeTextsRequest { texts })
            .await?;
        payload(
            reply,
            "analysis",
            |r| r.analysis.take(),
            "The analysis failed",
        )
    }
}
