use std::sync::Arc;

use async_trait::async_trait;

use crate::backend::client::Backend;
use crate::error_handling::types::OcrError;
use crate::ocr::recognizer::TextRecognizer;

/// OCR delegated to the backend's `/extract-text` endpoint.
pub struct BackendOcr {
    backend: Arc<dyn Backend>,
}

impl BackendOcr {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl TextRecognizer for BackendOcr {
    async fn recognize(&self, image_url: &str) -> Result<String, OcrError> {
        let text = self.backend.extract_text(image_url).await?;
        let text = text.trim();
        if text.is_empty() {
            return Err(OcrError::NoText);
        }
        Ok(text.to_string())
    }

    fn engine_name(&self) -> &str {
        "backend"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::types::AnalysisText;
    use crate::error_handling::types::BackendError;

    struct FixedText(Result<String, BackendError>);

    #[async_trait]
    impl Backend for FixedText {
        async fn extract_image(&self, _url: &str) -> Result<String, BackendError> {
            unreachable!()
        }

        async fn extract_text(&self, _image_url: &str) -> Result<String, BackendError> {
            self.0.clone()
        }

        async fn analyze_texts(&self, _texts: &[AnalysisText]) -> Result<String, BackendError> {
            unreachable!()
        }
    }

    fn ocr(reply: Result<&str, BackendError>) -> BackendOcr {
        BackendOcr::new(Arc::new(FixedText(reply.map(|s| s.to_string()))))
    }

    #[tokio::test]
    async fn trims_recognized_text() {
        let text = ocr(Ok("\n  EL PAÍS  \n")).recognize("http://x/a.jpg").await;
        assert_eq!(text, Ok("EL PAÍS".to_string()));
    }

    #[tokio::test]
    async fn blank_text_and_backend_errors() {
        assert_eq!(
            ocr(Ok(" \n ")).recognize("http://x/a.jpg").await,
            Err(OcrError::NoText)
        );
        let err = ocr(Err(BackendError::Transport("timed out".into())))
            .recognize("http://x/a.jpg")
            .await
            .unwrap_err();
        assert!(matches!(err, OcrError::Backend(BackendError::Transport(_))));
    }
}
