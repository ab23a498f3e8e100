use async_trait::async_trait;

use crate::error_handling::types::OcrError;

/// Turns an image into text.
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    /// Recognizes the text in the image at `image_url`.
    ///
    /// Implementations return the trimmed text, or `OcrError::NoText` when
    /// nothing was recognized.
    async fn recognize(&self, image_url: &str) -> Result<String, OcrError>;

    /// Short engine name for logs.
    fn engine_name(&self) -> &str;
}
