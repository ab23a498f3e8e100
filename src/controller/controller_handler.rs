use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::info;
use tokio::sync::Mutex;

use super::flow_guard::FlowGuard;
use crate::backend::client::{Backend, HttpBackend};
use crate::configuration::config::Config;
use crate::configuration::types::OcrEngineKind;
use crate::error_handling::types::{ControllerError, FlowError};
use crate::flows::{self, AnalysisOutcome, ExtractionOutcome, ProgressSink};
use crate::ocr::{BackendOcr, TesseractEngine, TextRecognizer};
use crate::storage::file_storage::FileStorage;
use crate::storage::image_store::ImageStore;
use crate::storage::types::ImageItem;

/// Result of a contrast run: extraction first, then analysis.
#[derive(Debug)]
pub struct ContrastReport {
    pub extraction: ExtractionOutcome,
    /// `Err(FlowError::NothingToAnalyze)` when no image yielded text.
    pub analysis: Result<AnalysisOutcome, FlowError>,
}

/// Owns the image store and the external collaborators, and runs one flow at
/// a time.
///
/// Every operation that mutates the store takes the in-flight guard first; a
/// call made while another flow runs fails with `FlowError::Busy`.
pub struct Controller {
    store: Mutex<ImageStore>,
    backend: Arc<dyn Backend>,
    recognizer: Arc<dyn TextRecognizer>,
    in_flight: AtomicBool,
}

impl Controller {
    pub fn new(
        store: ImageStore,
        backend: Arc<dyn Backend>,
        recognizer: Arc<dyn TextRecognizer>,
    ) -> Self {
        Self {
            store: Mutex::new(store),
            backend,
            recognizer,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Wires file storage, the HTTP backend and the configured OCR engine.
    pub fn from_config(config: &Config) -> Result<Self, ControllerError> {
        let storage = Arc::new(FileStorage::new(&config.store_path)?);
        let store = ImageStore::open(storage)?;

        let backend: Arc<dyn Backend> = Arc::new(HttpBackend::new(
            &config.backend_url,
            config.request_timeout(),
        )?);
        let recognizer: Arc<dyn TextRecognizer> = match config.ocr.engine {
            OcrEngineKind::Backend => Arc::new(BackendOcr::new(backend.clone())),
            OcrEngineKind::Tesseract => Arc::new(
                TesseractEngine::new(
                    &config.ocr.tesseract_path,
                    config.ocr.languages.clone(),
                    config.request_timeout(),
                )
                .map_err(|e| ControllerError::InitializationFailed(e.to_string()))?,
            ),
        };
        info!(
            "Controller ready: backend {}, OCR engine {}",
            config.backend_url,
            recognizer.engine_name()
        );
        Ok(Self::new(store, backend, recognizer))
    }

    fn guard(&self) -> Result<FlowGuard<'_>, FlowError> {
        FlowGuard::try_acquire(&self.in_flight)
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Snapshot of the collection in stored order.
    pub async fn images(&self) -> Vec<ImageItem> {
        self.store.lock().await.items().to_vec()
    }

    pub async fn acquire(&self, url: &str) -> Result<ImageItem, FlowError> {
        let _guard = self.guard()?;
        flows::acquire_image(&self.store, self.backend.as_ref(), url).await
    }

    pub async fn extract_texts(
        &self,
        progress: &dyn ProgressSink,
    ) -> Result<ExtractionOutcome, FlowError> {
        let _guard = self.guard()?;
        flows::extract_texts(&self.store, self.recognizer.as_ref(), progress).await
    }

    pub async fn analyze(&self) -> Result<AnalysisOutcome, FlowError> {
        let _guard = self.guard()?;
        flows::analyze_texts(&self.store, self.backend.as_ref()).await
    }

    /// Extraction followed by analysis under a single guard.
    ///
    /// Analysis runs even when extraction found nothing new.
    pub async fn contrast(&self, progress: &dyn ProgressSink) -> Result<ContrastReport, FlowError> {
        let _guard = self.guard()?;
        let extraction =
            flows::extract_texts(&self.store, self.recognizer.as_ref(), progress).await?;
        let analysis = flows::analyze_texts(&self.store, self.backend.as_ref()).await;
        Ok(ContrastReport {
            extraction,
            analysis,
        })
    }

    pub async fn remove(&self, id: &str) -> Result<ImageItem, FlowError> {
        let _guard = self.guard()?;
        let removed = self.store.lock().await.remove(id)?;
        info!("Removed image {}", removed.id);
        Ok(removed)
    }

    pub async fn clear(&self) -> Result<usize, FlowError> {
        let _guard = self.guard()?;
        let mut store = self.store.lock().await;
        let count = store.len();
        store.replace_all(Vec::new())?;
        info!("Removed {} image(s)", count);
        Ok(count)
    }

    /// Clears recorded OCR errors so the next extraction retries those items.
    pub async fn reset_errors(&self) -> Result<usize, FlowError> {
        let _guard = self.guard()?;
        let count = self
            .store
            .lock()
            .await
            .update_all(|item| item.error.take().is_some())?;
        info!("Reset {} failed image(s)", count);
        Ok(count)
    }

    pub async fn export_texts(&self) -> String {
        flows::render_text_archive(self.store.lock().await.items())
    }
}
