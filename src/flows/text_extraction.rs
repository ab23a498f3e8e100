use log::{debug, error, info, warn};
use tokio::sync::Mutex;

use crate::error_handling::types::FlowError;
use crate::flows::progress::{ProgressEvent, ProgressSink};
use crate::ocr::recognizer::TextRecognizer;
use crate::storage::image_store::ImageStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExtractionSummary {
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionOutcome {
    /// Every item already had text or an error.
    NothingToDo,
    Processed(ExtractionSummary),
}

/// Runs OCR on every pending item, one at a time, in stored order.
///
/// Each item goes pending -> processing -> done|failed, and the collection is
/// persisted after each item settles. Per-item OCR failures are recorded on
/// the item; only storage failures abort the loop, and the item they hit is
/// left pending.
pub async fn extract_texts(
    store: &Mutex<ImageStore>,
    recognizer: &dyn TextRecognizer,
    progress: &dyn ProgressSink,
) -> Result<ExtractionOutcome, FlowError> {
    let pending: Vec<(String, String)> = store
        .lock()
        .await
        .items()
        .iter()
        .filter(|i| i.needs_text())
        .map(|i| (i.id.clone(), i.url.clone()))
        .collect();

    if pending.is_empty() {
        info!("No new images to process");
        return Ok(ExtractionOutcome::NothingToDo);
    }

    let total = pending.len();
    let mut summary = ExtractionSummary::default();
    debug!(
        "Extracting text from {} image(s) with {}",
        total,
        recognizer.engine_name()
    );

    for (index, (id, url)) in pending.into_iter().enumerate() {
        let before = {
            let mut guard = store.lock().await;
            let before = guard
                .get(&id)
                .cloned()
                .ok_or_else(|| FlowError::NotFound(id.clone()))?;
            guard.touch(&id, |item| {
                item.processing = true;
                item.error = None;
            })?;
            before
        };
        progress.on_event(ProgressEvent::Started {
            id: id.clone(),
            index,
            total,
        });

        let (event, text, error) = match recognizer.recognize(&url).await {
            Ok(text) => {
                let chars = text.chars().count();
                let event = ProgressEvent::Recognized {
                    id: id.clone(),
                    chars,
                };
                (event, Some(text), None)
            }
            Err(e) => {
                let message = e.to_string();
                warn!("OCR failed for image {}: {}", id, message);
                let event = ProgressEvent::Failed {
                    id: id.clone(),
                    message: message.clone(),
                };
                (event, None, Some(message))
            }
        };
        let succeeded = text.is_some();

        let mut guard = store.lock().await;
        let saved = guard.update(&id, |item| {
            item.extracted_text = text;
            item.error = error;
            item.processing = false;
        });
        if let Err(e) = saved {
            error!("Could not save the result for image {}: {}", id, e);
            // back to pending, as storage still has it
            guard.touch(&id, |item| *item = before)?;
            return Err(e.into());
        }
        drop(guard);

        summary.processed += 1;
        if succeeded {
            summary.succeeded += 1;
        } else {
            summary.failed += 1;
        }
        progress.on_event(event);
    }

    progress.on_event(ProgressEvent::Finished {
        succeeded: summary.succeeded,
        failed: summary.failed,
    });
    Ok(ExtractionOutcome::Processed(summary))
}
