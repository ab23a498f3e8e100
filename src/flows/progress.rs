//! Progress reporting for the text extraction loop.

use log::{info, warn};

/// Events emitted while the extraction loop walks the collection.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// OCR started for an item.
    Started {
        id: String,
        /// Position among the items being processed (0-based).
        index: usize,
        total: usize,
    },
    /// OCR produced text for an item.
    Recognized { id: String, chars: usize },
    /// OCR failed; the message was recorded on the item.
    Failed { id: String, message: String },
    /// Every pending item has been processed.
    Finished { succeeded: usize, failed: usize },
}

/// Receives progress events.
pub trait ProgressSink: Send + Sync {
    fn on_event(&self, event: ProgressEvent);
}

/// Discards every event.
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn on_event(&self, _event: ProgressEvent) {}
}

/// Writes every event to the log.
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn on_event(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::Started { id, index, total } => {
                info!("Processing image {}/{} ({})", index + 1, total, id)
            }
            ProgressEvent::Recognized { id, chars } => {
                info!("Extracted {} character(s) from {}", chars, id)
            }
            ProgressEvent::Failed { id, message } => warn!("Image {} failed: {}", id, message),
            ProgressEvent::Finished { succeeded, failed } => {
                info!("Text extraction finished: {} ok, {} failed", succeeded, failed)
            }
        }
    }
}
