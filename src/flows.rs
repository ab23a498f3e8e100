//! The image pipeline.
//!
//! Each flow is a free function over the shared `ImageStore`; the controller
//! decides when they may run.
//!
//! - `acquisition`: URL -> backend -> new item.
//! - `text_extraction`: sequential OCR over pending items.
//! - `analysis`: one batched analysis of every extracted text.
//! - `export`: plain-text archive of extracted texts.
//! - `progress`: per-item events emitted by text extraction.

pub mod acquisition;
pub mod analysis;
pub mod export;
pub mod progress;
pub mod text_extraction;

pub use acquisition::acquire_image;
pub use analysis::{analyze_texts, AnalysisOutcome};
pub use export::render_text_archive;
pub use progress::{LogProgress, NoProgress, ProgressEvent, ProgressSink};
pub use text_extraction::{extract_texts, ExtractionOutcome, ExtractionSummary};
