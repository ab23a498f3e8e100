//! OCR engines.
//!
//! The pipeline only sees the `TextRecognizer` trait. Two engines exist: the
//! backend's `/extract-text` endpoint and a local `tesseract` executable.

pub mod backend_ocr;
pub mod recognizer;
pub mod tesseract;

pub use backend_ocr::BackendOcr;
pub use recognizer::TextRecognizer;
pub use tesseract::TesseractEngine;
