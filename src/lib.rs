pub mod backend;
pub mod configuration;
pub mod controller;
pub mod error_handling;
pub mod flows;
pub mod ocr;
pub mod storage;

pub use controller::{ContrastReport, Controller};
