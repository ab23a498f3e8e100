//! Client side of the external extraction service.
//!
//! - `client`: the `Backend` trait and its HTTP implementation.
//! - `types`: request and reply bodies.

pub mod client;
pub mod types;

#[cfg(test)]
mod integration_tests;

pub use client::{Backend, HttpBackend, DEFAULT_BACKEND_URL};
pub use types::AnalysisText;
