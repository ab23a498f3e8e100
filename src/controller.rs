//! Orchestration of the image pipeline.
//!
//! `Controller` owns the image store and runs one flow at a time; `FlowGuard`
//! is the token that enforces it.

pub mod controller_handler;
pub mod flow_guard;


pub use controller_handler::{ContrastReport, Controller};
