//! Storage subsystem
//!
//! This module holds the image collection and the backends that persist it.
//!
//! Components:
//! - `storage_trait`: the `ImageStorage` trait, the single load/save boundary.
//! - `types`: `ImageItem` and its derived `ItemStatus`.
//! - `image_store`: the bounded, ordered collection owned by the controller.
//! - `file_storage`: one JSON file on disk, written atomically.
//! - `memory_storage`: in-process record for embedding and tests.

pub mod file_storage;
pub mod image_store;
pub mod memory_storage;
pub mod storage_trait;
pub mod types;

pub use image_store::{ImageStore, MAX_IMAGES};
pub use storage_trait::ImageStorage;
pub use types::{ImageItem, ItemStatus};
