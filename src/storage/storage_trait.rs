//! Storage Trait
//!
//! This module defines the `ImageStorage` trait, the only I/O boundary of the
//! image collection. A backend persists the whole collection as one record and
//! hands it back on load; it never interprets the items.

use crate::error_handling::types::StorageError;
use crate::storage::types::ImageItem;

/// Durable home of the image collection.
///
/// Implementors store the collection as a single record: `save` replaces it,
/// `load` returns the last saved collection or an empty one when nothing was
/// saved yet.
pub trait ImageStorage: Send + Sync {
    /// Returns the persisted collection in stored order.
    fn load(&self) -> Result<Vec<ImageItem>, StorageError>;

    /// Replaces the persisted collection.
    fn save(&self, items: &[ImageItem]) -> Result<(), StorageError>;
}
