use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::error_handling::types::StorageError;
use crate::storage::storage_trait::ImageStorage;
use crate::storage::types::ImageItem;

/// In-process storage holding the serialized record, for embedding and tests.
///
/// The record goes through `serde_json` exactly like the file backend, so
/// transient fields are dropped on save.
#[derive(Default)]
pub struct MemoryStorage {
    record: Mutex<Option<String>>,
    fail_writes: AtomicBool,
    saves: AtomicUsize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: &[ImageItem]) -> Self {
        let storage = Self::new();
        if let Ok(json) = serde_json::to_string(items) {
            if let Ok(mut record) = storage.record.lock() {
                *record = Some(json);
            }
        }
        storage
    }

    /// Makes every following `save` fail until switched back.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl ImageStorage for MemoryStorage {
    fn load(&self) -> Result<Vec<ImageItem>, StorageError> {
        let record = self
            .record
            .lock()
            .map_err(|e| StorageError::ReadFailed(e.to_string()))?;
        match record.as_deref() {
            Some(json) => serde_json::from_str(json)
                .map_err(|e| StorageError::CorruptRecord(e.to_string())),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, items: &[ImageItem]) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::WriteFailed("writes disabled".into()));
        }
        let json =
            serde_json::to_string(items).map_err(|e| StorageError::WriteFailed(e.to_string()))?;
        let mut record = self
            .record
            .lock()
            .map_err(|e| StorageError::WriteFailed(e.to_string()))?;
        *record = Some(json);
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
