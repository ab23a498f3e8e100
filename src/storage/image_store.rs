use std::collections::HashSet;
use std::sync::Arc;

use log::{debug, warn};

use crate::error_handling::types::{StorageError, StoreError};
use crate::storage::storage_trait::ImageStorage;
use crate::storage::types::{new_item_id, ImageItem};

/// Maximum number of images the collection holds.
pub const MAX_IMAGES: usize = 4;

/// The ordered, bounded image collection and its canonical durable copy.
///
/// Every mutating method persists the whole collection before returning; a
/// failed append is rolled back so memory never runs ahead of storage.
pub struct ImageStore {
    items: Vec<ImageItem>,
    storage: Arc<dyn ImageStorage>,
}

impl ImageStore {
    /// Rehydrates the collection from `storage`.
    ///
    /// An unreadable record is logged and replaced by an empty collection;
    /// read errors are propagated.
    pub fn open(storage: Arc<dyn ImageStorage>) -> Result<Self, StorageError> {
        let items = match storage.load() {
            Ok(items) => items,
            Err(StorageError::CorruptRecord(e)) => {
                warn!("Discarding unreadable image record: {}", e);
                Vec::new()
            }
            Err(e) => return Err(e),
        };
        let items = normalize(items);
        debug!("Image store opened with {} item(s)", items.len());
        Ok(Self { items, storage })
    }

    pub fn items(&self) -> &[ImageItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= MAX_IMAGES
    }

    pub fn get(&self, id: &str) -> Option<&ImageItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn persist(&self) -> Result<(), StorageError> {
        self.storage.save(&self.items)
    }

    /// Appends `item` and persists.
    pub fn append(&mut self, item: ImageItem) -> Result<(), StoreError> {
        if self.is_full() {
            return Err(StoreError::CapacityReached(MAX_IMAGES));
        }
        if self.get(&item.id).is_some() {
            return Err(StoreError::DuplicateId(item.id));
        }
        self.items.push(item);
        if let Err(e) = self.persist() {
            self.items.pop();
            return Err(e.into());
        }
        Ok(())
    }

    /// Applies `f` to the item with `id` in memory only.
    ///
    /// Used for transient changes such as the `processing` flag, which is
    /// never written out.
    pub fn touch<F>(&mut self, id: &str, f: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut ImageItem),
    {
        let item = self
            .items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        f(item);
        Ok(())
    }

    /// Applies `f` to the item with `id`, then persists the collection.
    ///
    /// The item is restored if persisting fails.
    pub fn update<F>(&mut self, id: &str, f: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut ImageItem),
    {
        let pos = self.position(id)?;
        let before = self.items[pos].clone();
        f(&mut self.items[pos]);
        if let Err(e) = self.persist() {
            self.items[pos] = before;
            return Err(e.into());
        }
        Ok(())
    }

    /// Applies `f` to every item, persisting once if any call reports a change.
    ///
    /// Nothing changes in memory if persisting fails.
    pub fn update_all<F>(&mut self, mut f: F) -> Result<usize, StoreError>
    where
        F: FnMut(&mut ImageItem) -> bool,
    {
        let before = self.items.clone();
        let changed = self.items.iter_mut().map(|i| f(i)).filter(|c| *c).count();
        if changed > 0 {
            if let Err(e) = self.persist() {
                self.items = before;
                return Err(e.into());
            }
        }
        Ok(changed)
    }

    pub fn remove(&mut self, id: &str) -> Result<ImageItem, StoreError> {
        let pos = self.position(id)?;
        let removed = self.items.remove(pos);
        if let Err(e) = self.persist() {
            self.items.insert(pos, removed);
            return Err(e.into());
        }
        Ok(removed)
    }

    fn position(&self, id: &str) -> Result<usize, StoreError> {
        self.items
            .iter()
            .position(|i| i.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Overwrites the whole collection.
    pub fn replace_all(&mut self, items: Vec<ImageItem>) -> Result<(), StoreError> {
        if items.len() > MAX_IMAGES {
            return Err(StoreError::CapacityReached(MAX_IMAGES));
        }
        let previous = std::mem::replace(&mut self.items, normalize(items));
        if let Err(e) = self.persist() {
            self.items = previous;
            return Err(e.into());
        }
        Ok(())
    }
}

/// Brings a loaded collection back within the store invariants.
fn normalize(items: Vec<ImageItem>) -> Vec<ImageItem> {
    let total = items.len();
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(total.min(MAX_IMAGES));
    for mut item in items.into_iter().take(MAX_IMAGES) {
        if item.id.is_empty() || !seen.insert(item.id.clone()) {
            item.id = new_item_id();
            seen.insert(item.id.clone());
        }
        if item.extracted_text.is_some() && item.error.is_some() {
            item.error = None;
        }
        item.processing = false;
        out.push(item);
    }
    if total > MAX_IMAGES {
        warn!(
            "Image record held {} items, keeping the first {}",
            total, MAX_IMAGES
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory_storage::MemoryStorage;
    use chrono::{TimeZone, Utc};

    fn item(id: &str) -> ImageItem {
        ImageItem {
            id: id.into(),
            url: format!("http://cdn/{}.jpg", id),
            timestamp: Utc.timestamp_millis_opt(1_717_800_000_000).unwrap(),
            extracted_text: None,
            processing: false,
            error: None,
            analysis: None,
        }
    }

    #[test]
    fn open_normalizes_loaded_record() {
        let mut conflicted = item("b");
        conflicted.extracted_text = Some("text".into());
        conflicted.error = Some("old failure".into());
        let record = vec![item("a"), conflicted, item("a"), item(""), item("e")];
        let storage = Arc::new(MemoryStorage::with_items(&record));

        let store = ImageStore::open(storage).unwrap();
        assert_eq!(store.len(), MAX_IMAGES);
        let ids: HashSet<_> = store.items().iter().map(|i| i.id.clone()).collect();
        assert_eq!(ids.len(), MAX_IMAGES);
        assert!(ids.iter().all(|id| !id.is_empty()));
        assert_eq!(store.items()[1].error, None);
        assert_eq!(store.items()[1].extracted_text.as_deref(), Some("text"));
    }

    #[test]
    fn append_stops_at_capacity() {
        let storage = Arc::new(MemoryStorage::new());
        let mut store = ImageStore::open(storage.clone()).unwrap();
        for id in ["a", "b", "c", "d"] {
            store.append(item(id)).unwrap();
        }
        assert!(store.is_full());
        assert!(matches!(
            store.append(item("e")),
            Err(StoreError::CapacityReached(MAX_IMAGES))
        ));
        assert_eq!(storage.load().unwrap().len(), MAX_IMAGES);
    }

    #[test]
    fn append_rolls_back_when_persist_fails() {
        let storage = Arc::new(MemoryStorage::new());
        let mut store = ImageStore::open(storage.clone()).unwrap();
        store.append(item("a")).unwrap();

        storage.set_fail_writes(true);
        assert!(matches!(store.append(item("b")), Err(StoreError::Storage(_))));
        assert_eq!(store.len(), 1);
        assert!(matches!(store.remove("a"), Err(StoreError::Storage(_))));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let mut store = ImageStore::open(Arc::new(MemoryStorage::new())).unwrap();
        store.append(item("a")).unwrap();
        assert!(matches!(store.append(item("a")), Err(StoreError::DuplicateId(_))));
    }

    #[test]
    fn reload_matches_saved_collection() {
        let storage = Arc::new(MemoryStorage::new());
        let mut store = ImageStore::open(storage.clone()).unwrap();
        store.append(item("a")).unwrap();
        store.append(item("b")).unwrap();
        store
            .update("a", |i| i.extracted_text = Some("hola".into()))
            .unwrap();
        store.touch("b", |i| i.processing = true).unwrap();

        let reloaded = ImageStore::open(storage).unwrap();
        let mut expected = store.items().to_vec();
        expected[1].processing = false;
        assert_eq!(reloaded.items(), expected.as_slice());
    }

    #[test]
    fn failed_update_leaves_memory_matching_storage() {
        let mut failed = item("a");
        failed.error = Some("boom".into());
        let storage = Arc::new(MemoryStorage::with_items(&[failed, item("b")]));
        let mut store = ImageStore::open(storage.clone()).unwrap();
        storage.set_fail_writes(true);

        assert!(matches!(
            store.update("b", |i| i.extracted_text = Some("hola".into())),
            Err(StoreError::Storage(_))
        ));
        assert!(matches!(
            store.update_all(|i| i.error.take().is_some()),
            Err(StoreError::Storage(_))
        ));

        assert_eq!(store.items(), storage.load().unwrap().as_slice());
        assert_eq!(store.items()[0].error.as_deref(), Some("boom"));
        assert_eq!(store.items()[1].extracted_text, None);
    }

    #[test]
    fn remove_unknown_id_is_not_found() {
        let mut store = ImageStore::open(Arc::new(MemoryStorage::new())).unwrap();
        assert!(matches!(store.remove("nope"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn update_all_persists_only_on_change() {
        let storage = Arc::new(MemoryStorage::new());
        let mut store = ImageStore::open(storage.clone()).unwrap();
        store.append(item("a")).unwrap();
        let saves = storage.save_count();

        assert_eq!(store.update_all(|_| false).unwrap(), 0);
        assert_eq!(storage.save_count(), saves);

        let changed = store
            .update_all(|i| {
                i.analysis = Some("x".into());
                true
            })
            .unwrap();
        assert_eq!(changed, 1);
        assert_eq!(storage.save_count(), saves + 1);
    }
}
