use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use log::{debug, error, info};
use tempfile::NamedTempFile;

use crate::error_handling::types::StorageError;
use crate::storage::storage_trait::ImageStorage;
use crate::storage::types::ImageItem;

pub const DEFAULT_STORE_FILE: &str = "saved_images.json";

/// Keeps the collection as a JSON array in a single file.
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                error!("Failed to create store dir {}: {}", parent.display(), e);
                StorageError::WriteFailed(e.to_string())
            })?;
        }
        info!("FileStorage initialized at {}", path.display());
        Ok(Self { path })
    }

    fn dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}

impl ImageStorage for FileStorage {
    fn load(&self) -> Result<Vec<ImageItem>, StorageError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No store at {}, starting empty", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => {
                error!("Failed to read store {}: {}", self.path.display(), e);
                return Err(StorageError::ReadFailed(e.to_string()));
            }
        };
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        let items: Vec<ImageItem> = serde_json::from_str(&content).map_err(|e| {
            error!("Invalid store record in {}: {}", self.path.display(), e);
            StorageError::CorruptRecord(e.to_string())
        })?;
        debug!("Loaded {} image(s) from {}", items.len(), self.path.display());
        Ok(items)
    }

    fn save(&self, items: &[ImageItem]) -> Result<(), StorageError> {
        let json = serde_json::to_vec_pretty(items)
            .map_err(|e| StorageError::WriteFailed(e.to_string()))?;

        // same directory so the rename below stays on one filesystem
        let mut tmp = NamedTempFile::new_in(self.dir()).map_err(|e| {
            error!("Failed to create temp file next to {}: {}", self.path.display(), e);
            StorageError::WriteFailed(e.to_string())
        })?;
        tmp.write_all(&json).map_err(|e| {
            error!("Write failed {}: {}", tmp.path().display(), e);
            StorageError::WriteFailed(e.to_string())
        })?;
        tmp.persist(&self.path).map_err(|e| {
            error!("Failed to replace store {}: {}", self.path.display(), e);
            StorageError::WriteFailed(e.to_string())
        })?;
        debug!("Saved {} image(s) to {}", items.len(), self.path.display());
        Ok(())
    }
}
