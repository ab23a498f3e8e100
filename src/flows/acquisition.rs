use log::{info, warn};
use tokio::sync::Mutex;

use crate::backend::client::Backend;
use crate::error_handling::types::FlowError;
use crate::storage::image_store::{ImageStore, MAX_IMAGES};
use crate::storage::types::ImageItem;

/// Resolves `url` through the backend and appends the resulting image.
///
/// Validation happens before any network call. The store lock is released
/// while the backend works and taken again for the append, which re-checks
/// capacity.
pub async fn acquire_image(
    store: &Mutex<ImageStore>,
    backend: &dyn Backend,
    url: &str,
) -> Result<ImageItem, FlowError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(FlowError::EmptyUrl);
    }
    if store.lock().await.is_full() {
        return Err(FlowError::CapacityReached(MAX_IMAGES));
    }

    let image_url = backend.extract_image(url).await.map_err(|e| {
        warn!("Image extraction failed for {}: {}", url, e);
        FlowError::Acquisition(e)
    })?;

    let item = ImageItem::new(image_url);
    store.lock().await.append(item.clone())?;
    info!("Acquired image {} from {}", item.id, url);
    Ok(item)
}
