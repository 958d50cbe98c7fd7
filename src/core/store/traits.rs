//! Blob store trait definition.

use super::ImageId;
use crate::error::StoreError;

/// Trait for blob store backends
pub trait BlobStore: Send + Sync {
    /// Fetch the bytes stored under `id`
    ///
    /// Returns `Ok(None)` when nothing is stored under the id; errors are
    /// reserved for backend failures.
    fn fetch(&self, id: &ImageId) -> Result<Option<Vec<u8>>, StoreError>;

    /// List every stored id in a stable order
    fn ids(&self) -> Result<Vec<ImageId>, StoreError>;

    /// Whether anything is stored under `id`
    fn contains(&self, id: &ImageId) -> Result<bool, StoreError> {
        Ok(self.fetch(id)?.is_some())
    }
}
