//! In-memory blob store.

use super::{BlobStore, ImageId};
use crate::error::StoreError;
use std::collections::HashMap;
use std::sync::RwLock;

#[derive(Default)]
struct Entries {
    /// Insertion order, used by `ids`
    order: Vec<ImageId>,
    blobs: HashMap<ImageId, Vec<u8>>,
}

/// In-memory blob store
///
/// Useful for tests and for images that arrive with a request and are
/// never written anywhere.
pub struct InMemoryStore {
    entries: RwLock<Entries>,
}

impl InMemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Entries::default()),
        }
    }

    /// Store bytes under their content address and return it
    pub fn put(&self, bytes: Vec<u8>) -> Result<ImageId, StoreError> {
        let id = ImageId::from_content(&bytes);
        self.insert(id.clone(), bytes)?;
        Ok(id)
    }

    /// Store bytes under an explicit id, replacing any previous bytes
    pub fn insert(&self, id: ImageId, bytes: Vec<u8>) -> Result<(), StoreError> {
        let mut entries = self.entries.write().map_err(|_| StoreError::LockPoisoned)?;

        if entries.blobs.insert(id.clone(), bytes).is_none() {
            entries.order.push(id);
        }
        Ok(())
    }

    /// Remove an entry, returning whether it existed
    pub fn remove(&self, id: &ImageId) -> Result<bool, StoreError> {
        let mut entries = self.entries.write().map_err(|_| StoreError::LockPoisoned)?;

        let existed = entries.blobs.remove(id).is_some();
        if existed {
            entries.order.retain(|stored| stored != id);
        }
        Ok(existed)
    }

    /// Number of stored blobs
    pub fn len(&self) -> Result<usize, StoreError> {
        let entries = self.entries.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(entries.blobs.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BlobStore for InMemoryStore {
    fn fetch(&self, id: &ImageId) -> Result<Option<Vec<u8>>, StoreError> {
        let entries = self.entries.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(entries.blobs.get(id).cloned())
    }

    fn ids(&self) -> Result<Vec<ImageId>, StoreError> {
        let entries = self.entries.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(entries.order.clone())
    }
}
