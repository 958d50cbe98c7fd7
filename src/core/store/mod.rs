//! # Store Module
//!
//! Read access to image bytes held by a blob store.
//!
//! ## Backends
//! - `InMemoryStore` - Content-addressed, in-process (tests, uploads)
//! - `DirectoryStore` - Image files under a directory, keyed by relative path
//!
//! The engine never interprets identifiers; they are opaque handles
//! handed out by whichever store owns the bytes.

mod directory;
mod memory;
mod traits;

pub use directory::DirectoryStore;
pub use memory::InMemoryStore;
pub use traits::BlobStore;

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

/// Opaque identifier of one stored image
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageId(String);

impl ImageId {
    /// Wrap an existing identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Content-addressed identifier: hex XXH3-64 of the bytes
    pub fn from_content(bytes: &[u8]) -> Self {
        Self(format!("{:016x}", xxh3_64(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ImageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ImageId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ImageId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_ids_are_stable() {
        let a = ImageId::from_content(b"wallet photo");
        let b = ImageId::from_content(b"wallet photo");

        assert_eq!(a, b);
        assert_eq!(a.as_str().len(), 16);
    }

    #[test]
    fn different_content_gives_different_ids() {
        assert_ne!(
            ImageId::from_content(b"red umbrella"),
            ImageId::from_content(b"blue umbrella")
        );
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let json = serde_json::to_string(&ImageId::new("items/42.jpg")).unwrap();
        assert_eq!(json, "\"items/42.jpg\"");
    }
}
