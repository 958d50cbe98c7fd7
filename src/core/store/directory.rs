//! Directory-backed blob store using walkdir.

use super::{BlobStore, ImageId};
use crate::error::StoreError;
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

const IMAGE_EXTENSIONS: [&str; 9] = ["jpg", "jpeg", "png", "webp", "gif", "bmp", "tiff", "tif", "ico"];

/// Image files under a root directory, keyed by their relative path
pub struct DirectoryStore {
    root: PathBuf,
    extensions: HashSet<String>,
}

impl DirectoryStore {
    /// Open a store rooted at `root`
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(StoreError::RootNotFound { path: root });
        }

        Ok(Self {
            root,
            extensions: IMAGE_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        })
    }

    /// Root directory of the store
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map an id to a path under the root; ids escaping the root map to nothing
    pub fn path_for(&self, id: &ImageId) -> Option<PathBuf> {
        let relative = Path::new(id.as_str());
        let contained = !id.as_str().is_empty()
            && relative
                .components()
                .all(|component| matches!(component, Component::Normal(_)));

        contained.then(|| self.root.join(relative))
    }

    /// The id a file under the root is stored as
    pub fn id_for_path(&self, path: &Path) -> Option<ImageId> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let parts: Vec<_> = relative
            .components()
            .map(|component| component.as_os_str().to_str())
            .collect::<Option<_>>()?;

        (!parts.is_empty()).then(|| ImageId::new(parts.join("/")))
    }

    fn should_include(&self, path: &Path) -> bool {
        let hidden = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| name.starts_with('.'));
        if hidden {
            return false;
        }

        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.contains(&ext.to_lowercase()))
    }
}

impl BlobStore for DirectoryStore {
    fn fetch(&self, id: &ImageId) -> Result<Option<Vec<u8>>, StoreError> {
        let Some(path) = self.path_for(id) else {
            return Ok(None);
        };

        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io { path, source: e }),
        }
    }

    fn ids(&self) -> Result<Vec<ImageId>, StoreError> {
        let walker = WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                // Skip hidden directories below the root
                entry.depth() == 0
                    || !entry.file_name().to_str().is_some_and(|name| name.starts_with('.'))
            });

        let mut ids = Vec::new();
        for entry in walker {
            match entry {
                Ok(entry) => {
                    if entry.file_type().is_file() && self.should_include(entry.path()) {
                        if let Some(id) = self.id_for_path(entry.path()) {
                            ids.push(id);
                        }
                    }
                }
                Err(e) => warn!(error = %e, "skipping unreadable entry in blob directory"),
            }
        }

        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn populated() -> (TempDir, DirectoryStore) {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.png"), b"png bytes").unwrap();
        fs::write(dir.path().join("a.JPG"), b"jpg bytes").unwrap();
        fs::write(dir.path().join("notes.txt"), b"not an image").unwrap();
        fs::write(dir.path().join(".hidden.png"), b"hidden").unwrap();
        fs::create_dir(dir.path().join("items")).unwrap();
        fs::write(dir.path().join("items").join("c.webp"), b"webp bytes").unwrap();
        fs::create_dir(dir.path().join(".trash")).unwrap();
        fs::write(dir.path().join(".trash").join("d.png"), b"trashed").unwrap();

        let store = DirectoryStore::open(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn missing_root_is_an_error() {
        assert!(matches!(
            DirectoryStore::open("/nonexistent/path/that/does/not/exist"),
            Err(StoreError::RootNotFound { .. })
        ));
    }

    #[test]
    fn ids_list_visible_images_sorted() {
        let (_dir, store) = populated();
        let ids: Vec<_> = store.ids().unwrap().into_iter().map(|id| id.to_string()).collect();

        assert_eq!(ids, vec!["a.JPG", "b.png", "items/c.webp"]);
    }

    #[test]
    fn fetch_reads_nested_files() {
        let (_dir, store) = populated();

        assert_eq!(
            store.fetch(&ImageId::new("items/c.webp")).unwrap(),
            Some(b"webp bytes".to_vec())
        );
    }

    #[test]
    fn fetch_missing_file_returns_none() {
        let (_dir, store) = populated();
        assert_eq!(store.fetch(&ImageId::new("gone.png")).unwrap(), None);
    }

    #[test]
    fn ids_cannot_escape_root() {
        let (_dir, store) = populated();

        assert!(store.path_for(&ImageId::new("../etc/passwd")).is_none());
        assert!(store.path_for(&ImageId::new("/etc/passwd")).is_none());
        assert_eq!(store.fetch(&ImageId::new("../b.png")).unwrap(), None);
    }

    #[test]
    fn id_for_path_round_trips() {
        let (dir, store) = populated();
        let path = dir.path().join("items").join("c.webp");

        let id = store.id_for_path(&path).unwrap();
        assert_eq!(id.as_str(), "items/c.webp");
        assert_eq!(store.path_for(&id).unwrap(), path);
    }
}
