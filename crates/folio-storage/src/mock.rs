//! Mock storage implementation for testing.
//!
//! Provides [`MockStorage`] for unit testing without filesystem access.

use std::collections::{BTreeMap, HashSet};
use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::storage::{Source, Storage, StorageError, StorageErrorKind};

const BACKEND: &str = "Mock";

/// Mock storage for testing.
///
/// Stores sources in memory. Use the builder methods to configure the mock
/// with test data, and [`insert`](Self::insert)/[`remove`](Self::remove) to
/// change it after it was shared.
///
/// # Example
///
/// ```
/// use folio_storage::{MockStorage, Storage};
///
/// let storage = MockStorage::new()
///     .with_file("guide/intro.md", "# Intro\n\nContent.");
///
/// let sources = storage.scan().unwrap();
/// assert_eq!(sources[0].path, "guide/intro.md");
/// assert_eq!(storage.read("guide/intro.md").unwrap(), "# Intro\n\nContent.");
/// ```
#[derive(Debug, Default)]
pub struct MockStorage {
    files: RwLock<BTreeMap<String, String>>,
    failing: RwLock<HashSet<String>>,
    reads: AtomicUsize,
}

impl MockStorage {
    /// Create a new empty mock storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a source with content.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_file(self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.insert(path, content);
        self
    }

    /// Add a source that is listed by `scan` but fails to read.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_read_error(self, path: impl Into<String>) -> Self {
        let path = path.into();
        self.files.write().unwrap().insert(path.clone(), String::new());
        self.failing.write().unwrap().insert(path);
        self
    }

    /// Add or replace a source.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn insert(&self, path: impl Into<String>, content: impl Into<String>) {
        self.files
            .write()
            .unwrap()
            .insert(path.into(), content.into());
    }

    /// Remove a source.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn remove(&self, path: &str) {
        self.files.write().unwrap().remove(path);
    }

    /// Number of `read` calls served so far, including failed ones.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl Storage for MockStorage {
    fn scan(&self) -> Result<Vec<Source>, StorageError> {
        Ok(self
            .files
            .read()
            .unwrap()
            .keys()
            .map(|path| Source::new(path.clone()))
            .collect())
    }

    fn read(&self, path: &str) -> Result<String, StorageError> {
        self.reads.fetch_add(1, Ordering::SeqCst);

        if self.failing.read().unwrap().contains(path) {
            return Err(StorageError::new(StorageErrorKind::PermissionDenied)
                .with_path(path)
                .with_backend(BACKEND));
        }

        self.files
            .read()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::not_found(path).with_backend(BACKEND))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_returns_sorted_paths() {
        let storage = MockStorage::new()
            .with_file("guide/start.md", "")
            .with_file("api.md", "")
            .with_file("guide/intro.md", "");

        let paths: Vec<_> = storage.scan().unwrap().into_iter().map(|s| s.path).collect();

        assert_eq!(paths, ["api.md", "guide/intro.md", "guide/start.md"]);
    }

    #[test]
    fn test_read_missing() {
        let storage = MockStorage::new();

        let err = storage.read("missing.md").unwrap_err();

        assert_eq!(err.kind, StorageErrorKind::NotFound);
        assert_eq!(err.backend, Some("Mock"));
    }

    #[test]
    fn test_read_error_is_listed() {
        let storage = MockStorage::new().with_read_error("broken.md");

        assert_eq!(storage.scan().unwrap(), vec![Source::new("broken.md")]);
        assert_eq!(
            storage.read("broken.md").unwrap_err().kind,
            StorageErrorKind::PermissionDenied
        );
    }

    #[test]
    fn test_insert_remove_and_read_count() {
        let storage = MockStorage::new();
        storage.insert("a.md", "one");
        storage.insert("a.md", "two");

        assert_eq!(storage.read("a.md").unwrap(), "two");

        storage.remove("a.md");
        assert!(storage.read("a.md").is_err());
        assert_eq!(storage.read_count(), 2);
    }
}
