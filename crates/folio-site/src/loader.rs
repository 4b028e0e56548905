//! Document loading and caching.
//!
//! Provides [`DocumentLoader`], which reads every source from a [`Storage`]
//! backend, renders it and composes the sidebar. The result is memoized until
//! [`DocumentLoader::reset`] is called.
//!
//! # Thread Safety
//!
//! `DocumentLoader` is designed for concurrent access:
//! - `load_all()` uses double-checked locking, so concurrent callers share a
//!   single load
//! - `reset()` bumps a generation counter; a load that started before the
//!   reset returns its result to its caller but does not populate the cache
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use folio_config::SidebarConfig;
//! use folio_site::{DocumentLoader, RenderOptions};
//! use folio_storage::FsStorage;
//!
//! let storage = Arc::new(FsStorage::new("docs"));
//! let loader = DocumentLoader::new(storage, SidebarConfig::default(), RenderOptions::default());
//!
//! let site = loader.load_all()?;
//! println!("{} documents", site.documents.len());
//! # Ok::<(), folio_site::LoadError>(())
//! ```

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Instant;

use folio_config::SidebarConfig;
use folio_storage::{Source, Storage, StorageError};
use rayon::prelude::*;
use serde::Serialize;

use crate::collate;
use crate::document::{DocumentRecord, RenderOptions, slug_from_path};
use crate::sidebar::{SidebarNode, build_sidebar};

/// Convert Duration to milliseconds as f64.
fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// Error returned by [`DocumentLoader::load_all`].
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// A source could not be listed or read.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Loaded documents and their navigation tree.
#[derive(Debug, Serialize)]
pub struct LoadedSite {
    /// Documents sorted by slug.
    pub documents: Vec<DocumentRecord>,
    /// Root-level sidebar nodes.
    pub sidebar: Vec<SidebarNode>,
}

impl LoadedSite {
    /// Look up a document by slug.
    #[must_use]
    pub fn document(&self, slug: &str) -> Option<&DocumentRecord> {
        self.documents
            .binary_search_by(|doc| collate::compare(&doc.slug, slug))
            .ok()
            .map(|index| &self.documents[index])
    }
}

/// Loads documents from storage and caches the result.
///
/// # Thread Safety
///
/// This struct is designed for concurrent access without external locking:
/// - Uses internal `RwLock<Option<Arc<LoadedSite>>>` for the cached result
/// - Uses `Mutex<()>` for serializing loads
/// - Uses `AtomicU64` to detect resets during a load
pub struct DocumentLoader {
    storage: Arc<dyn Storage>,
    sidebar: SidebarConfig,
    options: RenderOptions,
    /// Mutex for serializing load operations.
    load_lock: Mutex<()>,
    /// Cached result (atomically swappable).
    cached: RwLock<Option<Arc<LoadedSite>>>,
    /// Incremented by every reset.
    generation: AtomicU64,
}

impl DocumentLoader {
    /// Create a new loader.
    ///
    /// Nothing is read until the first [`load_all`](Self::load_all).
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>, sidebar: SidebarConfig, options: RenderOptions) -> Self {
        Self {
            storage,
            sidebar,
            options,
            load_lock: Mutex::new(()),
            cached: RwLock::new(None),
            generation: AtomicU64::new(0),
        }
    }

    /// Load all documents, or return the cached result.
    ///
    /// Uses double-checked locking pattern:
    /// 1. Fast path: return the cached site if present
    /// 2. Slow path: acquire `load_lock`, recheck, then load
    ///
    /// Repeated calls without a [`reset`](Self::reset) return the same `Arc`.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Storage`] if discovery or any read fails. Nothing
    /// is cached in that case.
    ///
    /// # Panics
    ///
    /// Panics if internal locks are poisoned.
    pub fn load_all(&self) -> Result<Arc<LoadedSite>, LoadError> {
        // Fast path: cache populated
        if let Some(site) = self.cached() {
            return Ok(site);
        }

        // Slow path: acquire load lock
        let _guard = self.load_lock.lock().unwrap();

        // Double-check after acquiring lock
        if let Some(site) = self.cached() {
            return Ok(site);
        }

        let start = Instant::now();
        let generation = self.generation.load(Ordering::Acquire);
        let site = Arc::new(self.load_from_storage()?);

        {
            let mut cached = self.cached.write().unwrap();
            if self.generation.load(Ordering::Acquire) == generation {
                *cached = Some(Arc::clone(&site));
            } else {
                tracing::debug!("Reset during load, result not cached");
            }
        }

        tracing::info!(
            document_count = site.documents.len(),
            elapsed_ms = elapsed_ms(start),
            "Documents loaded"
        );

        Ok(site)
    }

    /// Drop the cached result.
    ///
    /// The next [`load_all`](Self::load_all) re-reads every source. Callers
    /// holding an `Arc<LoadedSite>` keep their snapshot.
    ///
    /// # Panics
    ///
    /// Panics if the internal `RwLock` is poisoned.
    pub fn reset(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        *self.cached.write().unwrap() = None;
        tracing::debug!("Document cache reset");
    }

    /// Look up a single document, loading if needed.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if loading fails.
    pub fn document(&self, slug: &str) -> Result<Option<DocumentRecord>, LoadError> {
        Ok(self.load_all()?.document(slug).cloned())
    }

    fn cached(&self) -> Option<Arc<LoadedSite>> {
        self.cached.read().unwrap().clone()
    }

    fn load_from_storage(&self) -> Result<LoadedSite, LoadError> {
        let sources = Self::unique_sources(self.storage.scan()?);

        let raw = sources
            .iter()
            .map(|source| self.storage.read(&source.path))
            .collect::<Result<Vec<_>, _>>()?;

        let mut documents: Vec<DocumentRecord> = sources
            .par_iter()
            .zip(raw.par_iter())
            .map(|(source, raw)| DocumentRecord::build(&source.path, raw, &self.options))
            .collect();
        documents.sort_by(|a, b| collate::compare(&a.slug, &b.slug));

        let sidebar = build_sidebar(&documents, &self.sidebar);

        Ok(LoadedSite { documents, sidebar })
    }

    /// Drop sources whose slug was already claimed by an earlier source.
    fn unique_sources(mut sources: Vec<Source>) -> Vec<Source> {
        sources.sort();
        let mut seen = HashSet::with_capacity(sources.len());
        sources.retain(|source| {
            let slug = slug_from_path(&source.path);
            let first = seen.insert(slug.clone());
            if !first {
                tracing::warn!(slug = %slug, path = %source.path, "Duplicate slug, source ignored");
            }
            first
        });
        sources
    }
}
