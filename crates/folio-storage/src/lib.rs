//! Source document storage for Folio.
//!
//! This crate provides a [`Storage`] trait for discovering markdown sources
//! and reading their raw text, decoupling the document loader from the
//! filesystem.
//!
//! # Architecture
//!
//! The crate provides:
//! - [`Storage`] trait with `scan()` and `read()` methods
//! - [`FsStorage`] walking a source directory with glob filters
//! - [`MockStorage`] for testing (behind `mock` feature flag)
//!
//! # Example
//!
//! ```no_run
//! use folio_storage::{FsStorage, Storage};
//!
//! let storage = FsStorage::new("docs");
//! for source in storage.scan()? {
//!     let raw = storage.read(&source.path)?;
//!     println!("{}: {} bytes", source.path, raw.len());
//! }
//! # Ok::<(), folio_storage::StorageError>(())
//! ```

mod fs;
#[cfg(feature = "mock")]
mod mock;
mod storage;

pub use fs::{DEFAULT_PATTERNS, FsStorage};
#[cfg(feature = "mock")]
pub use mock::MockStorage;
pub use storage::{ErrorStatus, Source, Storage, StorageError, StorageErrorKind};
