//! Document loading and navigation for Folio.
//!
//! This crate provides:
//! - [`DocumentLoader`]: reads, renders and caches every source document
//! - [`build_sidebar`]: navigation tree from the loaded documents
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//!
//! use folio_config::SidebarConfig;
//! use folio_site::{DocumentLoader, RenderOptions};
//! use folio_storage::MockStorage;
//!
//! let storage = MockStorage::new()
//!     .with_file("guide/intro.md", "# Introduction")
//!     .with_file("guide/start.md", "# Getting Started");
//! let loader = DocumentLoader::new(
//!     Arc::new(storage),
//!     SidebarConfig::default(),
//!     RenderOptions::default(),
//! );
//!
//! let site = loader.load_all()?;
//! assert_eq!(site.documents[0].slug, "guide/intro");
//! assert_eq!(site.sidebar[0].label(), "Guide");
//! # Ok::<(), folio_site::LoadError>(())
//! ```

pub mod collate;
mod document;
mod loader;
mod sidebar;
mod title;

pub use document::{DocumentRecord, RenderOptions, slug_from_path};
pub use loader::{DocumentLoader, LoadError, LoadedSite};
pub use sidebar::{SidebarNode, build_sidebar};
pub use title::derive_title;

// Re-export TocEntry from folio-renderer for convenience
pub use folio_renderer::TocEntry;
