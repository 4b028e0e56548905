//! Filesystem storage implementation.
//!
//! Provides [`FsStorage`] for reading markdown sources from a local
//! directory tree.

use std::fs;
use std::path::{Component, Path, PathBuf};

use glob::{MatchOptions, Pattern};
use tracing::{debug, warn};

use crate::storage::{Source, Storage, StorageError, StorageErrorKind};

/// Backend identifier for error messages.
const BACKEND: &str = "Fs";

/// Patterns used when none are configured.
pub const DEFAULT_PATTERNS: &[&str] = &["**/*.md"];

/// Directories that never hold documentation.
const SKIPPED_DIRS: &[&str] = &[
    "node_modules",
    "target",
    "dist",
    "build",
    "vendor",
    "__pycache__",
];

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Filesystem storage implementation.
///
/// Walks the source directory recursively and returns every file whose
/// relative path matches one of the glob patterns. Hidden entries and common
/// build/vendor directories are skipped.
///
/// # Example
///
/// ```no_run
/// use folio_storage::{FsStorage, Storage};
///
/// let storage = FsStorage::with_patterns("docs", &["**/*.md", "**/*.markdown"])?;
/// let sources = storage.scan()?;
/// # Ok::<(), folio_storage::StorageError>(())
/// ```
#[derive(Debug)]
pub struct FsStorage {
    /// Root directory for document storage.
    source_dir: PathBuf,
    /// File filters matched against the relative path.
    patterns: Vec<Pattern>,
}

impl FsStorage {
    /// Create a new filesystem storage with the default `**/*.md` pattern.
    #[must_use]
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            patterns: DEFAULT_PATTERNS
                .iter()
                .filter_map(|p| Pattern::new(p).ok())
                .collect(),
        }
    }

    /// Create a new filesystem storage with custom patterns.
    ///
    /// # Arguments
    ///
    /// * `source_dir` - Root directory containing markdown files
    /// * `patterns` - Glob patterns (e.g., `["**/*.md", "guides/**/*.mdx"]`)
    ///
    /// # Errors
    ///
    /// Returns [`StorageErrorKind::InvalidPattern`] if a pattern does not compile.
    pub fn with_patterns<S: AsRef<str>>(
        source_dir: impl Into<PathBuf>,
        patterns: &[S],
    ) -> Result<Self, StorageError> {
        let patterns = patterns
            .iter()
            .map(|p| {
                Pattern::new(p.as_ref()).map_err(|e| {
                    StorageError::new(StorageErrorKind::InvalidPattern)
                        .with_path(p.as_ref())
                        .with_backend(BACKEND)
                        .with_source(e)
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            source_dir: source_dir.into(),
            patterns,
        })
    }

    /// Root directory of this storage.
    #[must_use]
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Validate that a path doesn't escape the source directory.
    ///
    /// Rejects parent directory components (`..`) and absolute paths.
    fn validate_path(path: &str) -> Result<(), StorageError> {
        let escapes = Path::new(path).components().any(|c| {
            matches!(
                c,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });

        if escapes {
            return Err(StorageError::new(StorageErrorKind::InvalidPath)
                .with_path(path)
                .with_backend(BACKEND));
        }
        Ok(())
    }

    fn matches(&self, rel_path: &str) -> bool {
        self.patterns
            .iter()
            .any(|p| p.matches_with(rel_path, MATCH_OPTIONS))
    }

    /// Scan directory recursively and collect matching sources.
    fn scan_directory(
        &self,
        dir_path: &Path,
        rel_dir: &str,
        sources: &mut Vec<Source>,
    ) -> Result<(), StorageError> {
        let entries = fs::read_dir(dir_path).map_err(|e| {
            StorageError::io(e, Some(dir_path.to_path_buf())).with_backend(BACKEND)
        })?;

        for entry in entries {
            let entry = entry.map_err(|e| {
                StorageError::io(e, Some(dir_path.to_path_buf())).with_backend(BACKEND)
            })?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }

            let is_dir = entry.file_type().is_ok_and(|t| t.is_dir());
            if is_dir && SKIPPED_DIRS.contains(&name.as_str()) {
                continue;
            }

            let rel_path = if rel_dir.is_empty() {
                name
            } else {
                format!("{rel_dir}/{name}")
            };

            if is_dir {
                self.scan_directory(&entry.path(), &rel_path, sources)?;
            } else if self.matches(&rel_path) {
                sources.push(Source::new(rel_path));
            }
        }

        Ok(())
    }
}

impl Storage for FsStorage {
    fn scan(&self) -> Result<Vec<Source>, StorageError> {
        if !self.source_dir.is_dir() {
            warn!(path = %self.source_dir.display(), "Source directory does not exist");
            return Ok(Vec::new());
        }

        let mut sources = Vec::new();
        self.scan_directory(&self.source_dir, "", &mut sources)?;
        sources.sort();

        debug!(
            path = %self.source_dir.display(),
            count = sources.len(),
            "Scanned sources"
        );
        Ok(sources)
    }

    fn read(&self, path: &str) -> Result<String, StorageError> {
        Self::validate_path(path)?;
        let full_path = self.source_dir.join(path);
        fs::read_to_string(&full_path)
            .map_err(|e| StorageError::io(e, Some(full_path.clone())).with_backend(BACKEND))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_fs_storage_is_send_sync() {
        assert_send_sync::<FsStorage>();
    }

    fn create_test_dir() -> tempfile::TempDir {
        tempfile::tempdir().unwrap()
    }

    fn scan_paths(storage: &FsStorage) -> Vec<String> {
        storage
            .scan()
            .unwrap()
            .into_iter()
            .map(|s| s.path)
            .collect()
    }

    #[test]
    fn test_scan_empty_dir() {
        let temp_dir = create_test_dir();

        let storage = FsStorage::new(temp_dir.path());

        assert!(storage.scan().unwrap().is_empty());
    }

    #[test]
    fn test_scan_missing_dir() {
        let storage = FsStorage::new("/nonexistent/folio-docs");

        assert!(storage.scan().unwrap().is_empty());
    }

    #[test]
    fn test_scan_nested_sorted() {
        let temp_dir = create_test_dir();
        let guide = temp_dir.path().join("guide");
        fs::create_dir(&guide).unwrap();
        fs::write(guide.join("start.md"), "# Start").unwrap();
        fs::write(guide.join("intro.md"), "# Intro").unwrap();
        fs::write(temp_dir.path().join("index.md"), "# Home").unwrap();
        fs::write(temp_dir.path().join("api.md"), "# API").unwrap();

        let storage = FsStorage::new(temp_dir.path());

        assert_eq!(
            scan_paths(&storage),
            ["api.md", "guide/intro.md", "guide/start.md", "index.md"]
        );
    }

    #[test]
    fn test_scan_filters_by_pattern() {
        let temp_dir = create_test_dir();
        fs::write(temp_dir.path().join("guide.md"), "# Guide").unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "notes").unwrap();
        fs::write(temp_dir.path().join("image.png"), [0u8; 4]).unwrap();

        let storage = FsStorage::new(temp_dir.path());

        assert_eq!(scan_paths(&storage), ["guide.md"]);
    }

    #[test]
    fn test_scan_pattern_case_insensitive() {
        let temp_dir = create_test_dir();
        fs::write(temp_dir.path().join("README.MD"), "# Readme").unwrap();

        let storage = FsStorage::new(temp_dir.path());

        assert_eq!(scan_paths(&storage), ["README.MD"]);
    }

    #[test]
    fn test_scan_custom_patterns() {
        let temp_dir = create_test_dir();
        let api = temp_dir.path().join("api");
        fs::create_dir(&api).unwrap();
        fs::write(api.join("auth.md"), "# Auth").unwrap();
        fs::write(temp_dir.path().join("guide.md"), "# Guide").unwrap();

        let storage = FsStorage::with_patterns(temp_dir.path(), &["api/*.md"]).unwrap();

        assert_eq!(scan_paths(&storage), ["api/auth.md"]);
    }

    #[test]
    fn test_invalid_pattern() {
        let err = FsStorage::with_patterns("docs", &["[unclosed"]).unwrap_err();

        assert_eq!(err.kind, StorageErrorKind::InvalidPattern);
        assert_eq!(err.backend, Some("Fs"));
    }

    #[test]
    fn test_scan_skips_hidden_entries() {
        let temp_dir = create_test_dir();
        fs::write(temp_dir.path().join(".draft.md"), "# Draft").unwrap();
        let hidden = temp_dir.path().join(".git");
        fs::create_dir(&hidden).unwrap();
        fs::write(hidden.join("notes.md"), "# Notes").unwrap();
        fs::write(temp_dir.path().join("visible.md"), "# Visible").unwrap();

        let storage = FsStorage::new(temp_dir.path());

        assert_eq!(scan_paths(&storage), ["visible.md"]);
    }

    #[test]
    fn test_scan_skips_build_dirs() {
        let temp_dir = create_test_dir();
        for dir in ["node_modules", "target"] {
            let path = temp_dir.path().join(dir);
            fs::create_dir(&path).unwrap();
            fs::write(path.join("readme.md"), "# Vendored").unwrap();
        }
        fs::write(temp_dir.path().join("guide.md"), "# Guide").unwrap();

        let storage = FsStorage::new(temp_dir.path());

        assert_eq!(scan_paths(&storage), ["guide.md"]);
    }

    #[test]
    fn test_read_nested_file() {
        let temp_dir = create_test_dir();
        let domain_dir = temp_dir.path().join("domain");
        fs::create_dir(&domain_dir).unwrap();
        fs::write(domain_dir.join("guide.md"), "# Domain Guide").unwrap();

        let storage = FsStorage::new(temp_dir.path());
        let content = storage.read("domain/guide.md").unwrap();

        assert_eq!(content, "# Domain Guide");
    }

    #[test]
    fn test_read_missing_file() {
        let temp_dir = create_test_dir();

        let storage = FsStorage::new(temp_dir.path());
        let err = storage.read("nonexistent.md").unwrap_err();

        assert_eq!(err.kind, StorageErrorKind::NotFound);
        assert_eq!(err.backend, Some("Fs"));
    }

    #[test]
    fn test_read_rejects_path_traversal() {
        let temp_dir = create_test_dir();

        let storage = FsStorage::new(temp_dir.path());

        for path in ["../etc/passwd", "subdir/../../etc/passwd", "/etc/passwd"] {
            let err = storage.read(path).unwrap_err();
            assert_eq!(err.kind, StorageErrorKind::InvalidPath, "{path}");
        }
    }
}
