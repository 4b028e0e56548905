//! Configuration management for Folio.
//!
//! Parses `folio.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! `docs.source_dir` supports environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default

mod expand;
mod sidebar;

use std::path::{Path, PathBuf};

use folio_renderer::{DEFAULT_DIAGRAM_LANGUAGE, Locale};
use serde::Deserialize;

pub use sidebar::{SidebarConfig, SidebarItem, SidebarOverrides};

use crate::sidebar::SidebarSection;

/// Configuration filename to search for.
pub const CONFIG_FILENAME: &str = "folio.toml";

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override docs source directory.
    pub source_dir: Option<PathBuf>,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Source discovery settings.
    pub docs: DocsConfig,
    /// Rendering settings.
    pub render: RenderConfig,
    /// Sidebar composition strategy.
    pub sidebar: SidebarConfig,
    /// Path to the config file, if one was loaded.
    pub config_path: Option<PathBuf>,
}

/// Resolved documentation source configuration.
#[derive(Debug, Clone)]
pub struct DocsConfig {
    /// Source directory for markdown files.
    pub source_dir: PathBuf,
    /// Glob patterns selecting source files, relative to `source_dir`.
    pub patterns: Vec<String>,
}

/// Resolved rendering configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Language of call-out titles.
    pub locale: Locale,
    /// Fence keyword passed through for client-side diagram rendering.
    pub diagram_language: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            diagram_language: DEFAULT_DIAGRAM_LANGUAGE.to_owned(),
        }
    }
}

/// `folio.toml` as parsed, before validation and path resolution.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    docs: DocsSection,
    render: RenderSection,
    sidebar: SidebarSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct DocsSection {
    source_dir: Option<String>,
    patterns: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RenderSection {
    locale: Option<String>,
    diagram_language: Option<String>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// A `${VAR}` reference without default names an unset variable.
    #[error("{field} references ${{{var}}}, which is not set")]
    MissingEnvVar {
        /// Config field path (e.g., "`docs.source_dir`").
        field: String,
        var: String,
    },
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `folio.toml` in current directory and parents,
    /// falling back to defaults relative to the current directory.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, or if parsing
    /// or validation fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else {
            let cwd = std::env::current_dir()?;
            match discover_config(&cwd) {
                Some(discovered) => Self::load_from_file(&discovered)?,
                None => Self::default_with_base(&cwd),
            }
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.docs.source_dir.clone_from(source_dir);
        }
    }

    /// Create default config with paths relative to given base directory.
    #[must_use]
    pub fn default_with_base(base: &Path) -> Self {
        Self {
            docs: DocsConfig {
                source_dir: base.join("docs"),
                patterns: default_patterns(),
            },
            render: RenderConfig::default(),
            sidebar: SidebarConfig::default(),
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config_dir = path.parent().unwrap_or(Path::new("."));
        let mut config = Self::from_toml(&content, config_dir)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Parse, expand, validate and resolve configuration text.
    ///
    /// Relative paths are resolved against `config_dir`.
    fn from_toml(content: &str, config_dir: &Path) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(content)?;

        let source_dir = match file.docs.source_dir {
            Some(dir) => expand::expand_env(&dir, "docs.source_dir")?,
            None => "docs".to_owned(),
        };
        let patterns = file.docs.patterns.unwrap_or_else(default_patterns);
        if patterns.is_empty() {
            return Err(ConfigError::Validation(
                "docs.patterns cannot be empty".to_owned(),
            ));
        }

        let locale = match file.render.locale {
            Some(tag) => tag
                .parse::<Locale>()
                .map_err(|e| ConfigError::Validation(format!("render.locale: {e}")))?,
            None => Locale::default(),
        };
        let diagram_language = file
            .render
            .diagram_language
            .unwrap_or_else(|| DEFAULT_DIAGRAM_LANGUAGE.to_owned());
        if diagram_language.is_empty() || diagram_language.contains(char::is_whitespace) {
            return Err(ConfigError::Validation(format!(
                "render.diagram_language must be a single word, got '{diagram_language}'"
            )));
        }

        Ok(Self {
            docs: DocsConfig {
                source_dir: config_dir.join(source_dir),
                patterns,
            },
            render: RenderConfig {
                locale,
                diagram_language,
            },
            sidebar: file.sidebar.resolve()?,
            config_path: None,
        })
    }
}

fn default_patterns() -> Vec<String> {
    vec!["**/*.md".to_owned()]
}

/// Search for a config file in `start` and its parents.
#[must_use]
pub fn discover_config(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(CONFIG_FILENAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}
