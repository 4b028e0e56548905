//! CLI command implementations.

pub(crate) mod build;
pub(crate) mod sidebar;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use folio_config::{CliSettings, Config};
use folio_site::{DocumentLoader, RenderOptions};
use folio_storage::FsStorage;

pub(crate) use build::BuildArgs;
pub(crate) use sidebar::SidebarArgs;

use crate::error::CliError;
use crate::output::Output;

/// Options shared by every command that loads documents.
#[derive(Args)]
pub(crate) struct SourceArgs {
    /// Path to configuration file (default: auto-discover folio.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Markdown source directory (overrides config).
    #[arg(short, long, env = "FOLIO_SOURCE_DIR")]
    source_dir: Option<PathBuf>,
}

impl SourceArgs {
    /// Load configuration and build a loader over the configured sources.
    pub(crate) fn open(self, output: &Output) -> Result<DocumentLoader, CliError> {
        let cli_settings = CliSettings {
            source_dir: self.source_dir,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        if let Some(path) = &config.config_path {
            output.info(&format!("Config: {}", path.display()));
        }
        output.info(&format!("Source: {}", config.docs.source_dir.display()));

        let storage =
            FsStorage::with_patterns(&config.docs.source_dir, config.docs.patterns.as_slice())?;

        Ok(DocumentLoader::new(
            Arc::new(storage),
            config.sidebar,
            RenderOptions::from(&config.render),
        ))
    }
}
