//! `folio build` command implementation.

use std::path::PathBuf;

use clap::Args;

use super::SourceArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Write JSON to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print the JSON.
    #[arg(long)]
    pretty: bool,
}

impl BuildArgs {
    /// Execute the build command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, loading or writing fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let loader = self.source.open(&output)?;

        let site = loader.load_all()?;
        if site.documents.is_empty() {
            output.warning("No documents found");
        }

        let json = if self.pretty {
            serde_json::to_string_pretty(&*site)?
        } else {
            serde_json::to_string(&*site)?
        };

        match self.output {
            Some(path) => {
                std::fs::write(&path, json)?;
                output.success(&format!(
                    "Wrote {} documents to {}",
                    site.documents.len(),
                    path.display()
                ));
            }
            None => output.emit(&format!("{json}\n"))?,
        }

        Ok(())
    }
}
