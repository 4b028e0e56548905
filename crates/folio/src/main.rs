//! Folio CLI - Markdown documentation pipeline.
//!
//! Provides commands for:
//! - `build`: Load and render every document, emit documents and sidebar as JSON
//! - `sidebar`: Print the navigation tree as an indented outline

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BuildArgs, SidebarArgs};
use output::Output;

/// Log filter for `--verbose`.
const VERBOSE_FILTER: &str =
    "warn,folio=debug,folio_config=debug,folio_site=debug,folio_storage=debug,folio_renderer=debug";

/// Folio - Markdown documentation pipeline.
#[derive(Parser)]
#[command(name = "folio", version, about)]
struct Cli {
    /// Enable verbose output (debug logs from folio crates).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render all documents and write them with the sidebar as JSON.
    Build(BuildArgs),
    /// Print the navigation tree.
    Sidebar(SidebarArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // RUST_LOG wins; otherwise --verbose enables DEBUG for folio crates
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cli.verbose { VERBOSE_FILTER } else { "warn" })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Build(args) => args.execute(),
        Commands::Sidebar(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
