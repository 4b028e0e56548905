//! `folio sidebar` command implementation.

use std::fmt::Write as _;

use clap::Args;
use folio_site::SidebarNode;

use super::SourceArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the sidebar command.
#[derive(Args)]
pub(crate) struct SidebarArgs {
    #[command(flatten)]
    source: SourceArgs,
}

impl SidebarArgs {
    /// Execute the sidebar command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration or loading fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let loader = self.source.open(&output)?;

        let site = loader.load_all()?;
        if site.sidebar.is_empty() {
            output.warning("Sidebar is empty");
            return Ok(());
        }

        output.emit(&format_outline(&site.sidebar))?;
        Ok(())
    }
}

/// Render nodes as an indented outline, two spaces per level.
///
/// Groups are marked with `+`, documents with `-`. Linked slugs follow in
/// brackets.
fn format_outline(nodes: &[SidebarNode]) -> String {
    fn walk(nodes: &[SidebarNode], depth: usize, out: &mut String) {
        for node in nodes {
            let marker = match node {
                SidebarNode::Doc { .. } => '-',
                SidebarNode::Group { .. } => '+',
            };
            write!(out, "{:indent$}{marker} {}", "", node.label(), indent = depth * 2).unwrap();
            if let Some(slug) = node.slug() {
                write!(out, " [{slug}]").unwrap();
            }
            out.push('\n');
            walk(node.children(), depth + 1, out);
        }
    }

    let mut out = String::new();
    walk(nodes, 0, &mut out);
    out
}
