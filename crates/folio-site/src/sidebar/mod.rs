//! Sidebar composition.
//!
//! [`build_sidebar`] turns the loaded documents into a navigation tree. The
//! strategy is picked by the [`SidebarConfig`] variant:
//! - [`SidebarConfig::Explicit`] renders the configured tree as declared
//! - [`SidebarConfig::Inferred`] derives groups from document slugs and then
//!   applies label and ordering overrides

mod explicit;
mod inferred;

use folio_config::SidebarConfig;
use serde::Serialize;

use crate::document::DocumentRecord;

/// A navigation tree node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SidebarNode {
    /// Link to a single document.
    Doc {
        path: String,
        label: String,
        slug: String,
    },
    /// Collapsible group of nodes.
    Group {
        path: String,
        label: String,
        /// Landing document at exactly this path, if any.
        #[serde(skip_serializing_if = "Option::is_none")]
        slug: Option<String>,
        children: Vec<SidebarNode>,
    },
}

impl SidebarNode {
    /// Unique path of the node.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::Doc { path, .. } | Self::Group { path, .. } => path,
        }
    }

    /// Display label.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Doc { label, .. } | Self::Group { label, .. } => label,
        }
    }

    /// Document slug the node links to.
    #[must_use]
    pub fn slug(&self) -> Option<&str> {
        match self {
            Self::Doc { slug, .. } => Some(slug),
            Self::Group { slug, .. } => slug.as_deref(),
        }
    }

    /// Child nodes; empty for documents.
    #[must_use]
    pub fn children(&self) -> &[SidebarNode] {
        match self {
            Self::Doc { .. } => &[],
            Self::Group { children, .. } => children,
        }
    }
}

/// Build the navigation tree for `documents`.
///
/// Returns the children of the synthetic root.
#[must_use]
pub fn build_sidebar(documents: &[DocumentRecord], config: &SidebarConfig) -> Vec<SidebarNode> {
    match config {
        SidebarConfig::Explicit(tree) => explicit::build(documents, tree),
        SidebarConfig::Inferred(overrides) => inferred::build(documents, overrides),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use folio_config::{SidebarItem, SidebarOverrides};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::document::RenderOptions;

    /// Build a record for `slug` with the given markdown source.
    pub(crate) fn doc(slug: &str, source: &str) -> DocumentRecord {
        DocumentRecord::build(&format!("{slug}.md"), source, &RenderOptions::default())
    }

    #[test]
    fn test_dispatch_explicit() {
        let documents = [doc("guide", "# Guide")];
        let config = SidebarConfig::Explicit(vec![SidebarItem::new("guide")]);

        let sidebar = build_sidebar(&documents, &config);

        assert_eq!(
            sidebar,
            vec![SidebarNode::Doc {
                path: "guide".to_owned(),
                label: "Guide".to_owned(),
                slug: "guide".to_owned(),
            }]
        );
    }

    #[test]
    fn test_dispatch_inferred() {
        let documents = [doc("guide/intro", "# Intro")];
        let config = SidebarConfig::Inferred(SidebarOverrides::default());

        let sidebar = build_sidebar(&documents, &config);

        assert_eq!(sidebar.len(), 1);
        assert_eq!(sidebar[0].path(), "guide");
        assert_eq!(sidebar[0].children()[0].slug(), Some("guide/intro"));
    }

    #[test]
    fn test_serialize_tagged() {
        let nodes = vec![SidebarNode::Group {
            path: "guide".to_owned(),
            label: "Guide".to_owned(),
            slug: None,
            children: vec![SidebarNode::Doc {
                path: "guide/intro".to_owned(),
                label: "Intro".to_owned(),
                slug: "guide/intro".to_owned(),
            }],
        }];

        let json = serde_json::to_value(&nodes).unwrap();

        assert_eq!(
            json,
            serde_json::json!([{
                "type": "group",
                "path": "guide",
                "label": "Guide",
                "children": [{
                    "type": "doc",
                    "path": "guide/intro",
                    "label": "Intro",
                    "slug": "guide/intro"
                }]
            }])
        );
    }
}
