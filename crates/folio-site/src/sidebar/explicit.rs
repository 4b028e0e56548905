//! Explicit sidebar: the configured tree, node for node.

use std::collections::HashMap;

use folio_config::SidebarItem;
use tracing::debug;

use super::SidebarNode;
use crate::document::DocumentRecord;
use crate::title::derive_title;

pub(super) fn build(documents: &[DocumentRecord], tree: &[SidebarItem]) -> Vec<SidebarNode> {
    let by_slug: HashMap<&str, &DocumentRecord> = documents
        .iter()
        .map(|doc| (doc.slug.as_str(), doc))
        .collect();

    tree.iter().map(|item| build_node(item, &by_slug)).collect()
}

fn build_node(item: &SidebarItem, by_slug: &HashMap<&str, &DocumentRecord>) -> SidebarNode {
    let doc = by_slug.get(item.path.as_str()).copied();
    let label = item
        .label
        .clone()
        .or_else(|| doc.map(|doc| doc.title.clone()))
        .unwrap_or_else(|| {
            let name = item.path.rsplit('/').next().unwrap_or(&item.path);
            derive_title(name)
        });

    match &item.children {
        Some(children) => SidebarNode::Group {
            path: item.path.clone(),
            label,
            slug: doc.map(|doc| doc.slug.clone()),
            children: children
                .iter()
                .map(|child| build_node(child, by_slug))
                .collect(),
        },
        None => {
            if doc.is_none() {
                debug!(path = %item.path, "Sidebar entry has no matching document");
            }
            SidebarNode::Doc {
                path: item.path.clone(),
                label,
                slug: item.path.clone(),
            }
        }
    }
}
