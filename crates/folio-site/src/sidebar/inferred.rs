//! Inferred sidebar: groups derived from slug segments.
//!
//! Every slug segment but the last becomes a group keyed by the accumulated
//! path. A document whose slug equals a group path is that group's landing
//! document. Labels and ordering can then be overridden per path.

use std::collections::HashMap;

use folio_config::SidebarOverrides;

use super::SidebarNode;
use crate::collate;
use crate::document::DocumentRecord;
use crate::title::derive_title;

/// Tree node under construction. `children` is `None` for plain documents.
struct Entry {
    path: String,
    label: String,
    slug: Option<String>,
    children: Option<Vec<Entry>>,
}

impl Entry {
    fn group(path: String, segment: &str) -> Self {
        Self {
            label: derive_title(segment),
            path,
            slug: None,
            children: Some(Vec::new()),
        }
    }

    fn into_node(self) -> SidebarNode {
        match self.children {
            Some(children) => SidebarNode::Group {
                path: self.path,
                label: self.label,
                slug: self.slug,
                children: children.into_iter().map(Entry::into_node).collect(),
            },
            None => SidebarNode::Doc {
                slug: self.path.clone(),
                path: self.path,
                label: self.label,
            },
        }
    }
}

pub(super) fn build(documents: &[DocumentRecord], overrides: &SidebarOverrides) -> Vec<SidebarNode> {
    let mut root = Vec::new();
    for doc in documents {
        insert(&mut root, doc);
    }

    apply_labels(&mut root, &overrides.labels);
    sort_level(&mut root, "", overrides);

    root.into_iter().map(Entry::into_node).collect()
}

fn insert(root: &mut Vec<Entry>, doc: &DocumentRecord) {
    let mut level = root;
    let mut path = String::new();
    let mut segments = doc.slug.split('/').peekable();

    while let Some(segment) = segments.next() {
        if !path.is_empty() {
            path.push('/');
        }
        path.push_str(segment);

        if segments.peek().is_none() {
            attach_document(level, doc);
            return;
        }
        level = descend(level, &path, segment);
    }
}

/// Find or create the group at `path` and return its children.
///
/// A document already sitting at `path` turns into a group with itself as
/// landing document.
fn descend<'a>(level: &'a mut Vec<Entry>, path: &str, segment: &str) -> &'a mut Vec<Entry> {
    let index = match level.iter().position(|entry| entry.path == path) {
        Some(index) => index,
        None => {
            level.push(Entry::group(path.to_owned(), segment));
            level.len() - 1
        }
    };

    let entry = &mut level[index];
    if entry.children.is_none() {
        entry.slug = Some(entry.path.clone());
    }
    entry.children.get_or_insert_with(Vec::new)
}

fn attach_document(level: &mut Vec<Entry>, doc: &DocumentRecord) {
    if let Some(group) = level.iter_mut().find(|entry| entry.path == doc.slug) {
        group.label.clone_from(&doc.title);
        group.slug = Some(doc.slug.clone());
        return;
    }

    level.push(Entry {
        path: doc.slug.clone(),
        label: doc.title.clone(),
        slug: Some(doc.slug.clone()),
        children: None,
    });
}

fn apply_labels(entries: &mut [Entry], labels: &HashMap<String, String>) {
    for entry in entries {
        if let Some(label) = labels.get(&entry.path) {
            entry.label.clone_from(label);
        }
        if let Some(children) = &mut entry.children {
            apply_labels(children, labels);
        }
    }
}

/// Sort `entries` (the children of `parent`) and recurse.
fn sort_level(entries: &mut [Entry], parent: &str, overrides: &SidebarOverrides) {
    match order_list(parent, overrides) {
        Some(order) => entries.sort_by_key(|entry| {
            order
                .iter()
                .position(|path| *path == entry.path)
                .unwrap_or(usize::MAX)
        }),
        None => entries.sort_by(|a, b| collate::compare(&a.label, &b.label)),
    }

    for entry in entries {
        if let Some(children) = &mut entry.children {
            sort_level(children, &entry.path, overrides);
        }
    }
}

/// Order list for the children of `parent`, if one applies.
///
/// `children_order[parent]` wins; otherwise the entries of `order` that name
/// direct children of `parent`.
fn order_list<'a>(parent: &str, overrides: &'a SidebarOverrides) -> Option<Vec<&'a str>> {
    if let Some(order) = overrides.children_order.get(parent) {
        return Some(order.iter().map(String::as_str).collect());
    }

    let listed: Vec<&str> = overrides
        .order
        .iter()
        .map(String::as_str)
        .filter(|path| is_direct_child(parent, path))
        .collect();
    (!listed.is_empty()).then_some(listed)
}

fn is_direct_child(parent: &str, path: &str) -> bool {
    let rest = if parent.is_empty() {
        Some(path)
    } else {
        path.strip_prefix(parent).and_then(|rest| rest.strip_prefix('/'))
    };
    rest.is_some_and(|rest| !rest.is_empty() && !rest.contains('/'))
}
