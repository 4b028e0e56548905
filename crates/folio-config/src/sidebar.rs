//! Sidebar configuration.
//!
//! The `[sidebar]` table selects one of two composition strategies:
//!
//! ```toml
//! # Explicit tree, rendered exactly as declared
//! [[sidebar.tree]]
//! path = "guide"
//! label = "Guide"
//! [[sidebar.tree.children]]
//! path = "guide/intro"
//!
//! # Or: tree inferred from document slugs, with overrides
//! [sidebar]
//! order = ["guide", "api"]
//! labels = { "guide" = "User guide" }
//! children_order = { "guide" = ["guide/start", "guide/intro"] }
//! ```

use std::collections::{HashMap, HashSet};

use serde::Deserialize;

use crate::ConfigError;

/// One node of an explicit sidebar tree.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SidebarItem {
    /// Document slug or group path.
    pub path: String,
    /// Display label; falls back to the document title, then the path.
    #[serde(default)]
    pub label: Option<String>,
    /// Child nodes. `Some(vec![])` declares an empty group.
    #[serde(default)]
    pub children: Option<Vec<SidebarItem>>,
}

impl SidebarItem {
    /// Create a leaf item.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            label: None,
            children: None,
        }
    }

    /// Set the display label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Turn the item into a group with the given children.
    #[must_use]
    pub fn with_children(mut self, children: Vec<SidebarItem>) -> Self {
        self.children = Some(children);
        self
    }
}

/// Override tables applied to an inferred sidebar.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SidebarOverrides {
    /// Path to display label.
    pub labels: HashMap<String, String>,
    /// Preferred order of top-level paths.
    pub order: Vec<String>,
    /// Group path to preferred order of its direct children.
    pub children_order: HashMap<String, Vec<String>>,
}

/// Sidebar composition strategy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SidebarConfig {
    /// Render the configured tree as-is.
    Explicit(Vec<SidebarItem>),
    /// Infer the tree from document slugs and apply overrides.
    Inferred(SidebarOverrides),
}

impl Default for SidebarConfig {
    fn default() -> Self {
        Self::Inferred(SidebarOverrides::default())
    }
}

/// Raw `[sidebar]` table as parsed from TOML.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SidebarSection {
    tree: Option<Vec<SidebarItem>>,
    labels: Option<HashMap<String, String>>,
    order: Option<Vec<String>>,
    #[serde(alias = "childrenOrder")]
    children_order: Option<HashMap<String, Vec<String>>>,
}

impl SidebarSection {
    /// Pick the strategy and validate it.
    pub(crate) fn resolve(self) -> Result<SidebarConfig, ConfigError> {
        match self.tree {
            Some(tree) => {
                if self.labels.is_some() || self.order.is_some() || self.children_order.is_some() {
                    return Err(ConfigError::Validation(
                        "sidebar.tree cannot be combined with sidebar.labels, sidebar.order or sidebar.children_order".to_owned(),
                    ));
                }
                validate_tree(&tree)?;
                Ok(SidebarConfig::Explicit(tree))
            }
            None => Ok(SidebarConfig::Inferred(SidebarOverrides {
                labels: self.labels.unwrap_or_default(),
                order: self.order.unwrap_or_default(),
                children_order: self.children_order.unwrap_or_default(),
            })),
        }
    }
}

/// Check that tree paths are non-empty, unique, and nested under their parent.
fn validate_tree(tree: &[SidebarItem]) -> Result<(), ConfigError> {
    fn walk<'a>(
        items: &'a [SidebarItem],
        parent: Option<&str>,
        seen: &mut HashSet<&'a str>,
    ) -> Result<(), ConfigError> {
        for item in items {
            if item.path.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "sidebar.tree entries require a non-empty path".to_owned(),
                ));
            }
            if !seen.insert(&item.path) {
                return Err(ConfigError::Validation(format!(
                    "sidebar.tree path '{}' is listed more than once",
                    item.path
                )));
            }
            if let Some(parent) = parent
                && !item
                    .path
                    .strip_prefix(parent)
                    .is_some_and(|rest| rest.starts_with('/'))
            {
                return Err(ConfigError::Validation(format!(
                    "sidebar.tree path '{}' must be nested under '{parent}'",
                    item.path
                )));
            }
            if let Some(children) = &item.children {
                walk(children, Some(&item.path), seen)?;
            }
        }
        Ok(())
    }

    walk(tree, None, &mut HashSet::new())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(toml: &str) -> Result<SidebarConfig, ConfigError> {
        let section: SidebarSection = toml::from_str(toml)?;
        section.resolve()
    }

    #[test]
    fn test_empty_section_is_inferred() {
        assert_eq!(parse("").unwrap(), SidebarConfig::default());
    }

    #[test]
    fn test_parse_explicit_tree() {
        let config = parse(
            r#"
[[tree]]
path = "guide"
label = "Guide"

[[tree.children]]
path = "guide/intro"

[[tree]]
path = "changelog"

[[tree]]
path = "drafts"
children = []
"#,
        )
        .unwrap();

        assert_eq!(
            config,
            SidebarConfig::Explicit(vec![
                SidebarItem::new("guide")
                    .with_label("Guide")
                    .with_children(vec![SidebarItem::new("guide/intro")]),
                SidebarItem::new("changelog"),
                SidebarItem::new("drafts").with_children(Vec::new()),
            ])
        );
    }

    #[test]
    fn test_parse_overrides() {
        let config = parse(
            r#"
order = ["guide", "api"]

[labels]
"guide" = "User guide"

[children_order]
"guide" = ["guide/start", "guide/intro"]
"#,
        )
        .unwrap();

        let SidebarConfig::Inferred(overrides) = config else {
            panic!("expected inferred config");
        };
        assert_eq!(overrides.order, ["guide", "api"]);
        assert_eq!(overrides.labels["guide"], "User guide");
        assert_eq!(
            overrides.children_order["guide"],
            ["guide/start", "guide/intro"]
        );
    }

    #[test]
    fn test_children_order_camel_case_alias() {
        let config = parse(
            r#"
[childrenOrder]
"api" = ["api/auth"]
"#,
        )
        .unwrap();

        let SidebarConfig::Inferred(overrides) = config else {
            panic!("expected inferred config");
        };
        assert_eq!(overrides.children_order["api"], ["api/auth"]);
    }

    #[test]
    fn test_tree_with_overrides_rejected() {
        let err = parse(
            r#"
order = ["guide"]

[[tree]]
path = "guide"
"#,
        )
        .unwrap_err();

        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("sidebar.tree"));
    }

    #[test]
    fn test_tree_duplicate_path_rejected() {
        let err = parse(
            r#"
[[tree]]
path = "guide"

[[tree]]
path = "guide"
"#,
        )
        .unwrap_err();

        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_tree_child_outside_parent_rejected() {
        let err = parse(
            r#"
[[tree]]
path = "guide"

[[tree.children]]
path = "guidebook/intro"
"#,
        )
        .unwrap_err();

        assert!(err.to_string().contains("nested under 'guide'"));
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(matches!(parse("sort = true"), Err(ConfigError::Parse(_))));
    }
}
