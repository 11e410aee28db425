//! Navigation model for the site sidebar.
//!
//! Projects a [`ContentNode`] tree into a two-level menu. Icons are symbolic
//! names so the front end decides how to draw them.

use serde::{Deserialize, Serialize};

use crate::tree::ContentNode;

/// Link target for entries that cannot be navigated to.
pub const NO_LINK: &str = "#";

/// Default prefix for document links.
pub const DEFAULT_URL_PREFIX: &str = "/docs";

/// Closed set of icon names understood by the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavIcon {
    /// Folder entries.
    FolderOpen,
    /// Document entries.
    FileText,
    /// The fallback entry.
    BookOpen,
}

/// Second-level menu entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavSubItem {
    /// Display text.
    pub title: String,
    /// Link target.
    pub url: String,
}

/// Top-level menu entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavItem {
    /// Display text.
    pub title: String,
    /// Link target, [`NO_LINK`] for folders.
    pub url: String,
    /// Icon name.
    pub icon: NavIcon,
    /// Whether the entry starts expanded.
    pub is_active: bool,
    /// Children one level down; deeper levels are not represented.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<NavSubItem>>,
}

/// Response body of the tree endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavModel {
    /// Sidebar entries.
    pub nav_main: Vec<NavItem>,
}

/// Build the document link for a root-relative path.
///
/// Each segment is percent-encoded on its own so `/` keeps its meaning.
pub fn document_url(prefix: &str, path: &str) -> String {
    let encoded = path
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| urlencoding::encode(s).into_owned())
        .collect::<Vec<_>>()
        .join("/");
    format!("{}/{}", prefix.trim_end_matches('/'), encoded)
}

fn node_url(prefix: &str, node: &ContentNode) -> String {
    if node.is_folder() {
        NO_LINK.to_string()
    } else {
        document_url(prefix, &node.path)
    }
}

/// Project a tree into navigation items using [`DEFAULT_URL_PREFIX`].
pub fn to_nav_model(tree: &[ContentNode]) -> Vec<NavItem> {
    to_nav_model_with_prefix(tree, DEFAULT_URL_PREFIX)
}

/// Project a tree into navigation items.
///
/// One item per top-level node; the first one is marked active.
pub fn to_nav_model_with_prefix(tree: &[ContentNode], prefix: &str) -> Vec<NavItem> {
    tree.iter()
        .enumerate()
        .map(|(index, node)| {
            let items = (node.is_folder() && !node.children.is_empty()).then(|| {
                node.children
                    .iter()
                    .map(|child| NavSubItem {
                        title: child.title.clone(),
                        url: node_url(prefix, child),
                    })
                    .collect()
            });

            NavItem {
                title: node.title.clone(),
                url: node_url(prefix, node),
                icon: if node.is_folder() {
                    NavIcon::FolderOpen
                } else {
                    NavIcon::FileText
                },
                is_active: index == 0,
                items,
            }
        })
        .collect()
}

/// The menu shown when the content tree is unavailable.
pub fn fallback_nav() -> Vec<NavItem> {
    vec![NavItem {
        title: "Documentation".to_string(),
        url: NO_LINK.to_string(),
        icon: NavIcon::BookOpen,
        is_active: true,
        items: Some(vec![NavSubItem {
            title: "Getting Started".to_string(),
            url: DEFAULT_URL_PREFIX.to_string(),
        }]),
    }]
}

/// Navigation for a tree build result, substituting [`fallback_nav`] when
/// the build failed or produced nothing.
pub fn nav_or_fallback<E: std::fmt::Display>(
    tree: Result<Vec<ContentNode>, E>,
    prefix: &str,
) -> Vec<NavItem> {
    match tree {
        Ok(nodes) if !nodes.is_empty() => to_nav_model_with_prefix(&nodes, prefix),
        Ok(_) => {
            log::warn!("content tree is empty; serving fallback navigation");
            fallback_nav()
        }
        Err(e) => {
            log::error!("failed to build content tree: {e}; serving fallback navigation");
            fallback_nav()
        }
    }
}
