//! Document tree building.
//!
//! Walks the content root and produces an ordered tree of folders and
//! documents. The walk fails closed: anything it cannot read, or anything
//! that resolves outside the root, is left out rather than reported.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use folio_core::traits::DEFAULT_EXTENSIONS;
use folio_core::util::files::{canonicalize, has_extension};
use folio_core::util::paths::{is_within, to_slash_path};
use futures::future::BoxFuture;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use tokio::fs;

/// Kind of a tree entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    /// A renderable document.
    File,
    /// A directory.
    Folder,
}

/// One entry under the content root.
///
/// Folders always serialize `children` (possibly empty); files never do.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContentNode {
    /// Name with the document extension stripped.
    pub title: String,
    /// Root-relative, `/`-separated path. Files keep their extension.
    pub path: String,
    /// File or folder.
    #[serde(rename = "type")]
    pub node_type: NodeType,
    /// Sorted children; always empty for files.
    #[serde(default)]
    pub children: Vec<ContentNode>,
}

impl ContentNode {
    /// Create a document node.
    pub fn file(title: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            path: path.into(),
            node_type: NodeType::File,
            children: Vec::new(),
        }
    }

    /// Create a folder node.
    pub fn folder(
        title: impl Into<String>,
        path: impl Into<String>,
        children: Vec<ContentNode>,
    ) -> Self {
        Self {
            title: title.into(),
            path: path.into(),
            node_type: NodeType::Folder,
            children,
        }
    }

    /// Whether this node is a folder.
    pub fn is_folder(&self) -> bool {
        self.node_type == NodeType::Folder
    }

    /// Number of documents in this subtree.
    pub fn document_count(&self) -> usize {
        match self.node_type {
            NodeType::File => 1,
            NodeType::Folder => self.children.iter().map(ContentNode::document_count).sum(),
        }
    }
}

impl Serialize for ContentNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.is_folder() { 4 } else { 3 };
        let mut state = serializer.serialize_struct("ContentNode", len)?;
        state.serialize_field("title", &self.title)?;
        state.serialize_field("path", &self.path)?;
        state.serialize_field("type", &self.node_type)?;
        if self.is_folder() {
            state.serialize_field("children", &self.children)?;
        } else {
            state.skip_field("children")?;
        }
        state.end()
    }
}

/// Sibling order: folders first, then case-insensitive title, then exact
/// title, then path.
pub fn sibling_order(a: &ContentNode, b: &ContentNode) -> Ordering {
    let rank = |n: &ContentNode| match n.node_type {
        NodeType::Folder => 0,
        NodeType::File => 1,
    };
    rank(a)
        .cmp(&rank(b))
        .then_with(|| a.title.to_lowercase().cmp(&b.title.to_lowercase()))
        .then_with(|| a.title.cmp(&b.title))
        .then_with(|| a.path.cmp(&b.path))
}

/// Options controlling which entries make it into the tree.
#[derive(Debug, Clone)]
pub struct TreeOptions {
    /// Document extensions without the dot.
    pub extensions: Vec<String>,
    /// Whether to skip names starting with `.`.
    pub skip_hidden: bool,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| (*e).to_string()).collect(),
            skip_hidden: true,
        }
    }
}

impl TreeOptions {
    /// Use the given document extensions.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }
}

/// Build the document tree under `root` with default options.
pub async fn build_tree(root: &Path) -> Vec<ContentNode> {
    build_tree_with(root, &TreeOptions::default()).await
}

/// Build the document tree under `root`.
///
/// Returns an empty vector if the root is missing or unreadable.
pub async fn build_tree_with(root: &Path, options: &TreeOptions) -> Vec<ContentNode> {
    let canonical_root = match canonicalize(root).await {
        Ok(p) => p,
        Err(e) => {
            log::warn!("content root unavailable: {e}");
            return Vec::new();
        }
    };

    let mut walker = Walker {
        root: canonical_root.clone(),
        options,
        ancestors: HashSet::new(),
    };
    walker.ancestors.insert(canonical_root.clone());
    walker.walk(canonical_root, PathBuf::new()).await
}

struct Walker<'a> {
    root: PathBuf,
    options: &'a TreeOptions,
    ancestors: HashSet<PathBuf>,
}

impl<'a> Walker<'a> {
    /// Read one directory. `dir` is canonical, `relative` is its path below
    /// the root as the user sees it (symlink names preserved).
    fn walk(&mut self, dir: PathBuf, relative: PathBuf) -> BoxFuture<'_, Vec<ContentNode>> {
        Box::pin(async move {
            let mut entries = match fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) => {
                    log::warn!("cannot read {}: {e}", dir.display());
                    return Vec::new();
                }
            };

            let mut nodes = Vec::new();
            loop {
                let entry = match entries.next_entry().await {
                    Ok(Some(entry)) => entry,
                    Ok(None) => break,
                    Err(e) => {
                        log::warn!("error listing {}: {e}", dir.display());
                        break;
                    }
                };

                let file_name = entry.file_name();
                let Some(name) = file_name.to_str() else {
                    log::debug!("skipping non-UTF-8 name in {}", dir.display());
                    continue;
                };
                if self.options.skip_hidden && name.starts_with('.') {
                    continue;
                }

                let Ok(target) = fs::canonicalize(entry.path()).await else {
                    log::debug!("skipping dangling entry {}", entry.path().display());
                    continue;
                };
                if !is_within(&self.root, &target) {
                    log::warn!(
                        "skipping {} which resolves outside the content root",
                        entry.path().display()
                    );
                    continue;
                }

                let Ok(metadata) = fs::metadata(&target).await else {
                    continue;
                };
                let child_relative = relative.join(name);

                if metadata.is_dir() {
                    // Only ancestors are tracked, so a directory reachable
                    // through two different names is listed under both.
                    if !self.ancestors.insert(target.clone()) {
                        log::debug!("skipping symlink cycle at {}", entry.path().display());
                        continue;
                    }
                    let children = self.walk(target.clone(), child_relative.clone()).await;
                    self.ancestors.remove(&target);
                    // Child folders without documents are already gone, so
                    // no children means no documents anywhere below.
                    if children.is_empty() {
                        log::debug!("skipping {} which holds no documents", entry.path().display());
                        continue;
                    }
                    nodes.push(ContentNode::folder(
                        name,
                        to_slash_path(&child_relative),
                        children,
                    ));
                } else if metadata.is_file() && has_extension(&child_relative, &self.options.extensions) {
                    nodes.push(ContentNode::file(
                        strip_extension(name),
                        to_slash_path(&child_relative),
                    ));
                }
            }

            nodes.sort_by(sibling_order);
            nodes
        })
    }
}

fn strip_extension(name: &str) -> &str {
    Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(name)
}
