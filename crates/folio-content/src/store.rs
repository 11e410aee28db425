//! Document resolution under the content root.

use std::path::{Path, PathBuf};

use folio_core::traits::ConfigProvider;
use folio_core::util::files::{canonicalize, has_extension, is_file, read_file};
use folio_core::util::paths::{is_within, sanitize_relative};
use folio_core::{Error, Result};

use crate::frontmatter::{self, PostMetadata};
use crate::nav::{self, NavItem};
use crate::tree::{self, ContentNode, TreeOptions};

/// Read access to the documents under one content root.
///
/// Every lookup is confined to the root: request paths are sanitised and
/// the final file is canonicalised and checked against the canonical root,
/// so symlinks cannot be used to read elsewhere.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    root: PathBuf,
    options: TreeOptions,
    url_prefix: String,
}

impl DocumentStore {
    /// Create a store over `root` with the default extensions.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            options: TreeOptions::default(),
            url_prefix: nav::DEFAULT_URL_PREFIX.to_string(),
        }
    }

    /// Create a store from a configuration provider.
    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Ok(Self::new(config.content_root()?)
            .with_extensions(config.document_extensions())
            .with_url_prefix(config.document_url_prefix()))
    }

    /// Set the recognised document extensions.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = self.options.with_extensions(extensions);
        self
    }

    /// Set the prefix used for document links in navigation.
    pub fn with_url_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.url_prefix = prefix.into();
        self
    }

    /// The configured content root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Build the document tree (empty if the root is unavailable).
    pub async fn tree(&self) -> Vec<ContentNode> {
        tree::build_tree_with(&self.root, &self.options).await
    }

    /// Build the sidebar navigation, never empty.
    pub async fn navigation(&self) -> Vec<NavItem> {
        let nodes = self.tree().await;
        nav::nav_or_fallback(Ok::<_, Error>(nodes), &self.url_prefix)
    }

    /// Resolve a request path to a canonical file path under the root.
    ///
    /// Only documents the tree would list are served: hidden segments and
    /// files without a document extension are reported as missing.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidPath`] for empty paths or paths with `..`
    /// - [`Error::NotFound`] if nothing matches, the match is a directory,
    ///   is hidden or not a document, or resolves outside the root
    /// - [`Error::IoWithPath`] if the root exists but cannot be read
    pub async fn resolve(&self, relative_path: &str) -> Result<PathBuf> {
        let relative = sanitize_relative(relative_path)?;
        if relative
            .components()
            .any(|c| c.as_os_str().to_string_lossy().starts_with('.'))
        {
            log::debug!("refusing hidden path '{relative_path}'");
            return Err(Error::not_found(relative_path.to_string()));
        }

        let root = match canonicalize(&self.root).await {
            Ok(root) => root,
            Err(e) if e.is_not_found() => {
                return Err(Error::not_found("content root unavailable"));
            }
            Err(e) => return Err(e),
        };

        for candidate in self.candidates(&relative) {
            let path = root.join(&candidate);
            if !is_file(&path).await {
                continue;
            }
            let canonical = canonicalize(&path).await?;
            if !is_within(&root, &canonical) {
                log::warn!("'{relative_path}' resolves outside the content root");
                break;
            }
            return Ok(canonical);
        }

        Err(Error::not_found(relative_path.to_string()))
    }

    /// The path itself when it carries a document extension, otherwise
    /// `path.<ext>` for each extension in order.
    fn candidates(&self, relative: &Path) -> Vec<PathBuf> {
        if has_extension(relative, &self.options.extensions) {
            return vec![relative.to_path_buf()];
        }
        self.options
            .extensions
            .iter()
            .map(|ext| {
                let mut name = relative.as_os_str().to_os_string();
                name.push(".");
                name.push(ext);
                PathBuf::from(name)
            })
            .collect()
    }

    /// Raw text of a document.
    ///
    /// # Errors
    ///
    /// As [`resolve`](Self::resolve), plus I/O errors when reading.
    pub async fn get_content(&self, relative_path: &str) -> Result<String> {
        let path = self.resolve(relative_path).await?;
        log::debug!("reading {}", path.display());
        read_file(&path).await
    }

    /// Frontmatter of a document; malformed frontmatter yields an empty
    /// record rather than an error.
    pub async fn get_metadata(&self, relative_path: &str) -> Result<PostMetadata> {
        let text = self.get_content(relative_path).await?;
        Ok(frontmatter::parse(&text))
    }
}
