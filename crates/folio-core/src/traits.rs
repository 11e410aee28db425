//! Core traits for Folio.
//!
//! The primary trait is [`ConfigProvider`], which abstracts where content
//! lives so the content layer does not depend on a concrete config format.

use std::path::PathBuf;

use crate::Result;

/// Default document extensions, without the leading dot.
pub const DEFAULT_EXTENSIONS: &[&str] = &["md", "mdx"];

/// Trait for site configuration.
///
/// # Bounds
///
/// - `Send + Sync`: Configuration must be shareable across threads
/// - `Clone`: Configuration can be duplicated for passing to subsystems
/// - `'static`: Configuration lifetime is not borrowed
///
/// # Example
///
/// ```
/// use std::path::PathBuf;
/// use folio_core::traits::ConfigProvider;
/// use folio_core::Result;
///
/// #[derive(Clone)]
/// struct BlogConfig {
///     docs: PathBuf,
/// }
///
/// impl ConfigProvider for BlogConfig {
///     fn project_name(&self) -> &str {
///         "blog"
///     }
///
///     fn content_root(&self) -> Result<PathBuf> {
///         Ok(self.docs.clone())
///     }
/// }
///
/// let config = BlogConfig { docs: PathBuf::from("/srv/docs") };
/// assert_eq!(config.document_extensions(), vec!["md", "mdx"]);
/// ```
pub trait ConfigProvider: Send + Sync + Clone + 'static {
    /// The project name, used for env var prefixes and log output.
    fn project_name(&self) -> &str;

    /// Root directory under which all indexable documents live.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be determined.
    fn content_root(&self) -> Result<PathBuf>;

    /// File extensions (without dot) that count as renderable documents.
    fn document_extensions(&self) -> Vec<String> {
        DEFAULT_EXTENSIONS.iter().map(|e| (*e).to_string()).collect()
    }

    /// URL prefix for document links in the navigation model.
    fn document_url_prefix(&self) -> &str {
        "/docs"
    }
}
