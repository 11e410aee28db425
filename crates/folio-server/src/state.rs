//! Shared handler state.

use std::sync::Arc;

use folio_content::DocumentStore;
use folio_meta::{Fetcher, LinkPreviewer, VideoResolver};

/// Everything the handlers need, cheap to clone per request.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Documents under the content root.
    pub docs: Arc<DocumentStore>,
    /// External link previews.
    pub links: Arc<LinkPreviewer>,
    /// Video metadata with its cache.
    pub videos: Arc<VideoResolver>,
}

impl AppState {
    /// Assemble state from its parts.
    pub fn new(docs: DocumentStore, links: LinkPreviewer, videos: VideoResolver) -> Self {
        Self {
            docs: Arc::new(docs),
            links: Arc::new(links),
            videos: Arc::new(videos),
        }
    }

    /// State whose resolvers share one fetcher and use their defaults.
    pub fn with_fetcher(docs: DocumentStore, fetcher: Arc<dyn Fetcher>) -> Self {
        Self::new(
            docs,
            LinkPreviewer::new(fetcher.clone()),
            VideoResolver::new(fetcher),
        )
    }
}
