//! Handlers for the content and metadata commands.

use std::fmt::Write as _;
use std::sync::Arc;

use folio_content::{ContentNode, DocumentStore};
use folio_core::{Error, Result};
use folio_meta::{Fetcher, HttpFetcher, LinkPreviewer, VideoResolver};
use folio_server::AppState;
use serde::Serialize;

use crate::config::FolioConfig;

/// Build the shared handler state from configuration.
pub fn build_state(config: &FolioConfig) -> Result<AppState> {
    let fetcher: Arc<dyn Fetcher> = Arc::new(
        HttpFetcher::new(&config.fetch_options()).map_err(|e| Error::config(e.to_string()))?,
    );
    let docs = DocumentStore::from_config(config)?;
    let links = LinkPreviewer::new(fetcher.clone());
    let videos = VideoResolver::new(fetcher)
        .with_api_base(config.video.api_base.clone())
        .with_cache_ttl(config.video_cache_ttl());
    Ok(AppState::new(docs, links, videos))
}

/// `folio serve`
pub async fn serve(config: &FolioConfig, host: Option<String>, port: Option<u16>) -> Result<()> {
    let state = build_state(config)?;
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);
    tracing::info!(
        project = %config.project_name,
        root = %state.docs.root().display(),
        "serving content"
    );
    folio_server::start_server(&host, port, state).await
}

/// `folio tree`
pub async fn tree(store: &DocumentStore, json: bool) -> Result<String> {
    let nodes = store.tree().await;
    if json {
        return to_json(&nodes);
    }
    let mut out = String::new();
    render_outline(&nodes, 0, &mut out);
    Ok(out)
}

/// `folio doc`
pub async fn doc(store: &DocumentStore, path: &str, meta: bool) -> Result<String> {
    if meta {
        to_json(&store.get_metadata(path).await?)
    } else {
        store.get_content(path).await
    }
}

/// `folio meta`
pub async fn link_meta(links: &LinkPreviewer, url: &str) -> Result<String> {
    let meta = links
        .resolve(url)
        .await
        .map_err(|e| Error::invalid_data(e.to_string()))?;
    to_json(&meta)
}

/// `folio video`
pub async fn video_meta(videos: &VideoResolver, bvid: &str, page: Option<i64>) -> Result<String> {
    let meta = videos
        .resolve(Some(bvid), page)
        .await
        .map_err(|e| Error::invalid_data(e.to_string()))?;
    to_json(&meta)
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| Error::invalid_data(e.to_string()))
}

fn render_outline(nodes: &[ContentNode], depth: usize, out: &mut String) {
    for node in nodes {
        let suffix = if node.is_folder() { "/" } else { "" };
        let _ = writeln!(out, "{}{}{}", "  ".repeat(depth), node.title, suffix);
        render_outline(&node.children, depth + 1, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_meta::StaticFetcher;
    use tempfile::TempDir;

    fn content() -> TempDir {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("guides")).unwrap();
        std::fs::write(temp.path().join("guides/setup.md"), "---\ntitle: Setup\n---\nSteps").unwrap();
        std::fs::write(temp.path().join("about.md"), "About").unwrap();
        temp
    }

    #[tokio::test]
    async fn test_tree_outline() {
        let temp = content();
        let store = DocumentStore::new(temp.path());
        let outline = tree(&store, false).await.unwrap();
        assert_eq!(outline, "guides/\n  setup\nabout\n");
    }

    #[tokio::test]
    async fn test_tree_json() {
        let temp = content();
        let store = DocumentStore::new(temp.path());
        let json: serde_json::Value =
            serde_json::from_str(&tree(&store, true).await.unwrap()).unwrap();
        assert_eq!(json[0]["type"], "folder");
        assert_eq!(json[0]["children"][0]["path"], "guides/setup.md");
    }

    #[tokio::test]
    async fn test_doc_text_and_meta() {
        let temp = content();
        let store = DocumentStore::new(temp.path());
        assert_eq!(doc(&store, "about", false).await.unwrap(), "About");

        let meta: serde_json::Value =
            serde_json::from_str(&doc(&store, "guides/setup", true).await.unwrap()).unwrap();
        assert_eq!(meta, serde_json::json!({"title": "Setup"}));

        assert!(doc(&store, "missing.md", false).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_link_meta_rejects_bad_url() {
        let links = LinkPreviewer::new(Arc::new(StaticFetcher::new()));
        assert!(link_meta(&links, "not a url").await.is_err());
    }

    #[tokio::test]
    async fn test_video_meta() {
        let fetcher = StaticFetcher::new().with_json(
            "https://api.bilibili.com/x/web-interface/view?bvid=BV1",
            r#"{"code":0,"data":{"pic":"p","duration":12}}"#,
        );
        let videos = VideoResolver::new(Arc::new(fetcher));
        let json: serde_json::Value =
            serde_json::from_str(&video_meta(&videos, "BV1", None).await.unwrap()).unwrap();
        assert_eq!(json, serde_json::json!({"pic": "p", "duration": 12}));
    }

    #[test]
    fn test_build_state_from_default_config() {
        let state = build_state(&FolioConfig::default()).unwrap();
        assert_eq!(state.docs.root(), std::path::Path::new("content"));
        assert_eq!(state.videos.cache_ttl().as_secs(), 3600);
    }
}
