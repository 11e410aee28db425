//! Every route driven in-process through the router.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode, header};
use folio_content::DocumentStore;
use folio_meta::{FetchResponse, LinkPreviewer, StaticFetcher, VideoResolver};
use folio_server::{AppState, router};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;
use url::Url;

const VIEW: &str = "https://api.bilibili.com/x/web-interface/view";

fn content() -> TempDir {
    let temp = TempDir::new().unwrap();
    let files = [
        ("index.md", "# Home"),
        (
            "blog/first post.md",
            "---\ntitle: First\nsummary: \"Hello, world\"\ndate: 2024-05-01\n---\nBody",
        ),
        ("guides/setup.mdx", "setup body"),
    ];
    for (rel, body) in files {
        let path = temp.path().join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, body).unwrap();
    }
    temp
}

fn fetcher() -> StaticFetcher {
    let moved = Url::parse("https://www.page.test/").unwrap();
    StaticFetcher::new()
        .with_response(
            "https://page.test/",
            FetchResponse::ok(
                moved,
                "text/html",
                r#"<title>Page</title><meta name="description" content="A page">"#,
            ),
        )
        .with_failure("https://down.test/", "connection refused")
        .with_json(
            &format!("{VIEW}?bvid=BVok"),
            r#"{"code":0,"data":{"pic":"https://i.test/c.jpg","duration":90,
                "pages":[{"duration":30},{"duration":60}]}}"#,
        )
        .with_json(
            &format!("{VIEW}?bvid=BVgone"),
            r#"{"code":-404,"message":"not found","data":null}"#,
        )
        .with_failure(&format!("{VIEW}?bvid=BVreset"), "connection reset")
}

fn app(root: &std::path::Path, fetcher: StaticFetcher) -> Router {
    let fetcher = Arc::new(fetcher);
    let state = AppState::new(
        DocumentStore::new(root),
        LinkPreviewer::new(fetcher.clone()),
        VideoResolver::new(fetcher),
    );
    router(state)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, HeaderMap, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, headers, body)
}

#[tokio::test]
async fn health() {
    let temp = content();
    let (status, _, body) = get(&app(temp.path(), fetcher()), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "healthy", "service": "folio"}));
}

#[tokio::test]
async fn tree_lists_content() {
    let temp = content();
    let (status, _, body) = get(&app(temp.path(), fetcher()), "/api/tree").await;
    assert_eq!(status, StatusCode::OK);

    let nav = body["navMain"].as_array().unwrap();
    let titles: Vec<&str> = nav.iter().map(|i| i["title"].as_str().unwrap()).collect();
    assert_eq!(titles, vec!["blog", "guides", "index"]);
    assert_eq!(nav[0]["icon"], "FolderOpen");
    assert_eq!(nav[0]["isActive"], true);
    assert_eq!(nav[0]["items"][0]["url"], "/docs/blog/first%20post.md");
    assert_eq!(nav[2]["icon"], "FileText");
    assert_eq!(nav[2]["url"], "/docs/index.md");
}

#[tokio::test]
async fn tree_falls_back_when_root_missing() {
    let temp = TempDir::new().unwrap();
    let app = app(&temp.path().join("absent"), fetcher());
    let (status, _, body) = get(&app, "/api/tree").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["navMain"][0]["title"], "Documentation");
    assert_eq!(body["navMain"][0]["icon"], "BookOpen");
}

#[tokio::test]
async fn docs_statuses() {
    let temp = content();
    let app = app(temp.path(), fetcher());

    let (status, _, body) = get(&app, "/api/docs?path=index.md").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"content": "# Home"}));

    let (status, _, body) = get(&app, "/api/docs?path=guides/setup").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"], "setup body");

    let (status, _, body) = get(&app, "/api/docs").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("path"));

    let (status, _, _) = get(&app, "/api/docs?path=../secret.md").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, body) = get(&app, "/api/docs?path=nope.md").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn docs_hidden_and_non_documents_are_404() {
    let temp = content();
    std::fs::write(temp.path().join(".env"), "SECRET=1").unwrap();
    std::fs::write(temp.path().join("blog/notes.txt"), "plain").unwrap();
    let app = app(temp.path(), fetcher());

    for uri in [
        "/api/docs?path=.env",
        "/api/docs?path=blog%2Fnotes.txt",
        "/api/metadata?path=.env",
    ] {
        let (status, _, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert!(!body.to_string().contains("SECRET"));
    }
}

#[tokio::test]
async fn undecodable_document_is_500() {
    let temp = content();
    std::fs::write(temp.path().join("broken.md"), [0xff, 0xfe]).unwrap();
    let app = app(temp.path(), fetcher());

    let (status, _, body) = get(&app, "/api/docs?path=broken.md").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());

    let (status, _, body) = get(&app, "/api/metadata?path=broken").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn metadata_statuses() {
    let temp = content();
    let app = app(temp.path(), fetcher());

    let (status, _, body) = get(&app, "/api/metadata?path=blog%2Ffirst%20post.md").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"title": "First", "summary": "Hello, world", "date": "2024-05-01"})
    );

    let (status, _, body) = get(&app, "/api/metadata?path=index.md").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({}));

    let (status, _, _) = get(&app, "/api/metadata?path=").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, _) = get(&app, "/api/metadata?path=blog%2Fmissing.md").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn link_meta_statuses() {
    let temp = content();
    let app = app(temp.path(), fetcher());

    let (status, _, body) = get(&app, "/api/link-meta?url=https%3A%2F%2Fpage.test%2F").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "title": "Page",
            "description": "A page",
            "icon": "https://www.page.test/favicon.ico"
        })
    );

    let (status, _, body) = get(&app, "/api/link-meta?url=https%3A%2F%2Fdown.test%2F").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "title": "down.test",
            "description": "",
            "icon": "https://down.test/favicon.ico"
        })
    );

    let (status, _, _) = get(&app, "/api/link-meta").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, body) = get(&app, "/api/link-meta?url=not%20a%20url").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn video_meta_statuses() {
    let temp = content();
    let app = app(temp.path(), fetcher());

    let (status, headers, body) = get(&app, "/api/video-meta?bvid=BVok&page=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"pic": "https://i.test/c.jpg", "duration": 60}));
    assert_eq!(headers[header::CACHE_CONTROL], "public, max-age=3600");

    let (status, _, body) = get(&app, "/api/video-meta?bvid=BVok&page=abc").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["duration"], 30);

    let (status, _, _) = get(&app, "/api/video-meta").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, body) = get(&app, "/api/video-meta?bvid=BVgone").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().contains("not found"));

    let (status, _, _) = get(&app, "/api/video-meta?bvid=BVreset").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn unknown_route_is_404() {
    let temp = content();
    let (status, _, _) = get(&app(temp.path(), fetcher()), "/api/nothing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
