//! End-to-end checks over a realistic content directory.

use std::path::Path;

use folio_content::nav::{self, NavIcon};
use folio_content::{ContentNode, DocumentStore};
use tempfile::TempDir;

fn site() -> TempDir {
    let temp = TempDir::new().unwrap();
    let files = [
        ("index.md", "---\ntitle: Home\n---\nWelcome"),
        ("blog/2024-recap.md", "---\ntitle: \"2024: a recap\"\nsummary: Year in review\ndate: 2024-12-31\ncover: /covers/2024.png\n---\n"),
        ("blog/hello.mdx", "# no frontmatter"),
        ("blog/drafts/wip.md", "---\ntitle: WIP\n"),
        ("notes/Linux/shell.md", ""),
        ("assets/logo.svg", "<svg/>"),
    ];
    for (rel, body) in files {
        let path = temp.path().join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, body).unwrap();
    }
    temp
}

fn collect_paths(nodes: &[ContentNode], out: &mut Vec<String>) {
    for node in nodes {
        out.push(node.path.clone());
        collect_paths(&node.children, out);
    }
}

#[tokio::test]
async fn tree_paths_are_unique_and_inside_root() {
    let temp = site();
    let store = DocumentStore::new(temp.path());
    let tree = store.tree().await;

    let mut paths = Vec::new();
    collect_paths(&tree, &mut paths);
    let mut deduped = paths.clone();
    deduped.sort();
    deduped.dedup();
    assert_eq!(paths.len(), deduped.len());

    let root = temp.path().canonicalize().unwrap();
    for p in &paths {
        let full = root.join(p).canonicalize().unwrap();
        assert!(full.starts_with(&root), "{p} escaped the root");
        assert!(!Path::new(p).is_absolute());
    }
}

#[tokio::test]
async fn tree_shape_matches_sort_rule() {
    let temp = site();
    let tree = DocumentStore::new(temp.path()).tree().await;

    let top: Vec<&str> = tree.iter().map(|n| n.title.as_str()).collect();
    // "assets" holds no documents, so it is left out.
    assert_eq!(top, vec!["blog", "notes", "index"]);

    let blog: Vec<&str> = tree[0].children.iter().map(|n| n.title.as_str()).collect();
    assert_eq!(blog, vec!["drafts", "2024-recap", "hello"]);
}

#[tokio::test]
async fn navigation_projects_top_two_levels() {
    let temp = site();
    let nav = DocumentStore::new(temp.path()).navigation().await;

    assert_eq!(nav.len(), 3);
    for item in &nav {
        if item.icon == NavIcon::FolderOpen {
            assert_eq!(item.url, "#");
        }
    }
    assert_eq!(nav[2].url, "/docs/index.md");

    let blog_items = nav[0].items.as_ref().unwrap();
    assert_eq!(blog_items[0].url, "#");
    assert_eq!(blog_items[1].url, "/docs/blog/2024-recap.md");
}

#[tokio::test]
async fn navigation_falls_back_when_root_missing() {
    let temp = TempDir::new().unwrap();
    let store = DocumentStore::new(temp.path().join("missing"));
    let nav = store.navigation().await;
    assert!(!nav.is_empty());
    assert_eq!(nav, nav::fallback_nav());
}

#[tokio::test]
async fn metadata_round_trip_through_store() {
    let temp = site();
    let store = DocumentStore::new(temp.path());

    let meta = store.get_metadata("blog/2024-recap.md").await.unwrap();
    assert_eq!(meta.title.as_deref(), Some("2024: a recap"));
    assert_eq!(meta.summary.as_deref(), Some("Year in review"));
    assert_eq!(meta.cover.as_deref(), Some("/covers/2024.png"));

    assert!(store.get_metadata("blog/hello.mdx").await.unwrap().is_empty());
    assert!(store.get_metadata("blog/drafts/wip.md").await.unwrap().is_empty());
    assert!(store.get_metadata("blog/nope.md").await.unwrap_err().is_not_found());
}
