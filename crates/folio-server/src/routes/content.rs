//! Navigation, document and frontmatter endpoints.

use axum::extract::{Query, State};
use axum::{Json, Router, routing::get};
use folio_content::{NavModel, PostMetadata};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::ApiError;
use crate::state::AppState;

pub fn content_routes() -> Router<AppState> {
    Router::new()
        .route("/api/tree", get(get_tree))
        .route("/api/docs", get(get_doc))
        .route("/api/metadata", get(get_metadata))
}

#[derive(Debug, Deserialize)]
struct PathQuery {
    path: Option<String>,
}

impl PathQuery {
    fn required(self) -> Result<String, ApiError> {
        self.path
            .filter(|p| !p.trim().is_empty())
            .ok_or(ApiError::MissingParam("path"))
    }
}

async fn get_tree(State(state): State<AppState>) -> Json<NavModel> {
    Json(NavModel {
        nav_main: state.docs.navigation().await,
    })
}

async fn get_doc(
    State(state): State<AppState>,
    Query(query): Query<PathQuery>,
) -> Result<Json<Value>, ApiError> {
    let path = query.required()?;
    let content = state.docs.get_content(&path).await?;
    Ok(Json(json!({ "content": content })))
}

async fn get_metadata(
    State(state): State<AppState>,
    Query(query): Query<PathQuery>,
) -> Result<Json<PostMetadata>, ApiError> {
    let path = query.required()?;
    Ok(Json(state.docs.get_metadata(&path).await?))
}
