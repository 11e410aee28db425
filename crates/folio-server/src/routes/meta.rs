//! External link and video metadata endpoints.

use axum::extract::{Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::{Json, Router, routing::get};
use folio_meta::ExternalMeta;
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;

pub fn meta_routes() -> Router<AppState> {
    Router::new()
        .route("/api/link-meta", get(link_meta))
        .route("/api/video-meta", get(video_meta))
}

#[derive(Debug, Deserialize)]
struct LinkQuery {
    url: Option<String>,
}

async fn link_meta(
    State(state): State<AppState>,
    Query(query): Query<LinkQuery>,
) -> Result<Json<ExternalMeta>, ApiError> {
    let url = query
        .url
        .filter(|u| !u.trim().is_empty())
        .ok_or(ApiError::MissingParam("url"))?;
    Ok(Json(state.links.resolve(&url).await?))
}

#[derive(Debug, Deserialize)]
struct VideoQuery {
    bvid: Option<String>,
    // Kept as text so a non-numeric page falls back to the default.
    page: Option<String>,
}

async fn video_meta(
    State(state): State<AppState>,
    Query(query): Query<VideoQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = query.page.as_deref().and_then(|p| p.trim().parse::<i64>().ok());
    let meta = state.videos.resolve(query.bvid.as_deref(), page).await?;
    let cache_control = format!("public, max-age={}", state.videos.cache_ttl().as_secs());
    Ok(([(header::CACHE_CONTROL, cache_control)], Json(meta)))
}
