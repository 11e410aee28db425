//! Link previews for arbitrary web pages.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::error::MetaError;
use crate::fetch::{FetchResponse, Fetcher};
use crate::head::{self, FAVICON_PATH};

/// Normalised head metadata of an external resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalMeta {
    /// Page title, or the hostname when the page has none.
    pub title: String,
    /// Page description, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Absolute icon URL.
    pub icon: String,
}

impl ExternalMeta {
    /// The degraded result used when `url` could not be fetched.
    pub fn unreachable(url: &Url) -> Self {
        Self {
            title: hostname(url),
            description: Some(String::new()),
            icon: favicon(url),
        }
    }
}

/// Resolves [`ExternalMeta`] for a URL.
///
/// Only a malformed input is an error; everything past that degrades to a
/// partial result so a card can always be rendered.
#[derive(Clone)]
pub struct LinkPreviewer {
    fetcher: Arc<dyn Fetcher>,
}

impl std::fmt::Debug for LinkPreviewer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkPreviewer").finish_non_exhaustive()
    }
}

impl LinkPreviewer {
    /// Create a previewer over `fetcher`.
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self { fetcher }
    }

    /// Resolve the preview for `url`.
    ///
    /// # Errors
    ///
    /// [`MetaError::InvalidUrl`] if `url` is not an absolute http(s) URL.
    pub async fn resolve(&self, url: &str) -> Result<ExternalMeta, MetaError> {
        let target = parse_target(url)?;

        match self.fetcher.get(&target).await {
            Ok(response) => {
                if !response.is_success() {
                    tracing::debug!(%url, status = response.status, "parsing non-2xx page");
                }
                Ok(from_response(&response))
            }
            Err(e) => {
                tracing::warn!(%url, error = %e, "link preview fetch failed");
                Ok(ExternalMeta::unreachable(&target))
            }
        }
    }
}

fn parse_target(input: &str) -> Result<Url, MetaError> {
    let invalid = |reason: String| MetaError::InvalidUrl {
        input: input.to_string(),
        reason,
    };
    let url = Url::parse(input.trim()).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Ok(url),
        "http" | "https" => Err(invalid("missing host".to_string())),
        other => Err(invalid(format!("unsupported scheme '{other}'"))),
    }
}

fn from_response(response: &FetchResponse) -> ExternalMeta {
    let base = &response.final_url;
    if response.is_json() {
        let parsed: Value = serde_json::from_str(&response.body).unwrap_or(Value::Null);
        return ExternalMeta {
            title: json_string(&parsed, "title").unwrap_or_else(|| hostname(base)),
            description: json_string(&parsed, "description"),
            icon: favicon(base),
        };
    }

    let fields = head::extract(&response.body);
    ExternalMeta {
        title: fields.title.unwrap_or_else(|| hostname(base)),
        description: fields.description,
        icon: base
            .join(&fields.icon_href)
            .map(String::from)
            .unwrap_or_else(|_| favicon(base)),
    }
}

/// A string field of a JSON object; anything else counts as missing.
fn json_string(value: &Value, field: &str) -> Option<String> {
    value.get(field).and_then(Value::as_str).map(str::to_string)
}

fn hostname(url: &Url) -> String {
    url.host_str().unwrap_or_default().to_string()
}

fn favicon(url: &Url) -> String {
    url.join(FAVICON_PATH)
        .map(String::from)
        .unwrap_or_else(|_| FAVICON_PATH.to_string())
}
