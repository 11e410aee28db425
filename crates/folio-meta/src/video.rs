//! Video metadata from the Bilibili web API.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::cache::TtlCache;
use crate::error::VideoError;
use crate::fetch::Fetcher;

/// Default API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.bilibili.com";

/// Default lifetime of a cached lookup.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3600);

const VIEW_PATH: &str = "/x/web-interface/view";

/// Cover image and duration of a video part.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoMeta {
    /// Cover image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pic: Option<String>,
    /// Duration in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
    data: Option<ViewData>,
}

#[derive(Debug, Deserialize)]
struct ViewData {
    pic: Option<String>,
    duration: Option<u64>,
    #[serde(default)]
    pages: Vec<PageInfo>,
}

#[derive(Debug, Deserialize)]
struct PageInfo {
    duration: Option<u64>,
}

impl ViewData {
    fn into_meta(self, page: u32) -> VideoMeta {
        let part = usize::try_from(page - 1)
            .ok()
            .and_then(|i| self.pages.get(i))
            .and_then(|p| p.duration);
        VideoMeta {
            pic: self.pic,
            duration: part.or(self.duration),
        }
    }
}

/// Looks up video metadata, caching successes per `(id, page)`.
pub struct VideoResolver {
    fetcher: Arc<dyn Fetcher>,
    api_base: String,
    cache: TtlCache<(String, u32), VideoMeta>,
}

impl std::fmt::Debug for VideoResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoResolver")
            .field("api_base", &self.api_base)
            .field("cache_ttl", &self.cache.ttl())
            .finish_non_exhaustive()
    }
}

impl VideoResolver {
    /// Create a resolver against the public API with the default TTL.
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            fetcher,
            api_base: DEFAULT_API_BASE.to_string(),
            cache: TtlCache::new(DEFAULT_CACHE_TTL),
        }
    }

    /// Use a different API base (mirrors, tests).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Use a different cache lifetime. Clears the cache.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache = TtlCache::new(ttl);
        self
    }

    /// The cache lifetime, for `Cache-Control` headers.
    pub fn cache_ttl(&self) -> Duration {
        self.cache.ttl()
    }

    /// Default a page number to 1 and clamp it to at least 1.
    pub fn clamp_page(page: Option<i64>) -> u32 {
        page.map_or(1, |p| u32::try_from(p.max(1)).unwrap_or(u32::MAX))
    }

    /// Resolve metadata for `bvid`, part `page` (1-based).
    ///
    /// # Errors
    ///
    /// - [`VideoError::MissingId`] if `bvid` is absent or blank
    /// - [`VideoError::Upstream`] if the API answers with a failure
    /// - [`VideoError::Unexpected`] on transport or decoding failures
    pub async fn resolve(
        &self,
        bvid: Option<&str>,
        page: Option<i64>,
    ) -> Result<VideoMeta, VideoError> {
        let bvid = bvid
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(VideoError::MissingId)?;
        let page = Self::clamp_page(page);
        let key = (bvid.to_string(), page);

        if let Some(hit) = self.cache.get(&key).await {
            tracing::debug!(bvid, page, "video cache hit");
            return Ok(hit);
        }

        let meta = self.lookup(bvid, page).await?;
        self.cache.insert(key, meta.clone()).await;
        Ok(meta)
    }

    async fn lookup(&self, bvid: &str, page: u32) -> Result<VideoMeta, VideoError> {
        let endpoint = format!("{}{VIEW_PATH}", self.api_base.trim_end_matches('/'));
        let mut url = Url::parse(&endpoint)
            .map_err(|e| VideoError::unexpected(format!("bad api base '{}': {e}", self.api_base)))?;
        url.query_pairs_mut().append_pair("bvid", bvid);

        let response = self
            .fetcher
            .get(&url)
            .await
            .map_err(|e| VideoError::unexpected(e.to_string()))?;

        if !response.is_success() {
            tracing::warn!(bvid, status = response.status, "video api returned an error status");
            return Err(VideoError::upstream(response.status, "video api request failed"));
        }

        let envelope: Envelope = serde_json::from_str(&response.body)
            .map_err(|e| VideoError::unexpected(format!("unreadable video api response: {e}")))?;

        if envelope.code != 0 {
            tracing::warn!(bvid, code = envelope.code, "video api rejected the lookup");
            return Err(VideoError::upstream(response.status, envelope.message));
        }

        let data = envelope
            .data
            .ok_or_else(|| VideoError::unexpected("video api response has no data"))?;
        Ok(data.into_meta(page))
    }
}
