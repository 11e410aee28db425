//! Configuration for the Folio CLI and server.
//!
//! Provides the [`FolioConfig`] struct that loads from TOML files,
//! environment variables, and defaults using the `confyg` crate.
//!
//! # Loading Priority
//!
//! 1. Explicit `--config <path>` flag
//! 2. `FOLIO_CONFIG` environment variable
//! 3. XDG default: `~/.config/folio/config.toml`
//! 4. Built-in defaults
//!
//! `FOLIO_<SECTION>_<KEY>` environment variables are layered on top of
//! whichever file is used.

use std::path::PathBuf;
use std::time::Duration;

use confyg::{Confygery, env};
use folio_core::traits::{ConfigProvider, DEFAULT_EXTENSIONS};
use folio_core::util::paths::expand_tilde;
use folio_core::{Error, Result};
use folio_meta::FetchOptions;
use serde::{Deserialize, Serialize};

// ============================================================================
// Configuration structs
// ============================================================================

/// Main configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FolioConfig {
    /// Project name, used in log output and the health response.
    pub project_name: String,

    /// Content root settings.
    pub content: ContentConfig,

    /// HTTP listener settings.
    pub server: ServerConfig,

    /// Outbound request settings.
    pub fetch: FetchConfig,

    /// Video metadata settings.
    pub video: VideoConfig,
}

/// Content root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Directory holding the documents; `~` is expanded.
    pub root: String,

    /// Recognised document extensions, without the dot.
    pub extensions: Vec<String>,

    /// Prefix of document links in the navigation.
    pub url_prefix: String,
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Port to listen on.
    pub port: u16,

    /// Host address to bind to.
    pub host: String,
}

/// Outbound HTTP configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// `User-Agent` sent with link preview and video requests.
    pub user_agent: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

/// Video metadata configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    /// Base URL of the video API.
    pub api_base: String,

    /// How long successful lookups are cached, in seconds.
    pub cache_ttl_secs: u64,
}

// ============================================================================
// Default implementations
// ============================================================================

impl Default for FolioConfig {
    fn default() -> Self {
        Self {
            project_name: "folio".to_string(),
            content: ContentConfig::default(),
            server: ServerConfig::default(),
            fetch: FetchConfig::default(),
            video: VideoConfig::default(),
        }
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            root: "content".to_string(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| (*e).to_string()).collect(),
            url_prefix: folio_content::nav::DEFAULT_URL_PREFIX.to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "127.0.0.1".to_string(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: folio_meta::fetch::DEFAULT_USER_AGENT.to_string(),
            timeout_secs: folio_meta::fetch::DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            api_base: folio_meta::video::DEFAULT_API_BASE.to_string(),
            cache_ttl_secs: folio_meta::video::DEFAULT_CACHE_TTL.as_secs(),
        }
    }
}

// ============================================================================
// Config loading
// ============================================================================

impl FolioConfig {
    /// Load configuration from file, environment, and defaults.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder =
            Confygery::new().map_err(|e| Error::config(format!("config init: {e}")))?;

        if let Some(path) = Self::resolve_config_path(config_path)
            && path.exists()
        {
            builder
                .add_file(&path.to_string_lossy())
                .map_err(|e| Error::config(format!("config file: {e}")))?;
        }

        let mut env_opts = env::Options::with_top_level("FOLIO");
        env_opts.add_section("content");
        env_opts.add_section("server");
        env_opts.add_section("fetch");
        env_opts.add_section("video");
        builder
            .add_env(env_opts)
            .map_err(|e| Error::config(format!("config env: {e}")))?;

        let config: Self = builder
            .build()
            .map_err(|e| Error::config(format!("config build: {e}")))?;

        Ok(config)
    }

    /// Resolve the config file path from explicit flag, env var, or XDG default.
    pub fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(PathBuf::from(path));
        }

        if let Ok(path) = std::env::var("FOLIO_CONFIG") {
            return Some(PathBuf::from(path));
        }

        Self::default_config_path()
    }

    /// Return the XDG default config path.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("folio").join("config.toml"))
    }

    /// Outbound request settings for the HTTP fetcher.
    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            user_agent: self.fetch.user_agent.clone(),
            timeout: Duration::from_secs(self.fetch.timeout_secs),
        }
    }

    /// Lifetime of cached video lookups.
    pub fn video_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.video.cache_ttl_secs)
    }

    /// Serialize this config to a pretty-printed TOML string.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Flatten this config into environment variable pairs with `FOLIO_` prefix.
    pub fn to_env_vars(&self) -> Result<Vec<(String, String)>> {
        let value: toml::Value =
            toml::Value::try_from(self).map_err(|e| Error::config(e.to_string()))?;
        let mut vars = Vec::new();
        flatten_toml_value(&value, "FOLIO", &mut vars);
        Ok(vars)
    }
}

// ============================================================================
// ConfigProvider implementation
// ============================================================================

impl ConfigProvider for FolioConfig {
    fn project_name(&self) -> &str {
        &self.project_name
    }

    fn content_root(&self) -> Result<PathBuf> {
        if self.content.root.trim().is_empty() {
            return Err(Error::config("content.root is empty"));
        }
        Ok(expand_tilde(&self.content.root))
    }

    fn document_extensions(&self) -> Vec<String> {
        self.content.extensions.clone()
    }

    fn document_url_prefix(&self) -> &str {
        &self.content.url_prefix
    }
}

// ============================================================================
// Helper: flatten TOML to env vars
// ============================================================================

fn flatten_toml_value(value: &toml::Value, prefix: &str, out: &mut Vec<(String, String)>) {
    match value {
        toml::Value::Table(table) => {
            for (key, val) in table {
                let env_key = format!("{}_{}", prefix, key.to_uppercase());
                flatten_toml_value(val, &env_key, out);
            }
        }
        toml::Value::Array(arr) => {
            if let Ok(json) = serde_json::to_string(arr) {
                out.push((prefix.to_string(), json));
            }
        }
        toml::Value::String(s) => out.push((prefix.to_string(), s.clone())),
        toml::Value::Integer(i) => out.push((prefix.to_string(), i.to_string())),
        toml::Value::Float(f) => out.push((prefix.to_string(), f.to_string())),
        toml::Value::Boolean(b) => out.push((prefix.to_string(), b.to_string())),
        toml::Value::Datetime(dt) => out.push((prefix.to_string(), dt.to_string())),
    }
}

// ============================================================================
// Tests
// ============================================================================
