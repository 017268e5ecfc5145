use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::domain::entities::{Extent, FeedDefinition, SourceSpec};
use crate::error::ConfigError;

/// Process settings, read from the environment
#[derive(Debug, Clone)]
pub struct Config {
    pub address: String,
    /// Feed definitions file (TOML)
    pub feeds_config_path: PathBuf,
    /// Deadline for a whole feed aggregation
    pub request_timeout: Duration,
    /// Timeout for each outbound HTTP request
    pub upstream_timeout: Duration,
    /// Rendered feeds are replayed for this long. Zero disables caching.
    pub cache_ttl: Duration,
    /// Upper bound on cached feeds. Zero disables caching.
    pub cache_max_entries: usize,
    /// Maximum concurrent layer fetches per request
    pub fetch_concurrency: usize,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            address: env::var("APP_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8010".to_string()),
            feeds_config_path: env::var("APP_CONFIG_PATH")
                .unwrap_or_else(|_| "/mapfeed/feeds.toml".to_string())
                .into(),
            request_timeout: Duration::from_secs(env_or("APP_REQUEST_TIMEOUT_SECS", 30)),
            upstream_timeout: Duration::from_secs(env_or("APP_UPSTREAM_TIMEOUT_SECS", 10)),
            cache_ttl: Duration::from_secs(env_or("APP_CACHE_TTL_SECS", 60)),
            cache_max_entries: env_or("APP_CACHE_MAX_ENTRIES", 512usize),
            fetch_concurrency: env_or("APP_FETCH_CONCURRENCY", 4usize).max(1),
        }
    }
}

/// Where city bookmarks live in the project configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookmarkSettings {
    #[serde(default)]
    pub group: String,
    /// Used when `?city=` is given without a value
    #[serde(default)]
    pub default_city: String,
}

fn default_projection() -> String {
    "EPSG:3857".to_string()
}

/// Feed definitions and upstream endpoints, loaded from a TOML file
#[derive(Debug, Clone, Deserialize)]
pub struct FeedsConfig {
    /// Map client URL; channel link and prefix of feature links
    pub base_url: String,
    /// WFS endpoint. Required when any feed has a `wfs` source.
    #[serde(default)]
    pub ows_url: Option<Url>,
    /// Project-configuration document holding city bookmarks
    #[serde(default)]
    pub project_url: Option<Url>,
    #[serde(default = "default_projection")]
    pub default_projection: String,
    #[serde(default)]
    pub default_extent: Extent,
    #[serde(default)]
    pub bookmarks: BookmarkSettings,
    /// Reject malformed `bbox` parameters instead of falling back to the default extent
    #[serde(default)]
    pub strict_extent: bool,
    /// Request path -> feed
    #[serde(default)]
    pub paths: HashMap<String, FeedDefinition>,
}

impl FeedsConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: FeedsConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        Url::parse(&self.base_url)
            .map_err(|e| ConfigError::Invalid(format!("base_url: {}", e)))?;

        if !self.default_extent.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "default_extent must be four finite numbers, got {:?}",
                self.default_extent.as_array()
            )));
        }

        for (path, feed) in &self.paths {
            if !path.starts_with('/') {
                return Err(ConfigError::Invalid(format!(
                    "feed path {:?} must start with '/'",
                    path
                )));
            }
            feed.source
                .validate()
                .map_err(|e| ConfigError::Invalid(format!("feed {}: {}", path, e)))?;
            if matches!(feed.source, SourceSpec::Wfs(_)) && self.ows_url.is_none() {
                return Err(ConfigError::Invalid(format!(
                    "feed {} is a wfs source but ows_url is not set",
                    path
                )));
            }
        }

        Ok(())
    }

    pub fn feed(&self, path: &str) -> Option<&FeedDefinition> {
        self.paths.get(path)
    }

    /// Base URL without a trailing slash, for building item links
    pub fn base_link(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}
