//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (LOOKOUT_*)
//! 2. TOML config file (if LOOKOUT_CONFIG_FILE set)
//! 3. Built-in defaults
//!
//! The four tool tunables (`page_size`, `safe_search`, `max_links`,
//! `content_limit`) each carry an "auto" sentinel. [`AppConfig::resolve`]
//! folds call-time overrides, stored values and built-in defaults into a
//! [`ResolvedConfig`] that never contains a sentinel.

use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Search results per page when neither the call nor the config specifies one.
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Links returned by a page visit when "auto" is configured.
pub const DEFAULT_MAX_LINKS: usize = 40;

/// Content characters returned by a page visit when "auto" is configured.
pub const DEFAULT_CONTENT_LIMIT: usize = 2000;

/// Safe search mode applied when "auto" is configured.
pub const DEFAULT_SAFE_SEARCH: SafeSearch = SafeSearch::Moderate;

/// Default search endpoint (DuckDuckGo's JavaScript-free results page).
pub const DEFAULT_SEARCH_URL: &str = "https://duckduckgo.com/html/";

/// Safe search mode sent to the search engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SafeSearch {
    Strict,
    Moderate,
    Off,
}

/// Stored safe search setting, which may defer to the built-in default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SafeSearchSetting {
    Strict,
    Moderate,
    Off,
    #[default]
    Auto,
}

impl SafeSearchSetting {
    /// The concrete mode, or `None` for auto.
    pub fn mode(self) -> Option<SafeSearch> {
        match self {
            SafeSearchSetting::Strict => Some(SafeSearch::Strict),
            SafeSearchSetting::Moderate => Some(SafeSearch::Moderate),
            SafeSearchSetting::Off => Some(SafeSearch::Off),
            SafeSearchSetting::Auto => None,
        }
    }
}

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (LOOKOUT_*)
/// 2. TOML config file (if LOOKOUT_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Search results per page, 1-10. `0` means auto.
    ///
    /// Set via LOOKOUT_PAGE_SIZE environment variable.
    #[serde(default)]
    pub page_size: u8,

    /// Safe search mode: strict, moderate, off or auto.
    ///
    /// Set via LOOKOUT_SAFE_SEARCH environment variable.
    #[serde(default)]
    pub safe_search: SafeSearchSetting,

    /// Links returned by a page visit, -1..=500. `0` excludes links, `-1` means auto.
    ///
    /// Set via LOOKOUT_MAX_LINKS environment variable.
    #[serde(default = "default_auto")]
    pub max_links: i32,

    /// Content characters returned by a page visit, -1..=50000.
    /// `0` excludes content, `-1` means auto.
    ///
    /// Set via LOOKOUT_CONTENT_LIMIT environment variable.
    #[serde(default = "default_auto")]
    pub content_limit: i32,

    /// Search endpoint.
    ///
    /// Set via LOOKOUT_SEARCH_URL environment variable.
    #[serde(default = "default_search_url")]
    pub search_url: String,

    /// Minimum delay between outbound search requests in milliseconds.
    ///
    /// Set via LOOKOUT_REQUEST_INTERVAL_MS environment variable.
    #[serde(default = "default_request_interval_ms")]
    pub request_interval_ms: u64,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via LOOKOUT_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum bytes to fetch per request.
    ///
    /// Set via LOOKOUT_MAX_BYTES environment variable.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// Maximum redirects followed per request.
    ///
    /// Set via LOOKOUT_MAX_REDIRECTS environment variable.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
}

fn default_auto() -> i32 {
    -1
}

fn default_search_url() -> String {
    DEFAULT_SEARCH_URL.into()
}

fn default_request_interval_ms() -> u64 {
    2_000
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_max_bytes() -> usize {
    5_242_880 // 5MB
}

fn default_max_redirects() -> usize {
    5
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            page_size: 0,
            safe_search: SafeSearchSetting::Auto,
            max_links: default_auto(),
            content_limit: default_auto(),
            search_url: default_search_url(),
            request_interval_ms: default_request_interval_ms(),
            timeout_ms: default_timeout_ms(),
            max_bytes: default_max_bytes(),
            max_redirects: default_max_redirects(),
        }
    }
}

/// Call-time overrides supplied with a single tool invocation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigOverrides {
    pub page_size: Option<u8>,
    pub safe_search: Option<SafeSearch>,
    pub max_links: Option<u32>,
    pub content_limit: Option<u32>,
}

/// Tunables with every "auto" sentinel replaced by a concrete value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub page_size: usize,
    pub safe_search: SafeSearch,
    /// `0` means links are excluded from the page visit.
    pub max_links: usize,
    /// `0` means content is excluded from the page visit.
    pub content_limit: usize,
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Search throttle interval as Duration.
    pub fn request_interval(&self) -> Duration {
        Duration::from_millis(self.request_interval_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `LOOKOUT_`
    /// 2. TOML file from `LOOKOUT_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("LOOKOUT_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("LOOKOUT_")
                .ignore(&["config_file"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Resolve the tool tunables for one invocation.
    ///
    /// Precedence: explicit call-time override, then the stored value unless it
    /// is the auto sentinel, then the built-in default.
    pub fn resolve(&self, overrides: &ConfigOverrides) -> ResolvedConfig {
        let stored_page_size = (self.page_size > 0).then_some(self.page_size as usize);
        let stored_max_links = usize::try_from(self.max_links).ok();
        let stored_content_limit = usize::try_from(self.content_limit).ok();

        ResolvedConfig {
            page_size: overrides
                .page_size
                .map(usize::from)
                .or(stored_page_size)
                .unwrap_or(DEFAULT_PAGE_SIZE),
            safe_search: overrides
                .safe_search
                .or(self.safe_search.mode())
                .unwrap_or(DEFAULT_SAFE_SEARCH),
            max_links: overrides
                .max_links
                .map(|n| n as usize)
                .or(stored_max_links)
                .unwrap_or(DEFAULT_MAX_LINKS),
            content_limit: overrides
                .content_limit
                .map(|n| n as usize)
                .or(stored_content_limit)
                .unwrap_or(DEFAULT_CONTENT_LIMIT),
        }
    }
}
