//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `page_size` exceeds 10
    /// - `max_links` is outside -1..=500
    /// - `content_limit` is outside -1..=50000
    /// - `search_url` is not an absolute http(s) URL
    /// - `request_interval_ms` exceeds one minute
    /// - `max_bytes` is 0 or exceeds 50MB
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size > 10 {
            return Err(ConfigError::Invalid {
                field: "page_size".into(),
                reason: "must be between 1 and 10 (0 = auto)".into(),
            });
        }

        if !(-1..=500).contains(&self.max_links) {
            return Err(ConfigError::Invalid {
                field: "max_links".into(),
                reason: "must be between -1 (auto) and 500".into(),
            });
        }

        if !(-1..=50_000).contains(&self.content_limit) {
            return Err(ConfigError::Invalid {
                field: "content_limit".into(),
                reason: "must be between -1 (auto) and 50000".into(),
            });
        }

        match url::Url::parse(&self.search_url) {
            Ok(u) if u.scheme() == "http" || u.scheme() == "https" => {}
            _ => {
                return Err(ConfigError::Invalid {
                    field: "search_url".into(),
                    reason: "must be an absolute http(s) URL".into(),
                });
            }
        }

        if self.request_interval_ms > 60_000 {
            return Err(ConfigError::Invalid {
                field: "request_interval_ms".into(),
                reason: "must not exceed 1 minute (60000ms)".into(),
            });
        }

        if self.max_bytes == 0 {
            return Err(ConfigError::Invalid { field: "max_bytes".into(), reason: "must be greater than 0".into() });
        }
        if self.max_bytes > 50 * 1024 * 1024 {
            return Err(ConfigError::Invalid { field: "max_bytes".into(), reason: "must not exceed 50MB".into() });
        }

        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.max_links == 0 && self.content_limit == 0 {
            tracing::warn!("max_links and content_limit are both 0; page visits return only title and headings");
        }

        Ok(())
    }
}
