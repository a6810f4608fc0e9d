//! Configuration for the archive client

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Public OpenRS2 archive
pub const DEFAULT_ARCHIVE_URL: &str = "https://archive.openrs2.org";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// Archive base URL, without trailing slash
    pub base_url: String,

    /// Value of the `User-Agent` header
    pub user_agent: String,

    /// Connection timeout
    pub connect_timeout: Duration,

    /// Timeout for JSON requests; package downloads are not bounded
    pub request_timeout: Duration,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_ARCHIVE_URL.to_string(),
            user_agent: default_user_agent(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl ArchiveConfig {
    /// Configuration pointing at another archive host
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Create configuration from environment variables
    ///
    /// Missing or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("OSRS_CACHE_ARCHIVE_URL")
                .unwrap_or_else(|_| DEFAULT_ARCHIVE_URL.to_string()),
            user_agent: std::env::var("OSRS_CACHE_USER_AGENT")
                .unwrap_or_else(|_| default_user_agent()),
            connect_timeout: Duration::from_secs(
                std::env::var("OSRS_CACHE_CONNECT_TIMEOUT")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .unwrap_or(10),
            ),
            request_timeout: Duration::from_secs(
                std::env::var("OSRS_CACHE_REQUEST_TIMEOUT")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .unwrap_or(30),
            ),
        }
    }

    /// Base URL with any trailing slashes removed
    pub fn trimmed_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

fn default_user_agent() -> String {
    format!("osrs-cache-chooser/{}", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ArchiveConfig::default();
        assert_eq!(config.base_url, "https://archive.openrs2.org");
        assert!(config.user_agent.starts_with("osrs-cache-chooser/"));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let config = ArchiveConfig::with_base_url("http://localhost:8080//");
        assert_eq!(config.trimmed_base_url(), "http://localhost:8080");
    }
}
