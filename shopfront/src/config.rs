//! Application configuration

use std::time::Duration;

/// Runtime configuration, read from the environment (`.env` is loaded by
/// `main` before this runs).
#[derive(Debug, Clone)]
pub struct Config {
    /// Order API base URL
    pub api_url: String,
    /// CDN base URL for product images
    pub cdn_url: String,
    /// HTTP request timeout
    pub request_timeout: Duration,
    /// Optional directory for rolling log files
    pub log_dir: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            api_url: std::env::var("SHOP_API_URL")
                .unwrap_or_else(|_| "http://localhost:3000/api".into()),
            cdn_url: std::env::var("SHOP_CDN_URL")
                .unwrap_or_else(|_| "http://localhost:3000/content".into()),
            request_timeout: Duration::from_secs(
                std::env::var("SHOP_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(30),
            ),
            log_dir: std::env::var("SHOP_LOG_DIR").ok(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_env() {
        // Env vars are process-global; only assert the fallback shape here.
        let config = Config::from_env();
        assert!(!config.api_url.is_empty());
        assert!(config.request_timeout >= Duration::from_secs(1));
    }
}
