//! Client configuration

use std::time::Duration;

/// Configuration for connecting to the order API.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL (e.g. "http://localhost:3000/api")
    pub base_url: String,

    /// CDN base URL prepended to the relative image paths the API returns
    pub cdn_url: String,

    /// Request timeout; elapsing maps to the submit-failure path
    pub timeout: Duration,
}

impl ClientConfig {
    /// Create a new configuration with the default CDN and timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            cdn_url: String::new(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Set the CDN base URL.
    pub fn with_cdn_url(mut self, cdn_url: impl Into<String>) -> Self {
        self.cdn_url = cdn_url.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Create an HTTP API client from this configuration.
    pub fn build(&self) -> super::HttpShopApi {
        super::HttpShopApi::new(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:3000/api")
    }
}
