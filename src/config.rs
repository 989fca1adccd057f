//! Client configuration.
//!
//! Configuration is an explicit struct injected into the backend
//! collaborator at construction; nothing in the crate reads the process
//! environment at call sites. [`ClientConfig::from_env`] exists as a
//! startup convenience only.

use std::time::Duration;

/// Settings for the HTTP backend collaborator.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the backend API, e.g. `https://api.example.school`.
    pub base_url: String,
    /// Whole-request timeout applied by the HTTP client.
    pub request_timeout: Duration,
    /// Page size used by list controllers when the screen does not pick one.
    pub default_page_size: u32,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
}

impl ClientConfig {
    /// Creates a configuration with defaults for everything but the base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            request_timeout: Duration::from_secs(30),
            default_page_size: 10,
            user_agent: concat!("satchel/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Reads the configuration from environment variables, falling back to
    /// defaults. Intended for application startup, not for ambient lookup.
    ///
    /// - `API_BASE_URL` (default `http://localhost:3000`)
    /// - `API_REQUEST_TIMEOUT_SECS` (default `30`)
    /// - `API_DEFAULT_PAGE_SIZE` (default `10`)
    #[must_use]
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
        let mut config = Self::new(base_url);

        if let Ok(secs) = std::env::var("API_REQUEST_TIMEOUT_SECS")
            && let Ok(secs) = secs.parse::<u64>()
        {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Ok(size) = std::env::var("API_DEFAULT_PAGE_SIZE")
            && let Ok(size) = size.parse::<u32>()
        {
            config.default_page_size = size;
        }

        config
    }
}
