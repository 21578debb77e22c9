//! HTML source configuration.

use std::time::Duration;
use url::Url;

/// Configuration for scraping the meeting listing page.
#[derive(Debug, Clone)]
pub struct HtmlConfig {
    /// Listing page URL.
    pub url: Url,

    /// Request timeout.
    pub timeout: Duration,

    /// User agent string.
    pub user_agent: String,
}

impl HtmlConfig {
    /// Listing page used when none is configured.
    pub const DEFAULT_URL: &'static str = "https://www.na.org.br/virtual/";

    /// Default timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

    /// Creates a configuration for the given page.
    ///
    /// # Errors
    ///
    /// Returns an error if `url` is not a valid URL.
    pub fn new(url: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            url: Url::parse(url.trim())?,
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            user_agent: format!("nowmeeting/{}", env!("CARGO_PKG_VERSION")),
        })
    }

    /// Creates a configuration for [`Self::DEFAULT_URL`].
    pub fn with_default_url() -> Result<Self, url::ParseError> {
        Self::new(Self::DEFAULT_URL)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}
