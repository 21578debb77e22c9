//! BMLT source configuration.

use std::time::Duration;
use url::Url;

/// Configuration for querying BMLT root servers.
#[derive(Debug, Clone)]
pub struct BmltConfig {
    /// Root servers, tried in order until one yields virtual meetings.
    pub roots: Vec<Url>,

    /// Request timeout.
    pub timeout: Duration,

    /// User agent string.
    pub user_agent: String,

    /// Retry a root once without certificate checks after a TLS failure.
    pub accept_invalid_certs_fallback: bool,
}

impl BmltConfig {
    /// Root servers used when none are configured.
    pub const DEFAULT_ROOTS: &'static [&'static str] = &[
        "https://bmlt.na.org.br/ativo/main_server",
        "https://bmlt.na.org.br/main_server",
    ];

    /// Default timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

    /// Creates a configuration for the given roots.
    ///
    /// # Errors
    ///
    /// Returns an error if a root is not a valid URL.
    pub fn new<I, S>(roots: I) -> Result<Self, url::ParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let roots = roots
            .into_iter()
            .map(|root| Url::parse(root.as_ref().trim()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            roots,
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            user_agent: format!("nowmeeting/{}", env!("CARGO_PKG_VERSION")),
            accept_invalid_certs_fallback: true,
        })
    }

    /// Creates a configuration for [`Self::DEFAULT_ROOTS`].
    pub fn with_default_roots() -> Result<Self, url::ParseError> {
        Self::new(Self::DEFAULT_ROOTS)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Never retry without certificate checks.
    pub fn with_strict_tls(mut self) -> Self {
        self.accept_invalid_certs_fallback = false;
        self
    }

    /// Builds the `GetSearchResults` query for one root, covering every
    /// weekday (BMLT numbers them 1 = Sunday … 7 = Saturday).
    ///
    /// Returns `None` for roots that cannot carry a path, such as `mailto:`.
    pub fn search_url(root: &Url) -> Option<Url> {
        let mut url = root.clone();
        url.path_segments_mut()
            .ok()?
            .pop_if_empty()
            .extend(["client_interface", "json", ""]);
        url.query_pairs_mut()
            .clear()
            .append_pair("switcher", "GetSearchResults")
            .append_pair("recursive", "1")
            .append_pair("weekdays", "1,2,3,4,5,6,7");
        Some(url)
    }
}
