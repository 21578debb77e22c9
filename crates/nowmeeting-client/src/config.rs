//! Client configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/nowmeeting/config.toml` by default. Every key is optional.

use std::path::{Path, PathBuf};

use nowmeeting_core::{CivilZone, DEFAULT_TIMEZONE, FormatOptions};
use serde::{Deserialize, Serialize};

/// Configuration for the nowmeeting client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// IANA timezone used to read the civil clock.
    pub timezone: String,

    /// Debug mode.
    pub debug: bool,

    pub data: DataSettings,

    pub display: DisplaySettings,

    pub refresh: RefreshSettings,

    pub fetch: FetchSettings,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE.to_string(),
            debug: false,
            data: DataSettings::default(),
            display: DisplaySettings::default(),
            refresh: RefreshSettings::default(),
            fetch: FetchSettings::default(),
        }
    }
}

/// Where the meeting snapshot lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub path: PathBuf,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("meetings.json"),
        }
    }
}

/// Display settings for output formatting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Prefix stripped from meeting names.
    pub title_prefix: String,

    /// Text to show when no meeting is running.
    pub no_meeting_text: String,

    /// Text to show when the snapshot cannot be loaded.
    pub error_text: String,

    /// Emit OSC8 hyperlinks in terminal output.
    pub hyperlinks: bool,

    /// Print the "Hoje é …" headline.
    pub show_clock: bool,

    /// Maximum title length (truncated with ellipsis).
    pub max_title_length: Option<usize>,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        let options = FormatOptions::default();
        Self {
            title_prefix: options.title_prefix,
            no_meeting_text: options.no_meeting_text,
            error_text: options.error_text,
            hyperlinks: options.hyperlinks,
            show_clock: options.show_clock,
            max_title_length: options.max_title_length,
        }
    }
}

/// Watch mode settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshSettings {
    /// Re-render on every multiple of this many minutes past midnight.
    pub every_minutes: u32,
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self { every_minutes: 30 }
    }
}

/// Settings for `nowmeeting fetch`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    /// BMLT root servers, tried in order.
    pub roots: Vec<String>,

    /// Request timeout in seconds.
    pub timeout_secs: u64,

    /// User agent sent to the roots.
    pub user_agent: Option<String>,

    /// Retry once without certificate checks after a TLS failure.
    pub accept_invalid_certs_fallback: bool,

    /// Scrape `html_url` when every root fails.
    pub html_fallback: bool,

    /// Meeting listing page for the HTML fallback.
    pub html_url: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            roots: vec![
                "https://bmlt.na.org.br/ativo/main_server".to_string(),
                "https://bmlt.na.org.br/main_server".to_string(),
            ],
            timeout_secs: 20,
            user_agent: None,
            accept_invalid_certs_fallback: true,
            html_fallback: true,
            html_url: "https://www.na.org.br/virtual/".to_string(),
        }
    }
}

impl ClientConfig {
    /// Loads configuration from the default path.
    pub fn load() -> Result<Self, String> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let content =
            std::fs::read_to_string(path).map_err(|e| format!("failed to read config: {}", e))?;
        toml::from_str(&content).map_err(|e| format!("failed to parse config: {}", e))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("nowmeeting")
    }

    /// The civil zone to normalize against, degrading to the observer's
    /// local zone when `timezone` is not a known IANA name.
    pub fn zone(&self) -> CivilZone {
        CivilZone::resolve(&self.timezone)
    }

    pub fn to_format_options(&self) -> FormatOptions {
        FormatOptions {
            title_prefix: self.display.title_prefix.clone(),
            no_meeting_text: self.display.no_meeting_text.clone(),
            error_text: self.display.error_text.clone(),
            hyperlinks: self.display.hyperlinks,
            show_clock: self.display.show_clock,
            max_title_length: self.display.max_title_length,
        }
    }

    /// Converts the `[fetch]` section to a BMLT source configuration.
    #[cfg(feature = "bmlt")]
    pub fn to_bmlt_config(&self) -> Result<nowmeeting_providers::BmltConfig, String> {
        use nowmeeting_providers::BmltConfig;

        let mut config = if self.fetch.roots.is_empty() {
            BmltConfig::with_default_roots()
        } else {
            BmltConfig::new(&self.fetch.roots)
        }
        .map_err(|e| format!("invalid BMLT root: {}", e))?
        .with_timeout(std::time::Duration::from_secs(self.fetch.timeout_secs));

        if let Some(ref user_agent) = self.fetch.user_agent {
            config = config.with_user_agent(user_agent);
        }
        if !self.fetch.accept_invalid_certs_fallback {
            config = config.with_strict_tls();
        }
        Ok(config)
    }

    /// Converts the `[fetch]` section to an HTML source configuration.
    #[cfg(feature = "html")]
    pub fn to_html_config(&self) -> Result<nowmeeting_providers::HtmlConfig, String> {
        use nowmeeting_providers::HtmlConfig;

        let mut config = HtmlConfig::new(&self.fetch.html_url)
            .map_err(|e| format!("invalid fetch.html_url: {}", e))?
            .with_timeout(std::time::Duration::from_secs(self.fetch.timeout_secs));

        if let Some(ref user_agent) = self.fetch.user_agent {
            config = config.with_user_agent(user_agent);
        }
        Ok(config)
    }

    /// Checks the settings that would otherwise only fail at use.
    pub fn validate(&self) -> Result<(), String> {
        CivilZone::try_named(&self.timezone).map_err(|e| e.to_string())?;

        if !(1..=1440).contains(&self.refresh.every_minutes) {
            return Err(format!(
                "refresh.every_minutes must be between 1 and 1440, got {}",
                self.refresh.every_minutes
            ));
        }

        if self.fetch.timeout_secs == 0 {
            return Err("fetch.timeout_secs must be greater than zero".to_string());
        }

        if self.display.max_title_length == Some(0) {
            return Err("display.max_title_length must be greater than zero".to_string());
        }

        #[cfg(feature = "bmlt")]
        self.to_bmlt_config()?;

        #[cfg(feature = "html")]
        if self.fetch.html_fallback {
            self.to_html_config()?;
        }

        Ok(())
    }
}
