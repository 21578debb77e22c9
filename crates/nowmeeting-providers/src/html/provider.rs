//! HTML listing source.

use reqwest::Client;
use tracing::{debug, info};

use nowmeeting_core::MeetingRecord;

use crate::error::{ProviderError, ProviderResult};
use crate::http::{build_client, get_body, request_error};
use crate::source::{BoxFuture, MeetingSource};

use super::config::HtmlConfig;
use super::parse::parse_page;

const PROVIDER: &str = "html";

/// Scrapes meetings from the public listing page.
pub struct HtmlSource {
    client: Client,
    config: HtmlConfig,
}

impl HtmlSource {
    /// Creates a new HTML source.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the HTTP client cannot be built.
    pub fn new(config: HtmlConfig) -> ProviderResult<Self> {
        let client = build_client(PROVIDER, config.timeout, &config.user_agent, false)?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &HtmlConfig {
        &self.config
    }
}

impl MeetingSource for HtmlSource {
    fn name(&self) -> &str {
        PROVIDER
    }

    fn fetch(&self) -> BoxFuture<'_, ProviderResult<Vec<MeetingRecord>>> {
        Box::pin(async move {
            let url = &self.config.url;
            debug!(%url, "fetching meeting listing page");
            let body = get_body(&self.client, url)
                .await
                .map_err(|e| request_error(PROVIDER, url, e))?;

            let meetings = parse_page(&body);
            if meetings.is_empty() {
                return Err(
                    ProviderError::not_found(format!("no meeting rows found on {}", url))
                        .with_provider(PROVIDER),
                );
            }
            info!(%url, meetings = meetings.len(), "parsed meeting listing page");
            Ok(meetings)
        })
    }
}
