//! BMLT meeting source.

use reqwest::Client;
use tracing::{debug, info, warn};
use url::Url;

use nowmeeting_core::MeetingRecord;

use crate::error::{ProviderError, ProviderResult};
use crate::http::{build_client, get_body, is_tls_failure, request_error};
use crate::source::{BoxFuture, MeetingSource};

use super::config::BmltConfig;
use super::convert::{parse_rows, to_records};

const PROVIDER: &str = "bmlt";

/// Fetches virtual meetings from the first BMLT root that has any.
pub struct BmltSource {
    client: Client,
    config: BmltConfig,
}

impl BmltSource {
    /// Creates a new BMLT source.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when no roots are configured or the
    /// HTTP client cannot be built.
    pub fn new(config: BmltConfig) -> ProviderResult<Self> {
        if config.roots.is_empty() {
            return Err(ProviderError::configuration("no BMLT roots configured").with_provider(PROVIDER));
        }
        let client = client_for(&config, false)?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &BmltConfig {
        &self.config
    }

    async fn fetch_root(&self, root: &Url) -> ProviderResult<Vec<MeetingRecord>> {
        let url = BmltConfig::search_url(root).ok_or_else(|| {
            ProviderError::configuration(format!("cannot query BMLT root {}", root))
                .with_provider(PROVIDER)
        })?;
        debug!(%url, "querying BMLT root");

        let body = match get_body(&self.client, &url).await {
            Ok(body) => body,
            Err(err) if self.config.accept_invalid_certs_fallback && is_tls_failure(&err) => {
                warn!(%root, error = %err, "TLS verification failed, retrying without certificate checks");
                let insecure = client_for(&self.config, true)?;
                get_body(&insecure, &url)
                    .await
                    .map_err(|e| request_error(PROVIDER, root, e))?
            }
            Err(err) => return Err(request_error(PROVIDER, root, err)),
        };

        let rows = parse_rows(&body).map_err(|e| {
            ProviderError::invalid_response(format!("unexpected payload from {}", root))
                .with_provider(PROVIDER)
                .with_source(e)
        })?;
        let meetings = to_records(&rows);
        info!(%root, rows = rows.len(), virtual_meetings = meetings.len(), "BMLT root responded");
        Ok(meetings)
    }
}

impl MeetingSource for BmltSource {
    fn name(&self) -> &str {
        PROVIDER
    }

    fn fetch(&self) -> BoxFuture<'_, ProviderResult<Vec<MeetingRecord>>> {
        Box::pin(async move {
            let mut last_error = None;
            for root in &self.config.roots {
                match self.fetch_root(root).await {
                    Ok(meetings) if !meetings.is_empty() => return Ok(meetings),
                    Ok(_) => {
                        warn!(%root, "BMLT root returned no virtual meetings");
                    }
                    Err(err) => {
                        warn!(%root, error = %err, "BMLT root unreachable");
                        last_error = Some(err);
                    }
                }
            }
            Err(last_error.unwrap_or_else(|| {
                ProviderError::not_found("no virtual meetings found on any BMLT root")
                    .with_provider(PROVIDER)
            }))
        })
    }
}

fn client_for(config: &BmltConfig, accept_invalid_certs: bool) -> ProviderResult<Client> {
    build_client(PROVIDER, config.timeout, &config.user_agent, accept_invalid_certs)
}
