//! HTTP plumbing shared by the network sources.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use url::Url;

use crate::error::{ProviderError, ProviderResult};

pub(crate) fn build_client(
    provider: &'static str,
    timeout: Duration,
    user_agent: &str,
    accept_invalid_certs: bool,
) -> ProviderResult<Client> {
    Client::builder()
        .danger_accept_invalid_certs(accept_invalid_certs)
        .timeout(timeout)
        .user_agent(user_agent)
        .build()
        .map_err(|e| {
            ProviderError::configuration(format!("failed to create HTTP client: {}", e))
                .with_provider(provider)
        })
}

pub(crate) async fn get_body(client: &Client, url: &Url) -> Result<String, reqwest::Error> {
    client
        .get(url.clone())
        .send()
        .await?
        .error_for_status()?
        .text()
        .await
}

/// Returns true when `err` was caused by certificate or TLS negotiation
/// failure rather than by the server itself.
#[cfg(feature = "bmlt")]
pub(crate) fn is_tls_failure(err: &reqwest::Error) -> bool {
    err.is_connect() && mentions_tls(err)
}

#[cfg(feature = "bmlt")]
fn mentions_tls(err: &(dyn std::error::Error + 'static)) -> bool {
    std::iter::successors(Some(err), |e| e.source()).any(|e| {
        let text = e.to_string().to_lowercase();
        ["certificate", "tls", "ssl", "handshake"]
            .iter()
            .any(|needle| text.contains(needle))
    })
}

pub(crate) fn request_error(provider: &'static str, url: &Url, err: reqwest::Error) -> ProviderError {
    let error = if err.is_timeout() {
        ProviderError::network(format!("request to {} timed out", url))
    } else if err.is_connect() {
        ProviderError::network(format!("connection to {} failed: {}", url, err))
    } else {
        match err.status() {
            Some(StatusCode::NOT_FOUND) => ProviderError::not_found(format!("{} not found", url)),
            Some(status) if status.is_server_error() => {
                ProviderError::server(format!("{} answered {}", url, status))
            }
            Some(status) => ProviderError::invalid_response(format!("{} answered {}", url, status)),
            None => ProviderError::network(format!("request to {} failed: {}", url, err)),
        }
    };
    error.with_provider(provider).with_source(err)
}
