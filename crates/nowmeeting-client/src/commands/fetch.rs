//! `nowmeeting fetch`: refresh the snapshot from BMLT, falling back to the
//! HTML listing page.

use std::path::Path;

use nowmeeting_core::MeetingRecord;
use nowmeeting_providers::{BmltConfig, BmltSource, MeetingSource, ProviderResult, write_meetings};
use tracing::{info, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Fetches virtual meetings and writes them to `output`.
///
/// `roots` replaces the configured root servers when not empty. The snapshot
/// is only written when a source produced meetings.
pub async fn run(config: &ClientConfig, output: &Path, roots: &[String]) -> ClientResult<()> {
    let bmlt = bmlt_config(config, roots)?;
    info!(roots = bmlt.roots.len(), output = %output.display(), "fetching meetings");

    let source = BmltSource::new(bmlt)?;
    let fallback = fallback_source(config)?;
    let meetings = fetch_with_fallback(&source, fallback.as_deref()).await?;
    write_meetings(output, &meetings)?;

    println!("Wrote {} meetings to {}", meetings.len(), output.display());
    Ok(())
}

/// Tries `primary`, then `fallback` when the primary fails.
///
/// When both fail the primary's error is returned.
async fn fetch_with_fallback(
    primary: &dyn MeetingSource,
    fallback: Option<&dyn MeetingSource>,
) -> ProviderResult<Vec<MeetingRecord>> {
    let err = match primary.fetch().await {
        Ok(meetings) => return Ok(meetings),
        Err(err) => err,
    };
    let Some(fallback) = fallback else {
        return Err(err);
    };

    warn!(
        source = primary.name(),
        error = %err,
        fallback = fallback.name(),
        "trying fallback source"
    );
    match fallback.fetch().await {
        Ok(meetings) => Ok(meetings),
        Err(fallback_err) => {
            warn!(source = fallback.name(), error = %fallback_err, "fallback source failed");
            Err(err)
        }
    }
}

#[cfg(feature = "html")]
fn fallback_source(config: &ClientConfig) -> ClientResult<Option<Box<dyn MeetingSource>>> {
    if !config.fetch.html_fallback {
        return Ok(None);
    }
    let html = config.to_html_config().map_err(ClientError::Config)?;
    let source = nowmeeting_providers::HtmlSource::new(html)?;
    Ok(Some(Box::new(source)))
}

#[cfg(not(feature = "html"))]
fn fallback_source(_config: &ClientConfig) -> ClientResult<Option<Box<dyn MeetingSource>>> {
    Ok(None)
}

fn bmlt_config(config: &ClientConfig, roots: &[String]) -> ClientResult<BmltConfig> {
    let mut bmlt = config.to_bmlt_config().map_err(ClientError::Config)?;
    if !roots.is_empty() {
        bmlt.roots = BmltConfig::new(roots)
            .map_err(|e| ClientError::Config(format!("invalid BMLT root: {}", e)))?
            .roots;
    }
    Ok(bmlt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nowmeeting_providers::{BoxFuture, ProviderError, ProviderErrorCode};

    struct FixedSource(Vec<MeetingRecord>);

    impl MeetingSource for FixedSource {
        fn name(&self) -> &str {
            "fixed"
        }

        fn fetch(&self) -> BoxFuture<'_, ProviderResult<Vec<MeetingRecord>>> {
            Box::pin(async move { Ok(self.0.clone()) })
        }
    }

    struct BrokenSource(ProviderErrorCode);

    impl MeetingSource for BrokenSource {
        fn name(&self) -> &str {
            "broken"
        }

        fn fetch(&self) -> BoxFuture<'_, ProviderResult<Vec<MeetingRecord>>> {
            let err = match self.0 {
                ProviderErrorCode::NotFound => ProviderError::not_found("nothing here"),
                _ => ProviderError::network("unreachable"),
            };
            Box::pin(async move { Err(err) })
        }
    }

    fn meetings() -> Vec<MeetingRecord> {
        vec![MeetingRecord::new("Reunião Luz", 2, "20:00:00", "21:00:00")]
    }

    mod roots {
        use super::*;

        #[test]
        fn configured_roots_by_default() {
            let bmlt = bmlt_config(&ClientConfig::default(), &[]).unwrap();
            assert_eq!(bmlt.roots.len(), 2);
            assert_eq!(bmlt.timeout, std::time::Duration::from_secs(20));
        }

        #[test]
        fn cli_roots_override() {
            let roots = vec!["https://bmlt.example.org/main_server".to_string()];
            let bmlt = bmlt_config(&ClientConfig::default(), &roots).unwrap();
            assert_eq!(bmlt.roots.len(), 1);
            assert_eq!(bmlt.roots[0].host_str(), Some("bmlt.example.org"));
        }

        #[test]
        fn invalid_cli_root() {
            let err = bmlt_config(&ClientConfig::default(), &["::".to_string()]).unwrap_err();
            assert!(matches!(err, ClientError::Config(_)));
        }
    }

    mod fallback {
        use super::*;

        #[tokio::test]
        async fn primary_wins() {
            let primary = FixedSource(meetings());
            let fallback = BrokenSource(ProviderErrorCode::NetworkError);
            let result = fetch_with_fallback(&primary, Some(&fallback)).await.unwrap();
            assert_eq!(result, meetings());
        }

        #[tokio::test]
        async fn fallback_used_when_primary_fails() {
            let primary = BrokenSource(ProviderErrorCode::NetworkError);
            let fallback = FixedSource(meetings());
            let result = fetch_with_fallback(&primary, Some(&fallback)).await.unwrap();
            assert_eq!(result[0].name, "Reunião Luz");
        }

        #[tokio::test]
        async fn primary_error_kept_when_both_fail() {
            let primary = BrokenSource(ProviderErrorCode::NetworkError);
            let fallback = BrokenSource(ProviderErrorCode::NotFound);
            let err = fetch_with_fallback(&primary, Some(&fallback)).await.unwrap_err();
            assert_eq!(err.code(), ProviderErrorCode::NetworkError);
        }

        #[tokio::test]
        async fn no_fallback() {
            let primary = BrokenSource(ProviderErrorCode::NotFound);
            let err = fetch_with_fallback(&primary, None).await.unwrap_err();
            assert_eq!(err.code(), ProviderErrorCode::NotFound);
        }

        #[cfg(feature = "html")]
        #[test]
        fn html_fallback_follows_config() {
            let mut config = ClientConfig::default();
            assert_eq!(fallback_source(&config).unwrap().unwrap().name(), "html");

            config.fetch.html_fallback = false;
            assert!(fallback_source(&config).unwrap().is_none());
        }
    }
}
