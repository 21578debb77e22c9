//! Client error types.

use std::fmt;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur in the client.
#[derive(Debug)]
pub enum ClientError {
    /// Configuration error.
    Config(String),
    /// Loading or fetching meetings failed.
    Provider(String),
    /// IO error.
    Io(std::io::Error),
    /// Action failed (open, copy).
    Action(String),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "configuration error: {}", msg),
            Self::Provider(msg) => write!(f, "provider error: {}", msg),
            Self::Io(err) => write!(f, "IO error: {}", err),
            Self::Action(msg) => write!(f, "action failed: {}", msg),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<nowmeeting_providers::ProviderError> for ClientError {
    fn from(err: nowmeeting_providers::ProviderError) -> Self {
        Self::Provider(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nowmeeting_providers::ProviderError;

    #[test]
    fn display_prefixes() {
        assert_eq!(
            ClientError::Config("bad timezone".into()).to_string(),
            "configuration error: bad timezone"
        );
        assert_eq!(
            ClientError::Action("no link".into()).to_string(),
            "action failed: no link"
        );
    }

    #[test]
    fn provider_errors_convert() {
        let err: ClientError = ProviderError::not_found("meetings.json does not exist")
            .with_provider("file")
            .into();
        assert_eq!(
            err.to_string(),
            "provider error: [file] not_found: meetings.json does not exist"
        );
    }

    #[test]
    fn io_errors_keep_source() {
        use std::error::Error;
        let err: ClientError = std::io::Error::other("broken pipe").into();
        assert!(err.source().is_some());
    }
}
