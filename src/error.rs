//! Error types for Zendesk API operations.

use thiserror::Error;

use crate::decode::DecodeError;

/// Errors that can occur during Zendesk API operations.
#[derive(Debug, Error)]
pub enum ZendeskError {
    /// Configuration is missing or incomplete.
    #[error("Zendesk configuration required: {0}")]
    ConfigMissing(String),

    /// Subdomain does not look like a Zendesk account name.
    #[error("{0} is invalid subdomain")]
    InvalidSubdomain(String),

    /// A header name or value could not be used.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// Caller supplied options that can never produce a valid request.
    #[error("invalid options: {0}")]
    Options(String),

    /// API request failed with a non-success status.
    #[error("{status_code}: {body}")]
    Api { status_code: u16, body: String },

    /// Rate limited.
    #[error("Rate limited, retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The request context was cancelled.
    #[error("request cancelled")]
    Cancelled,

    /// The request context deadline passed.
    #[error("request deadline exceeded")]
    DeadlineExceeded,

    /// JSON parsing error.
    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// A polymorphic value could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// A sideload path did not resolve in the response body.
    #[error("could not find {path} in result {body}")]
    SideloadNotFound { path: String, body: String },

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ZendeskError {
    /// HTTP status code for protocol errors.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status_code, .. } => Some(*status_code),
            Self::RateLimited { .. } => Some(429),
            _ => None,
        }
    }

    /// Whether the error came from a cancelled or expired context.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled | Self::DeadlineExceeded)
    }
}

/// Result type alias for Zendesk operations.
pub type Result<T> = core::result::Result<T, ZendeskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display_has_status_and_body() {
        let err = ZendeskError::Api {
            status_code: 404,
            body: r#"{"error":"RecordNotFound"}"#.to_string(),
        };
        assert_eq!(err.to_string(), r#"404: {"error":"RecordNotFound"}"#);
        assert_eq!(err.status_code(), Some(404));
    }

    #[test]
    fn test_sideload_error_mentions_path() {
        let err = ZendeskError::SideloadNotFound {
            path: "ticket.dates".to_string(),
            body: "{}".to_string(),
        };
        assert!(err.to_string().contains("ticket.dates"));
        assert_eq!(err.status_code(), None);
    }

    #[test]
    fn test_is_cancelled() {
        assert!(ZendeskError::Cancelled.is_cancelled());
        assert!(ZendeskError::DeadlineExceeded.is_cancelled());
        assert!(!ZendeskError::Options("x".into()).is_cancelled());
    }
}
