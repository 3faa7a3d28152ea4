//! Error types for the conversation backend client.

use thiserror::Error;

/// Generic user-facing message for a failed send.
pub const SEND_FAILED_MESSAGE: &str = "Failed to send message";

/// Errors that can occur while talking to the conversation backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP transport or body decoding failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP client configuration error.
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    /// The backend answered with a non-success status.
    #[error("{operation} returned status {status}")]
    Status {
        /// Operation that was attempted.
        operation: &'static str,
        /// HTTP status code.
        status: u16,
    },

    /// Base URL or path could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl BackendError {
    /// Message suitable for the user-visible error slot.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Status { .. } => SEND_FAILED_MESSAGE.to_string(),
            Self::Http(err) if err.is_timeout() => "Request timed out".to_string(),
            Self::Http(err) if err.is_decode() => "Unexpected response from server".to_string(),
            Self::Http(_) => "Failed to reach the server".to_string(),
            Self::HttpClient(_) | Self::InvalidUrl(_) => self.to_string(),
        }
    }

    /// HTTP status code, if the backend answered.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Convenience result alias for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_user_message_is_generic() {
        let err = BackendError::Status {
            operation: "create conversation",
            status: 500,
        };
        assert_eq!(err.user_message(), SEND_FAILED_MESSAGE);
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.to_string(), "create conversation returned status 500");
    }

    #[test]
    fn test_invalid_url_message() {
        let err = BackendError::from(url::Url::parse("not a url").unwrap_err());
        assert!(err.user_message().starts_with("Invalid URL"));
        assert!(err.status().is_none());
    }
}
