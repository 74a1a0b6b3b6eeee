//! Error types for talking to the message service and driving the view model

use thiserror::Error;

/// Result type for inbox operations
pub type InboxResult<T> = Result<T, InboxError>;

/// Everything that can go wrong between the view model and the message service
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InboxError {
    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Request timed out after {timeout:?}")]
    Timeout { timeout: std::time::Duration },

    #[error("Message service returned status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Invalid response from message service: {details}")]
    InvalidResponse { details: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("No message is being composed")]
    NotComposing,

    #[error("Message has no id")]
    MissingId,
}

impl InboxError {
    /// Create a network error
    pub fn network(message: impl Into<String>) -> Self {
        InboxError::Network {
            message: message.into(),
        }
    }

    /// Create a timeout error
    pub fn timeout(timeout: std::time::Duration) -> Self {
        InboxError::Timeout { timeout }
    }

    /// Create an unexpected status error
    pub fn status(status: u16, url: impl Into<String>) -> Self {
        InboxError::Status {
            status,
            url: url.into(),
        }
    }

    /// Create an invalid response error
    pub fn invalid_response(details: impl Into<String>) -> Self {
        InboxError::InvalidResponse {
            details: details.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        InboxError::Config {
            message: message.into(),
        }
    }

    /// Whether the error came from the transport rather than from local state
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            InboxError::Network { .. }
                | InboxError::Timeout { .. }
                | InboxError::Status { .. }
                | InboxError::InvalidResponse { .. }
        )
    }
}

impl From<reqwest::Error> for InboxError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            InboxError::invalid_response(err.to_string())
        } else if let Some(status) = err.status() {
            let url = err.url().map(|u| u.to_string()).unwrap_or_default();
            InboxError::status(status.as_u16(), url)
        } else {
            InboxError::network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for InboxError {
    fn from(err: serde_json::Error) -> Self {
        InboxError::invalid_response(format!("JSON parsing error: {}", err))
    }
}

impl From<url::ParseError> for InboxError {
    fn from(err: url::ParseError) -> Self {
        InboxError::config(format!("Invalid URL: {}", err))
    }
}
