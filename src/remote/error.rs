//! Error types for the remote fetchers.

use thiserror::Error;

/// Errors that can occur while talking to the quote, suggestion or image
/// services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RemoteError {
    /// The request could not be sent or the body could not be read.
    #[error("network error: {0}")]
    Network(String),

    /// The service answered with a non-success status.
    #[error("{service} answered with HTTP {status}")]
    Status {
        /// Which service answered.
        service: &'static str,
        /// HTTP status code.
        status: u16,
    },

    /// The quote payload parsed but carried no usable text.
    #[error("quote service returned an empty quote")]
    EmptyQuote,

    /// Failed to parse a JSON body.
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    /// The image bytes could not be decoded.
    #[error("image decode error: {0}")]
    Decode(String),

    /// A blocking decode task was cancelled or panicked.
    #[error("background task failed: {0}")]
    Task(String),
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

impl From<serde_json::Error> for RemoteError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonParse(err.to_string())
    }
}

impl From<image::ImageError> for RemoteError {
    fn from(err: image::ImageError) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<tokio::task::JoinError> for RemoteError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Task(err.to_string())
    }
}

/// Result type alias for remote operations.
pub type Result<T> = std::result::Result<T, RemoteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = RemoteError::Status {
            service: "suggestion",
            status: 500,
        };
        assert_eq!(err.to_string(), "suggestion answered with HTTP 500");
    }

    #[test]
    fn test_from_serde_error() {
        let err = serde_json::from_str::<u32>("nope").map_err(RemoteError::from);
        assert!(matches!(err, Err(RemoteError::JsonParse(_))));
    }
}
