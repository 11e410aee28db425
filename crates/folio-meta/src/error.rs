//! Error types for metadata resolution.

use thiserror::Error;

/// Failure of a single outbound request.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The HTTP client could not be built.
    #[error("HTTP client setup failed: {0}")]
    Client(String),

    /// Connection, TLS, timeout, redirect or body-decoding failure.
    #[error("request to {url} failed: {message}")]
    Transport {
        /// The requested URL.
        url: String,
        /// What went wrong.
        message: String,
    },
}

impl FetchError {
    /// Create a transport error for `url`.
    pub fn transport(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            url: url.into(),
            message: message.into(),
        }
    }
}

/// Errors surfaced by the link preview resolver.
///
/// Everything except a bad input URL degrades to a partial result, so this
/// has a single variant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MetaError {
    /// The input is not an absolute http(s) URL.
    #[error("invalid url '{input}': {reason}")]
    InvalidUrl {
        /// The rejected input.
        input: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Errors surfaced by the video metadata resolver.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VideoError {
    /// No video id was supplied.
    #[error("missing video id")]
    MissingId,

    /// The upstream API answered with a failure.
    #[error("upstream returned {status}: {message}")]
    Upstream {
        /// HTTP status, or 200 when the failure was in the response envelope.
        status: u16,
        /// Upstream message, if any.
        message: String,
    },

    /// Transport failure or an unreadable upstream payload.
    #[error("video lookup failed: {0}")]
    Unexpected(String),
}

impl VideoError {
    /// Create an upstream error.
    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            message: message.into(),
        }
    }

    /// Create an unexpected error.
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(VideoError::MissingId.to_string(), "missing video id");
        assert_eq!(
            VideoError::upstream(404, "not found").to_string(),
            "upstream returned 404: not found"
        );
        let err = FetchError::transport("https://x.test/", "timed out");
        assert!(err.to_string().contains("https://x.test/"));
    }
}
