//! Translation of domain errors into HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use folio_meta::{MetaError, VideoError};
use serde_json::json;
use thiserror::Error;

/// An error leaving a handler.
#[derive(Error, Debug)]
pub enum ApiError {
    /// A required query parameter is missing or empty.
    #[error("missing required parameter '{0}'")]
    MissingParam(&'static str),

    /// Document lookup failed.
    #[error(transparent)]
    Content(#[from] folio_core::Error),

    /// Link preview input was rejected.
    #[error(transparent)]
    Link(#[from] MetaError),

    /// Video lookup failed.
    #[error(transparent)]
    Video(#[from] VideoError),
}

impl ApiError {
    /// The status code this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingParam(_) | Self::Link(MetaError::InvalidUrl { .. }) => {
                StatusCode::BAD_REQUEST
            }
            Self::Content(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            Self::Content(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            Self::Content(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Video(VideoError::MissingId) => StatusCode::BAD_REQUEST,
            Self::Video(VideoError::Upstream { .. }) => StatusCode::BAD_GATEWAY,
            Self::Video(VideoError::Unexpected(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %message, "request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %message, "request rejected");
        }
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ApiError::MissingParam("path"), StatusCode::BAD_REQUEST),
            (
                folio_core::Error::invalid_path("..").into(),
                StatusCode::BAD_REQUEST,
            ),
            (folio_core::Error::not_found("a.md").into(), StatusCode::NOT_FOUND),
            (
                folio_core::Error::invalid_data("bad").into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                MetaError::InvalidUrl {
                    input: "x".into(),
                    reason: "relative".into(),
                }
                .into(),
                StatusCode::BAD_REQUEST,
            ),
            (VideoError::MissingId.into(), StatusCode::BAD_REQUEST),
            (VideoError::upstream(404, "gone").into(), StatusCode::BAD_GATEWAY),
            (
                VideoError::unexpected("eof").into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.status(), expected, "{err}");
        }
    }

    #[test]
    fn test_response_status() {
        let response = ApiError::MissingParam("url").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
