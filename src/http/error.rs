//! Proxy error taxonomy.
//!
//! Every upstream failure, transport or status, collapses to the same
//! fixed 500 payload; parameter problems get a 400 naming the parameter.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Errors a list request can produce.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// `sortOrder` is not one of the supported keys.
    #[error("invalid sortOrder: {0}")]
    InvalidSortOrder(String),

    /// `top` does not parse as a non-negative integer.
    #[error("invalid top: {0}")]
    InvalidTop(String),

    /// The upstream request failed in transit or its body was not a JSON
    /// array.
    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    /// The upstream answered with a non-2xx status.
    #[error("upstream returned status {0}")]
    UpstreamStatus(u16),
}

/// Result type for list request handling.
pub type ProxyResult<T> = Result<T, ProxyError>;

impl ProxyError {
    /// The HTTP status this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::InvalidSortOrder(_) | ProxyError::InvalidTop(_) => StatusCode::BAD_REQUEST,
            ProxyError::Upstream(_) | ProxyError::UpstreamStatus(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let body = match &self {
            // client mistakes get a message naming the parameter
            ProxyError::InvalidSortOrder(_) | ProxyError::InvalidTop(_) => {
                json!({ "error": self.to_string() })
            }
            // upstream failures are indistinguishable to callers
            ProxyError::Upstream(_) | ProxyError::UpstreamStatus(_) => {
                json!({ "error": "Error fetching data" })
            }
        };
        (self.status(), Json(body)).into_response()
    }
}
