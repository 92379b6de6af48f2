//! Gateway error taxonomy
//!
//! Component errors stay small and specific; `GatewayError` is the only type that
//! crosses the gateway API and knows how to render itself as an HTTP response.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// A key whose first character is not a letter A-Z (case-insensitive).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid partition key {key:?}: must start with a letter A-Z")]
pub struct InvalidKeyError {
    pub key: String,
}

/// Failure to obtain the partition topology of a backend service.
///
/// Both variants are retryable by the caller; the directory never retries itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    #[error("partition directory unavailable: {0}")]
    Unavailable(String),

    #[error("partition directory query timed out")]
    Timeout,
}

/// Failure of a single call to a backend partition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("backend transport error: {0}")]
    Transport(String),

    #[error("backend call timed out")]
    Timeout,
}

impl DispatchError {
    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DispatchError::Timeout
        } else {
            DispatchError::Transport(err.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    InvalidKey(#[from] InvalidKeyError),

    #[error("aggregation failed: {0}")]
    AggregationFailed(#[source] DirectoryError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::InvalidKey(_) => StatusCode::BAD_REQUEST,
            GatewayError::AggregationFailed(_) => StatusCode::SERVICE_UNAVAILABLE,
            GatewayError::Dispatch(DispatchError::Transport(_)) => StatusCode::BAD_GATEWAY,
            GatewayError::Dispatch(DispatchError::Timeout) => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            GatewayError::InvalidKey(_) => "INVALID_KEY",
            GatewayError::AggregationFailed(_) => "AGGREGATION_FAILED",
            GatewayError::Dispatch(DispatchError::Transport(_)) => "BACKEND_UNREACHABLE",
            GatewayError::Dispatch(DispatchError::Timeout) => "BACKEND_TIMEOUT",
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": {
                "code": self.code(),
                "message": self.to_string(),
            }
        }));

        (self.status_code(), body).into_response()
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;
