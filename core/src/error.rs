//! Error types for the job board client.
//!
//! # Design
//! Every failure a store action can surface is an `ApiError`. The `Display`
//! text of each variant is the fixed, human-readable message shown to the
//! user; the raw status code and body are logged where the error is created
//! and are not carried further. `TransportError` is the narrower error a
//! `Transport` reports before the client maps it into the taxonomy.

use thiserror::Error;

/// Errors returned by client parse methods and store actions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// 400. Carries the backend's `detail` message when it sent one.
    #[error("{}", bad_request_message(.detail))]
    BadRequest { detail: Option<String> },

    /// 401.
    #[error("unauthorized, please log in")]
    Unauthorized,

    /// 403.
    #[error("access forbidden")]
    Forbidden,

    /// 404. The body is never consulted.
    #[error("resource not found")]
    NotFound,

    /// 500.
    #[error("internal server error")]
    ServerError,

    /// Any other non-2xx status.
    #[error("request failed (status {0})")]
    Status(u16),

    /// The request went out but no response came back (refused, timed out).
    #[error("server did not respond")]
    NoResponse,

    /// The request could not be constructed or sent locally.
    #[error("{0}")]
    Request(String),

    /// A 2xx response whose body was empty or JSON `null`.
    #[error("empty response from server")]
    EmptyResponse,

    /// A 2xx response whose body could not be decoded.
    #[error("failed to decode response: {0}")]
    Deserialization(String),
}

impl ApiError {
    /// Map a non-success status into the taxonomy.
    ///
    /// Only a 400 looks at the body, for the backend's `detail` field.
    pub fn from_status(status: u16, body: &str) -> Self {
        match status {
            400 => ApiError::BadRequest {
                detail: serde_json::from_str::<serde_json::Value>(body)
                    .ok()
                    .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_string)),
            },
            401 => ApiError::Unauthorized,
            403 => ApiError::Forbidden,
            404 => ApiError::NotFound,
            500 => ApiError::ServerError,
            other => ApiError::Status(other),
        }
    }
}

fn bad_request_message(detail: &Option<String>) -> &str {
    detail.as_deref().unwrap_or("invalid request parameters")
}

/// Failures reported by a `Transport` before any response was received.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Connection refused, reset, or timed out.
    #[error("no response: {0}")]
    NoResponse(String),

    /// The request could not be built or dispatched.
    #[error("request error: {0}")]
    Request(String),
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::NoResponse(_) => ApiError::NoResponse,
            TransportError::Request(msg) => ApiError::Request(msg),
        }
    }
}
