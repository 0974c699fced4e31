//! Error types for daemon HTTP requests.
//!
//! Every typed client call returns [`HttpError`] on failure instead of an
//! absent value, so callers can tell an unreachable daemon apart from a daemon
//! that answered with an error status or with a body that does not match the
//! expected shape. [`HttpError::kind`] collapses the variants into a
//! [`FailureKind`] tag for callers that only care about the category.

use thiserror::Error;

/// Errors that can occur while talking to a daemon over HTTP.
///
/// # Example
///
/// ```rust,no_run
/// use kryptokrona::http::{FailureKind, HttpError};
///
/// fn describe(err: &HttpError) -> &'static str {
///     match err.kind() {
///         FailureKind::Network => "daemon unreachable",
///         FailureKind::Status => "daemon returned an error status",
///         FailureKind::Decode => "unexpected response body",
///         FailureKind::Request => "request could not be built",
///     }
/// }
/// ```
#[derive(Debug, Error)]
pub enum HttpError {
    /// The request could not be sent or the response body could not be read.
    ///
    /// Covers connection refused, timeouts, DNS resolution failures and TLS
    /// handshake errors.
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The middleware stack gave up on the request, after exhausting any
    /// configured retries.
    #[error("Middleware error: {0}")]
    MiddlewareError(#[from] reqwest_middleware::Error),

    /// The daemon answered with a non-success HTTP status.
    #[error("Server error {status}: {body}")]
    ServerError {
        status: reqwest::StatusCode,
        body: String,
    },

    /// Joining the node base URL with the request path produced an invalid URL.
    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),

    /// Only `GET` and `POST` are used by the daemon API.
    #[error("Unsupported HTTP method")]
    UnsupportedMethod,

    /// The request body could not be serialized or the response body did not
    /// decode into the expected type.
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Coarse category of an [`HttpError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The daemon could not be reached or the transfer broke off.
    Network,
    /// The daemon answered with a non-2xx status.
    Status,
    /// The body was not the JSON we expected.
    Decode,
    /// The request was never sent because it could not be built.
    Request,
}

impl HttpError {
    pub fn kind(&self) -> FailureKind {
        match self {
            HttpError::RequestFailed(e) if e.is_decode() => FailureKind::Decode,
            HttpError::RequestFailed(e) if e.is_builder() => FailureKind::Request,
            HttpError::RequestFailed(_) | HttpError::MiddlewareError(_) => FailureKind::Network,
            HttpError::ServerError { .. } => FailureKind::Status,
            HttpError::JsonError(_) => FailureKind::Decode,
            HttpError::UrlError(_) | HttpError::UnsupportedMethod => FailureKind::Request,
        }
    }

    /// HTTP status returned by the daemon, when the failure was a status error.
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            HttpError::ServerError { status, .. } => Some(*status),
            _ => None,
        }
    }
}
