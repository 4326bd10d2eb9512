//! Error handling for the MariCRM client

use thiserror::Error;

/// Unified error type for the MariCRM client
#[derive(Error, Debug)]
pub enum Error {
    /// Authentication errors (credentials, local validation, missing session)
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Non-2xx HTTP response, with the server's message when available
    #[error("Request failed with status {status}: {message}")]
    Request {
        /// HTTP status code of the response
        status: u16,
        /// Message extracted from the response body, or a generic fallback
        message: String,
    },

    /// Transport-level failures (connection refused, DNS, timeout)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Session store I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Authentication failure taxonomy
#[derive(Error, Debug)]
pub enum AuthError {
    /// The backend rejected the email/password pair
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Registration input failed client-side validation; no request was sent
    #[error("validation failed: {0}")]
    ValidationFailed(String),

    /// An operation requiring a session was called while logged out
    #[error("not logged in")]
    NotLoggedIn,
}

impl Error {
    /// Create a request error from a status code and message
    pub fn request(status: u16, message: impl Into<String>) -> Self {
        Error::Request {
            status,
            message: message.into(),
        }
    }

    /// Whether this error is an HTTP response with the given status
    pub fn is_status(&self, code: u16) -> bool {
        matches!(self, Error::Request { status, .. } if *status == code)
    }
}
