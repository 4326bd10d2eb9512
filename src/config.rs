//! Configuration options for the MariCRM client

use std::path::PathBuf;
use std::time::Duration;

/// How the bearer token is written into the `Authorization` header.
///
/// The backend historically accepted both forms; `Bearer` is the
/// standardized default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    /// `Authorization: Bearer <token>`
    Bearer,
    /// `Authorization: <token>`
    Raw,
}

impl AuthScheme {
    /// Format a token into the header value for this scheme
    pub fn header_value(&self, token: &str) -> String {
        match self {
            AuthScheme::Bearer => format!("Bearer {}", token),
            AuthScheme::Raw => token.to_string(),
        }
    }
}

/// Configuration options for the MariCRM client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// The request timeout
    pub request_timeout: Option<Duration>,

    /// Whether to persist the session to `session_file`
    pub persist_session: bool,

    /// Where the session JSON is stored between runs
    pub session_file: Option<PathBuf>,

    /// Authorization header scheme
    pub auth_scheme: AuthScheme,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            request_timeout: Some(Duration::from_secs(30)),
            persist_session: true,
            session_file: None,
            auth_scheme: AuthScheme::Bearer,
        }
    }
}

impl ClientOptions {
    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set whether to persist the session
    pub fn with_persist_session(mut self, value: bool) -> Self {
        self.persist_session = value;
        self
    }

    /// Set the session file path
    pub fn with_session_file(mut self, value: impl Into<PathBuf>) -> Self {
        self.session_file = Some(value.into());
        self
    }

    /// Set the Authorization header scheme
    pub fn with_auth_scheme(mut self, value: AuthScheme) -> Self {
        self.auth_scheme = value;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_value_schemes() {
        assert_eq!(AuthScheme::Bearer.header_value("abc"), "Bearer abc");
        assert_eq!(AuthScheme::Raw.header_value("abc"), "abc");
    }
}
