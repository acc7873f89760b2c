use thiserror::Error;

/// Top-level error type for the `login-api` crate.
///
/// Covers every failure mode of the users API: authentication challenges,
/// transport, HTTP status failures, and envelope decoding.
/// `login-core` maps these into service-level errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// HTTP 401 carrying a `WWW-Authenticate` challenge. The server wants
    /// the caller to re-authenticate before retrying.
    #[error("Authentication required: {challenge}")]
    AuthenticationChallenge { challenge: String },

    /// The configured token cannot be sent as a header value.
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or client construction error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── API ─────────────────────────────────────────────────────────
    /// HTTP 404 for the requested resource.
    #[error("Resource not found: {path}")]
    NotFound { path: String },

    /// Any other non-2xx response.
    #[error("API error (HTTP {status}): {message}")]
    Api {
        status: u16,
        message: String,
        code: Option<String>,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` for a 401 that carried an authentication challenge.
    pub fn is_authentication_challenge(&self) -> bool {
        matches!(self, Self::AuthenticationChallenge { .. })
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            _ => false,
        }
    }

    /// HTTP status associated with this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::AuthenticationChallenge { .. } => Some(401),
            Self::NotFound { .. } => Some(404),
            Self::Api { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn challenge_reports_401() {
        let err = Error::AuthenticationChallenge {
            challenge: "LOGIN url=something.io login required".into(),
        };
        assert!(err.is_authentication_challenge());
        assert_eq!(err.status(), Some(401));
        assert!(!err.is_not_found());
    }

    #[test]
    fn status_follows_variant() {
        let err = Error::Api {
            status: 503,
            message: "unavailable".into(),
            code: None,
        };
        assert_eq!(err.status(), Some(503));

        let err = Error::NotFound {
            path: "/users/ghost".into(),
        };
        assert!(err.is_not_found());
        assert_eq!(err.status(), Some(404));

        assert_eq!(Error::Tls("bad pem".into()).status(), None);
    }
}
