// ── Core error types ──
//
// Service-level errors. Consumers never match on HTTP plumbing directly;
// the `From<login_api::Error>` impl folds transport failures into
// domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Authentication ───────────────────────────────────────────────
    /// The API demanded re-authentication. An `authenticationError`
    /// event has already been published when this is returned.
    #[error("Authentication failed: {challenge}")]
    AuthenticationFailed { challenge: String },

    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to identity API at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    Timeout,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("User not found: {identifier}")]
    UserNotFound { identifier: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Returns `true` if this error came from an authentication challenge.
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::AuthenticationFailed { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<login_api::Error> for CoreError {
    fn from(err: login_api::Error) -> Self {
        match err {
            login_api::Error::AuthenticationChallenge { challenge } => {
                CoreError::AuthenticationFailed { challenge }
            }
            login_api::Error::InvalidToken(message) => CoreError::Config { message },
            login_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e.url().map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            login_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            login_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            login_api::Error::NotFound { path } => CoreError::UserNotFound { identifier: path },
            login_api::Error::Api {
                status, message, ..
            } => CoreError::Api {
                message,
                status: Some(status),
            },
            login_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CoreError;

    #[test]
    fn challenge_maps_to_authentication_failed() {
        let err = CoreError::from(login_api::Error::AuthenticationChallenge {
            challenge: "LOGIN".into(),
        });
        assert!(err.is_authentication());
    }

    #[test]
    fn api_status_is_kept() {
        let err = CoreError::from(login_api::Error::Api {
            status: 500,
            message: "boom".into(),
            code: None,
        });
        assert!(matches!(err, CoreError::Api { status: Some(500), .. }));
        assert!(!err.is_authentication());
    }
}
