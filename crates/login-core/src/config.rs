// ── Runtime service configuration ──
//
// Describes *how* to reach the identity API. Carries the token and
// connection tuning, but never touches disk. The CLI (or any embedder)
// builds a `ServiceConfig` and hands it in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed development servers).
    DangerAcceptInvalid,
}

/// Configuration for one identity API endpoint.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// API base URL (e.g., `https://api.example.com/api`).
    pub api_url: Url,
    /// Bearer token; lookups are anonymous without one.
    pub token: Option<SecretString>,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
}

impl ServiceConfig {
    /// Config with default TLS and timeout for the given API URL.
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url,
            token: None,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
        }
    }
}
