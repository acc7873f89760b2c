// Users API HTTP client
//
// Wraps `reqwest::Client` with base-URL normalization, envelope
// unwrapping, and status mapping. 401 responses that carry an
// authentication challenge surface as their own error variant so the
// service layer can broadcast them.

use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::auth::authentication_challenge;
use crate::error::Error;
use crate::models::{DataEnvelope, ErrorBody, User};
use crate::transport::TransportConfig;

const BODY_PREVIEW_CHARS: usize = 200;

/// Async client for the identity service's user endpoints.
///
/// All methods return the unwrapped `data` payload -- the `{ data }`
/// envelope is stripped before the caller sees it.
#[derive(Debug, Clone)]
pub struct UsersClient {
    http: reqwest::Client,
    base_url: Url,
}

impl UsersClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client from the API base URL and a transport config.
    ///
    /// The base URL may or may not carry a path (`http://example.com`,
    /// `https://host/api/`); endpoint paths are joined beneath it.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Ensure the base path ends with `/` so relative joins nest under it.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        url.set_query(None);
        Ok(url)
    }

    /// The normalized API base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    /// `{base}users/{id}` with `id` pushed as an encoded path segment.
    fn user_url(&self, id: &str) -> Result<Url, Error> {
        let mut url = self.url("users")?;
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .push(id);
        Ok(url)
    }

    /// Append form-encoded query pairs (`@` → `%40`, `+` → `%2B`).
    fn with_query(mut url: Url, pairs: &[(&str, &str)]) -> Url {
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in pairs {
                query.append_pair(key, value);
            }
        }
        url
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// `GET {base}user` -- the user the bearer token belongs to.
    pub async fn current_user(&self) -> Result<User, Error> {
        self.get(self.url("user")?).await
    }

    /// `GET {base}users/{id}`.
    pub async fn user_by_id(&self, id: &str) -> Result<User, Error> {
        self.get(self.user_url(id)?).await
    }

    /// `GET {base}users?filter[username]={username}`.
    ///
    /// The server filter is advisory; callers still match exactly.
    pub async fn users_by_username(&self, username: &str) -> Result<Vec<User>, Error> {
        let url = Self::with_query(self.url("users")?, &[("filter[username]", username)]);
        self.get(url).await
    }

    /// `GET {base}users`.
    pub async fn list_users(&self) -> Result<Vec<User>, Error> {
        self.get(self.url("users")?).await
    }

    /// `GET {base}search/users?q={query}`.
    pub async fn search_users(&self, query: &str) -> Result<Vec<User>, Error> {
        let url = Self::with_query(self.url("search/users")?, &[("q", query)]);
        self.get(url).await
    }

    /// `POST {base}users/verifyemail` -- ask the server to mail a fresh
    /// verification link to the current user.
    pub async fn send_email_verification_link(&self) -> Result<(), Error> {
        let url = self.url("users/verifyemail")?;
        debug!("POST {url}");

        let resp = self.http.post(url).send().await?;
        Self::check_status(resp).await?;
        Ok(())
    }

    // ── Request helpers ──────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        let resp = Self::check_status(resp).await?;
        Self::parse_envelope(resp).await
    }

    /// Map non-2xx responses into errors, passing successful ones through.
    async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            if let Some(challenge) = authentication_challenge(resp.headers()) {
                debug!(%challenge, "authentication challenge");
                return Err(Error::AuthenticationChallenge { challenge });
            }
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::NotFound {
                path: resp.url().path().to_owned(),
            });
        }

        let body = resp.text().await.unwrap_or_default();
        let (message, code) = describe_failure(&body);
        Err(Error::Api {
            status: status.as_u16(),
            message,
            code,
        })
    }

    /// Parse the `{ data }` envelope, returning `data`.
    async fn parse_envelope<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let body = resp.text().await?;

        let envelope: DataEnvelope<T> =
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                message: format!("{e} (body preview: {:?})", preview(&body)),
                body: body.clone(),
            })?;

        Ok(envelope.data)
    }
}

/// Pull a message and code out of an error body, falling back to a
/// preview of the raw text.
fn describe_failure(body: &str) -> (String, Option<String>) {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        if let Some(first) = parsed.errors.into_iter().next() {
            let message = first
                .detail
                .or(first.title)
                .or_else(|| first.code.clone())
                .unwrap_or_default();
            return (message, first.code);
        }
    }
    (preview(body), None)
}

fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> UsersClient {
        UsersClient::from_reqwest(base, reqwest::Client::new()).unwrap()
    }

    #[test]
    fn base_url_gains_trailing_slash() {
        assert_eq!(client("http://example.com").base_url().as_str(), "http://example.com/");
        assert_eq!(
            client("https://api.example.com/api").base_url().as_str(),
            "https://api.example.com/api/"
        );
        assert_eq!(
            client("https://api.example.com/api/").base_url().as_str(),
            "https://api.example.com/api/"
        );
    }

    #[test]
    fn user_url_encodes_segment() {
        let c = client("http://example.com/api");
        assert_eq!(
            c.user_url("userId").unwrap().as_str(),
            "http://example.com/api/users/userId"
        );
        assert_eq!(
            c.user_url("a/b c").unwrap().as_str(),
            "http://example.com/api/users/a%2Fb%20c"
        );
    }

    #[test]
    fn username_query_is_percent_encoded() {
        let c = client("http://example.com");
        let url = UsersClient::with_query(
            c.url("users").unwrap(),
            &[("filter[username]", "thirdUser+1@redhat.com")],
        );
        let query = url.query().unwrap();
        assert!(query.contains("thirdUser%2B1%40redhat.com"), "got {query}");
    }

    #[test]
    fn failure_body_prefers_detail() {
        let (message, code) =
            describe_failure(r#"{"errors":[{"code":"validation_error","detail":"bad id"}]}"#);
        assert_eq!(message, "bad id");
        assert_eq!(code.as_deref(), Some("validation_error"));
    }

    #[test]
    fn failure_body_falls_back_to_code_then_text() {
        let (message, code) = describe_failure(r#"{"errors":[{"code":"validation_error"}]}"#);
        assert_eq!(message, "validation_error");
        assert_eq!(code.as_deref(), Some("validation_error"));

        let (message, code) = describe_failure("gateway exploded");
        assert_eq!(message, "gateway exploded");
        assert!(code.is_none());
    }

    #[test]
    fn preview_respects_char_boundaries() {
        let long = "é".repeat(300);
        assert_eq!(preview(&long).chars().count(), BODY_PREVIEW_CHARS);
    }
}
