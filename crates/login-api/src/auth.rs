// Authentication helpers
//
// Bearer-token header construction for outgoing requests and challenge
// detection on 401 responses.

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue, WWW_AUTHENTICATE};
use secrecy::{ExposeSecret, SecretString};

use crate::error::Error;

/// Build the default headers carrying `Authorization: Bearer <token>`.
///
/// The header value is flagged sensitive so it never shows up in
/// reqwest's debug output.
pub(crate) fn bearer_headers(token: &SecretString) -> Result<HeaderMap, Error> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
        .map_err(|e| Error::InvalidToken(format!("invalid header value: {e}")))?;
    value.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, value);
    Ok(headers)
}

/// Extract the authentication challenge from response headers.
///
/// Header lookup is case-insensitive, so `Www-Authenticate` and
/// `WWW-Authenticate` both match. Returns `None` when the header is
/// absent or not valid UTF-8.
pub fn authentication_challenge(headers: &HeaderMap) -> Option<String> {
    headers
        .get(WWW_AUTHENTICATE)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}
