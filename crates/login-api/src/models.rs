// Wire types for the users API
//
// Every successful response wraps its payload as `{ "data": ... }`.
// Failures may carry a JSON:API style `{ "errors": [...] }` body.

use serde::{Deserialize, Serialize};

/// A user record as served by the identity API.
///
/// Immutable once received; `id` is unique within a response set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    /// Resource type tag (`"identities"` on the live API).
    #[serde(rename = "type")]
    pub kind: String,
    pub attributes: UserAttributes,
}

impl User {
    /// Shorthand for `attributes.username`.
    pub fn username(&self) -> &str {
        &self.attributes.username
    }
}

/// Profile attributes of a [`User`].
///
/// Only `username` is guaranteed; the remaining fields are optional on
/// the wire and default when absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAttributes {
    #[serde(default)]
    pub full_name: String,
    #[serde(default, rename = "imageURL")]
    pub image_url: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_completed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_verified: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_private: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Success envelope: `{ "data": T }`.
#[derive(Debug, Deserialize)]
pub(crate) struct DataEnvelope<T> {
    pub data: T,
}

/// Failure body: `{ "errors": [{ "code": "...", "detail": "..." }] }`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub errors: Vec<ErrorEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEntry {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn user_uses_wire_field_names() {
        let raw = json!({
            "attributes": {
                "fullName": "name",
                "imageURL": "",
                "username": "myUser"
            },
            "id": "userId",
            "type": "userType"
        });

        let user: User = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(user.id, "userId");
        assert_eq!(user.kind, "userType");
        assert_eq!(user.username(), "myUser");
        assert_eq!(user.attributes.full_name, "name");

        // Optional attributes stay off the wire when absent.
        assert_eq!(serde_json::to_value(&user).unwrap(), raw);
    }

    #[test]
    fn optional_attributes_are_kept() {
        let user: User = serde_json::from_value(json!({
            "id": "u1",
            "type": "identities",
            "attributes": {
                "username": "jdoe",
                "email": "jdoe@example.com",
                "emailVerified": true,
                "registrationCompleted": false
            }
        }))
        .unwrap();

        assert_eq!(user.attributes.email.as_deref(), Some("jdoe@example.com"));
        assert_eq!(user.attributes.email_verified, Some(true));
        assert_eq!(user.attributes.registration_completed, Some(false));
        assert!(user.attributes.full_name.is_empty());
    }

    #[test]
    fn envelope_unwraps_lists() {
        let env: DataEnvelope<Vec<User>> = serde_json::from_value(json!({
            "data": [
                { "id": "a", "type": "t", "attributes": { "username": "a" } },
                { "id": "b", "type": "t", "attributes": { "username": "b" } }
            ]
        }))
        .unwrap();
        assert_eq!(env.data.len(), 2);
    }
}
