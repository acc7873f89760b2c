#![allow(clippy::unwrap_used)]
// Integration tests for `UsersClient` using wiremock.

use secrecy::SecretString;
use serde_json::{Value, json};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use login_api::{Error, TransportConfig, UsersClient};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, UsersClient) {
    let server = MockServer::start().await;
    let client = UsersClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
    (server, client)
}

fn test_user() -> Value {
    json!({
        "attributes": {
            "fullName": "name",
            "imageURL": "",
            "username": "myUser"
        },
        "id": "userId",
        "type": "userType"
    })
}

fn test_users() -> Value {
    json!([
        test_user(),
        {
            "attributes": { "fullName": "secondUser", "imageURL": "", "username": "secondUser" },
            "id": "secondUserId",
            "type": "userType"
        },
        {
            "attributes": { "fullName": "thirdUser", "imageURL": "", "username": "thirdUser+1@redhat.com" },
            "id": "thirdUserId",
            "type": "userType"
        }
    ])
}

fn challenge_response() -> ResponseTemplate {
    ResponseTemplate::new(401)
        .insert_header("Www-Authenticate", "LOGIN url=something.io login required")
        .set_body_json(json!({ "errors": [{ "code": "validation_error" }] }))
}

// ── Lookups ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_current_user() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "data": test_user() })))
        .mount(&server)
        .await;

    let user = client.current_user().await.unwrap();

    assert_eq!(user.id, "userId");
    assert_eq!(user.kind, "userType");
    assert_eq!(user.username(), "myUser");
}

#[tokio::test]
async fn test_user_by_id() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/users/userId"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": test_user() })))
        .mount(&server)
        .await;

    let user = client.user_by_id("userId").await.unwrap();

    assert_eq!(user.id, "userId");
}

#[tokio::test]
async fn test_users_by_username_encodes_email() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("filter[username]", "thirdUser+1@redhat.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": test_users() })))
        .expect(1)
        .mount(&server)
        .await;

    let users = client
        .users_by_username("thirdUser+1@redhat.com")
        .await
        .unwrap();
    assert_eq!(users.len(), 3);

    let requests = server.received_requests().await.unwrap();
    let query = requests[0].url.query().unwrap().to_owned();
    assert!(query.contains("%40"), "'@' not encoded in {query}");
    assert!(query.contains("%2B"), "'+' not encoded in {query}");
}

#[tokio::test]
async fn test_api_base_with_path() {
    let server = MockServer::start().await;
    let client = UsersClient::from_reqwest(
        &format!("{}/api", server.uri()),
        reqwest::Client::new(),
    )
    .unwrap();

    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": test_users() })))
        .mount(&server)
        .await;

    let users = client.list_users().await.unwrap();
    assert_eq!(users.len(), 3);
    assert_eq!(users[1].id, "secondUserId");
}

#[tokio::test]
async fn test_search_users() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/search/users"))
        .and(query_param("q", "second user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .mount(&server)
        .await;

    let users = client.search_users("second user").await.unwrap();
    assert!(users.is_empty());
}

#[tokio::test]
async fn test_send_email_verification_link() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/users/verifyemail"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client.send_email_verification_link().await.unwrap();
}

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let server = MockServer::start().await;
    let transport =
        TransportConfig::default().with_token(SecretString::from("tok-123".to_string()));
    let client = UsersClient::new(&server.uri(), &transport).unwrap();

    Mock::given(method("GET"))
        .and(path("/user"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": test_user() })))
        .expect(1)
        .mount(&server)
        .await;

    client.current_user().await.unwrap();
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_401_with_challenge() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(challenge_response())
        .mount(&server)
        .await;

    let result = client.user_by_id("userId").await;

    match result {
        Err(Error::AuthenticationChallenge { ref challenge }) => {
            assert_eq!(challenge, "LOGIN url=something.io login required");
        }
        other => panic!("expected AuthenticationChallenge, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_401_without_challenge_is_plain_api_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({ "errors": [{ "code": "unauthorized", "detail": "no token" }] })),
        )
        .mount(&server)
        .await;

    let result = client.current_user().await;

    match result {
        Err(Error::Api {
            status,
            ref message,
            ref code,
        }) => {
            assert_eq!(status, 401);
            assert_eq!(message, "no token");
            assert_eq!(code.as_deref(), Some("unauthorized"));
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client.user_by_id("missing").await.unwrap_err();
    assert!(err.is_not_found(), "expected not found, got: {err:?}");
}

#[tokio::test]
async fn test_server_error_body_preview() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream broke"))
        .mount(&server)
        .await;

    match client.list_users().await {
        Err(Error::Api {
            status, ref message, ..
        }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "upstream broke");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_envelope() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(test_user()))
        .mount(&server)
        .await;

    let result = client.current_user().await;
    assert!(
        matches!(result, Err(Error::Deserialization { .. })),
        "expected Deserialization error, got: {result:?}"
    );
}
