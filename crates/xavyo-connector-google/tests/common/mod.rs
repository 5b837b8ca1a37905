//! Common test utilities for xavyo-connector-google integration tests.

#![allow(dead_code)]

use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use xavyo_connector::prelude::*;

/// RSA key the mock service account signs its assertions with.
pub const TEST_KEY: &str = include_str!("../fixtures/test_rsa_key.pem");

/// Access token handed out by the mock token endpoint.
pub const ACCESS_TOKEN: &str = "mock-access-token";

/// Path prefix of the mock Directory API.
pub const API_ROOT: &str = "/admin/directory/v1";

/// Installs a test log subscriber honouring `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Full path of a Directory API resource.
pub fn api_path(rest: &str) -> String {
    format!("{API_ROOT}/{rest}")
}

/// Test data factory for a Directory user.
pub fn create_test_user(id: &str, email_prefix: &str) -> Value {
    json!({
        "kind": "admin#directory#user",
        "id": id,
        "primaryEmail": format!("{email_prefix}@example.com"),
        "name": {
            "fullName": format!("Test User {email_prefix}"),
            "givenName": "Test",
            "familyName": format!("User {email_prefix}")
        },
        "customerId": "C0test",
        "isAdmin": false,
        "isDelegatedAdmin": false,
        "suspended": false,
        "creationTime": "2021-03-04T10:00:00.000Z",
        "orgUnitPath": "/"
    })
}

/// Test data factory for a Directory group.
pub fn create_test_group(id: &str, name: &str) -> Value {
    json!({
        "kind": "admin#directory#group",
        "id": id,
        "email": format!("{}@example.com", name.to_lowercase()),
        "name": name,
        "directMembersCount": "2",
        "adminCreated": true
    })
}

/// Test data factory for a group member.
pub fn create_test_member(id: &str, email_prefix: &str, role: &str) -> Value {
    json!({
        "kind": "admin#directory#member",
        "id": id,
        "email": format!("{email_prefix}@example.com"),
        "role": role,
        "type": "USER",
        "status": "ACTIVE"
    })
}

/// Wraps items in a list response under `field`.
pub fn create_list_response(field: &str, items: Vec<Value>, next_page_token: Option<&str>) -> Value {
    let mut response = json!({});
    response[field] = json!(items);
    if let Some(token) = next_page_token {
        response["nextPageToken"] = json!(token);
    }
    response
}

/// Creates a Google API error envelope.
pub fn create_api_error(code: u16, message: &str, reason: &str) -> Value {
    json!({
        "error": {
            "code": code,
            "message": message,
            "errors": [{"message": message, "domain": "global", "reason": reason}]
        }
    })
}

/// Creates a mock OAuth token response.
pub fn create_token_response(access_token: &str, expires_in: u64) -> Value {
    json!({
        "access_token": access_token,
        "token_type": "Bearer",
        "expires_in": expires_in
    })
}

/// Mock Directory API and token endpoint on one server.
pub struct MockDirectory {
    pub server: MockServer,
}

impl MockDirectory {
    pub async fn start() -> Self {
        init_tracing();
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn base_url(&self) -> String {
        format!("{}{API_ROOT}", self.server.uri())
    }

    pub fn token_uri(&self) -> String {
        format!("{}/token", self.server.uri())
    }

    /// Service account key JSON whose token endpoint is the mock.
    pub fn service_account_key(&self) -> String {
        json!({
            "type": "service_account",
            "project_id": "test-project",
            "private_key_id": "test-key",
            "private_key": TEST_KEY,
            "client_email": "reader@test-project.iam.gserviceaccount.com",
            "client_id": "1234567890",
            "token_uri": self.token_uri()
        })
        .to_string()
    }

    /// Connection using inline service account credentials.
    pub fn connection(&self, name: &str) -> Connection {
        self.connection_with(name, json!({}))
    }

    /// Connection with extra configuration attributes merged in.
    pub fn connection_with(&self, name: &str, extra: Value) -> Connection {
        let mut config = json!({
            "credentials": self.service_account_key(),
            "impersonated_user_email": "admin@example.com",
            "base_url": self.base_url(),
            "timeout_secs": 5
        });
        if let (Some(config), Value::Object(extra)) = (config.as_object_mut(), extra) {
            config.extend(extra);
        }
        Connection::new(name, config)
    }

    /// Sets up the OAuth token endpoint.
    pub async fn mock_token_endpoint(&self) {
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(create_token_response(ACCESS_TOKEN, 3600)),
            )
            .mount(&self.server)
            .await;
    }

    /// Sets up a GET endpoint of the Directory API.
    pub async fn mock_get(&self, rest: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path(api_path(rest)))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Sets up a failing GET endpoint of the Directory API.
    pub async fn mock_error(&self, rest: &str, status: u16, message: &str, reason: &str) {
        Mock::given(method("GET"))
            .and(path(api_path(rest)))
            .respond_with(
                ResponseTemplate::new(status).set_body_json(create_api_error(status, message, reason)),
            )
            .mount(&self.server)
            .await;
    }

    /// Requests received for a path, token endpoint included.
    pub async fn requests_to(&self, full_path: &str) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.url.path() == full_path)
            .count()
    }
}
