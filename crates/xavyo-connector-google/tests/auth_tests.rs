//! Credential resolution, token caching and per-connection client reuse.

mod common;

use common::*;
use serde_json::json;
use std::io::Write;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, ResponseTemplate};
use xavyo_connector::prelude::*;
use xavyo_connector_google::GoogleDirectoryPlugin;

fn empty_users() -> serde_json::Value {
    create_list_response("users", vec![], None)
}

#[tokio::test]
async fn test_service_account_assertion_grant() {
    let mock = MockDirectory::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Ajwt-bearer"))
        .and(body_string_contains("assertion="))
        .respond_with(ResponseTemplate::new(200).set_body_json(create_token_response(ACCESS_TOKEN, 3600)))
        .expect(1)
        .mount(&mock.server)
        .await;

    Mock::given(method("GET"))
        .and(path(api_path("users")))
        .and(header("authorization", format!("Bearer {ACCESS_TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty_users()))
        .expect(1)
        .mount(&mock.server)
        .await;

    let plugin = GoogleDirectoryPlugin::new();
    let (_, result) = collect_rows(
        &plugin,
        &mock.connection("workspace"),
        "googledirectory_user",
        &QueryContext::new(),
    )
    .await;
    result.unwrap();
}

#[tokio::test]
async fn test_client_and_token_reused_across_scans() {
    let mock = MockDirectory::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(create_token_response(ACCESS_TOKEN, 3600)))
        .expect(1)
        .mount(&mock.server)
        .await;
    mock.mock_get("users", empty_users()).await;
    mock.mock_get("groups", create_list_response("groups", vec![], None))
        .await;

    let plugin = GoogleDirectoryPlugin::new();
    let connection = mock.connection("workspace");

    for table in ["googledirectory_user", "googledirectory_group", "googledirectory_user"] {
        let (_, result) = collect_rows(&plugin, &connection, table, &QueryContext::new()).await;
        result.unwrap();
    }

    assert_eq!(plugin.services().builds(), 1);
}

#[tokio::test]
async fn test_connections_get_separate_clients() {
    let mock = MockDirectory::start().await;
    mock.mock_token_endpoint().await;
    mock.mock_get("users", empty_users()).await;

    let plugin = GoogleDirectoryPlugin::new();
    for name in ["primary", "secondary"] {
        let (_, result) = collect_rows(
            &plugin,
            &mock.connection(name),
            "googledirectory_user",
            &QueryContext::new(),
        )
        .await;
        result.unwrap();
    }

    assert_eq!(plugin.services().builds(), 2);
    assert_eq!(mock.requests_to("/token").await, 2);
}

#[tokio::test]
async fn test_unauthorized_response_drops_cached_token() {
    let mock = MockDirectory::start().await;
    mock.mock_token_endpoint().await;

    Mock::given(method("GET"))
        .and(path(api_path("users")))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(create_api_error(401, "Invalid Credentials", "authError")),
        )
        .up_to_n_times(1)
        .mount(&mock.server)
        .await;
    mock.mock_get("users", empty_users()).await;

    let plugin = GoogleDirectoryPlugin::new();
    let connection = mock.connection("workspace");

    let (_, first) =
        collect_rows(&plugin, &connection, "googledirectory_user", &QueryContext::new()).await;
    assert_eq!(first.unwrap_err().upstream_status(), Some(401));

    let (_, second) =
        collect_rows(&plugin, &connection, "googledirectory_user", &QueryContext::new()).await;
    second.unwrap();

    assert_eq!(mock.requests_to("/token").await, 2);
    assert_eq!(plugin.services().builds(), 1);
}

#[tokio::test]
async fn test_authorized_user_token_file() {
    let mock = MockDirectory::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=test-refresh-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(create_token_response(ACCESS_TOKEN, 3600)))
        .expect(1)
        .mount(&mock.server)
        .await;
    mock.mock_get("users", empty_users()).await;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    let credentials = json!({
        "type": "authorized_user",
        "client_id": "client.apps.googleusercontent.com",
        "client_secret": "test-secret",
        "refresh_token": "test-refresh-token",
        "token_uri": mock.token_uri()
    });
    write!(file, "{credentials}").unwrap();

    let connection = Connection::new(
        "oauth",
        json!({
            "token_path": file.path().to_string_lossy(),
            "base_url": mock.base_url()
        }),
    );

    let plugin = GoogleDirectoryPlugin::new();
    let (_, result) =
        collect_rows(&plugin, &connection, "googledirectory_user", &QueryContext::new()).await;
    result.unwrap();
}

#[tokio::test]
async fn test_rejected_grant_is_configuration_error() {
    let mock = MockDirectory::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "unauthorized_client",
            "error_description": "Client is unauthorized to retrieve access tokens using this method."
        })))
        .mount(&mock.server)
        .await;

    let plugin = GoogleDirectoryPlugin::new();
    let (rows, result) = collect_rows(
        &plugin,
        &mock.connection("workspace"),
        "googledirectory_user",
        &QueryContext::new(),
    )
    .await;

    assert!(rows.is_empty());
    let err = result.unwrap_err();
    assert!(err.is_configuration(), "{err:?}");
    assert!(err.to_string().contains("unauthorized_client"));
}

#[tokio::test]
async fn test_missing_subject_is_rejected_before_any_call() {
    let mock = MockDirectory::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(create_token_response(ACCESS_TOKEN, 3600)))
        .expect(0)
        .mount(&mock.server)
        .await;

    let connection = Connection::new(
        "workspace",
        json!({
            "credentials": mock.service_account_key(),
            "base_url": mock.base_url()
        }),
    );

    let plugin = GoogleDirectoryPlugin::new();
    let (_, result) =
        collect_rows(&plugin, &connection, "googledirectory_user", &QueryContext::new()).await;

    let err = result.unwrap_err();
    assert!(err.is_configuration());
    assert!(err.to_string().contains("impersonated_user_email"));
}

#[tokio::test]
async fn test_concurrent_first_scans_share_client_and_token() {
    let mock = MockDirectory::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(create_token_response(ACCESS_TOKEN, 3600)))
        .expect(1)
        .mount(&mock.server)
        .await;
    mock.mock_get("users", empty_users()).await;
    mock.mock_get("groups", create_list_response("groups", vec![], None))
        .await;

    let plugin = GoogleDirectoryPlugin::new();
    let connection = mock.connection("workspace");
    let ctx = QueryContext::new();

    let (users, groups, more_users) = tokio::join!(
        collect_rows(&plugin, &connection, "googledirectory_user", &ctx),
        collect_rows(&plugin, &connection, "googledirectory_group", &ctx),
        collect_rows(&plugin, &connection, "googledirectory_user", &ctx),
    );
    users.1.unwrap();
    groups.1.unwrap();
    more_users.1.unwrap();

    assert_eq!(plugin.services().builds(), 1);
}
