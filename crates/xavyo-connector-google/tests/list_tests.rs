//! List scans against a mock Directory API: filter pushdown, paging, row
//! limits and the per-table ignore rules.

mod common;

use common::*;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, ResponseTemplate};
use xavyo_connector::prelude::*;
use xavyo_connector_google::GoogleDirectoryPlugin;

#[tokio::test]
async fn test_users_default_to_my_customer() {
    let mock = MockDirectory::start().await;
    mock.mock_token_endpoint().await;

    Mock::given(method("GET"))
        .and(path(api_path("users")))
        .and(query_param("customer", "my_customer"))
        .and(query_param("maxResults", "500"))
        .and(query_param_is_missing("query"))
        .and(header("authorization", format!("Bearer {ACCESS_TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(create_list_response(
            "users",
            vec![create_test_user("1", "ada"), create_test_user("2", "grace")],
            None,
        )))
        .expect(1)
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

    result.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].get_str("primary_email"), Some("ada@example.com"));
    assert_eq!(rows[0].get_str("full_name"), Some("Test User ada"));
    assert_eq!(rows[1].get_str("customer_id"), Some("C0test"));
}

#[tokio::test]
async fn test_user_not_admin_filter_is_pushed_down() {
    let mock = MockDirectory::start().await;
    mock.mock_token_endpoint().await;

    Mock::given(method("GET"))
        .and(path(api_path("users")))
        .and(query_param("customer", "C0123"))
        .and(query_param("query", "givenName='Ada' isAdmin=false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(create_list_response(
            "users",
            vec![create_test_user("1", "ada")],
            None,
        )))
        .expect(1)
        .mount(&mock.server)
        .await;

    let ctx = QueryContext::new()
        .with_qual(Qualifier::equal("customer_id", "C0123"))
        .with_qual(Qualifier::not_equal("is_admin", true))
        .with_qual(Qualifier::equal("given_name", "Ada"));

    let plugin = GoogleDirectoryPlugin::new();
    let (rows, result) =
        collect_rows(&plugin, &mock.connection("workspace"), "googledirectory_user", &ctx).await;

    result.unwrap();
    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn test_users_follow_page_tokens() {
    let mock = MockDirectory::start().await;
    mock.mock_token_endpoint().await;

    Mock::given(method("GET"))
        .and(path(api_path("users")))
        .and(query_param_is_missing("pageToken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(create_list_response(
            "users",
            vec![create_test_user("1", "u1"), create_test_user("2", "u2")],
            Some("page-2"),
        )))
        .expect(1)
        .mount(&mock.server)
        .await;

    Mock::given(method("GET"))
        .and(path(api_path("users")))
        .and(query_param("pageToken", "page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(create_list_response(
            "users",
            vec![create_test_user("3", "u3")],
            None,
        )))
        .expect(1)
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

    result.unwrap();
    let ids: Vec<_> = rows.iter().filter_map(|r| r.get_str("id")).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
}

#[tokio::test]
async fn test_limit_caps_page_size_and_stops_paging() {
    let mock = MockDirectory::start().await;
    mock.mock_token_endpoint().await;

    Mock::given(method("GET"))
        .and(path(api_path("users")))
        .and(query_param("maxResults", "2"))
        .and(query_param_is_missing("pageToken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(create_list_response(
            "users",
            vec![create_test_user("1", "u1"), create_test_user("2", "u2")],
            Some("page-2"),
        )))
        .expect(1)
        .mount(&mock.server)
        .await;

    Mock::given(method("GET"))
        .and(path(api_path("users")))
        .and(query_param("pageToken", "page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(create_list_response(
            "users",
            vec![create_test_user("3", "u3")],
            None,
        )))
        .expect(0)
        .mount(&mock.server)
        .await;

    let plugin = GoogleDirectoryPlugin::new();
    let ctx = QueryContext::new().with_limit(2);
    let (rows, result) =
        collect_rows(&plugin, &mock.connection("workspace"), "googledirectory_user", &ctx).await;

    result.unwrap();
    assert_eq!(rows.len(), 2);
}

#[tokio::test]
async fn test_cancelled_scan_returns_no_rows() {
    let mock = MockDirectory::start().await;
    mock.mock_token_endpoint().await;

    Mock::given(method("GET"))
        .and(path(api_path("users")))
        .respond_with(ResponseTemplate::new(200).set_body_json(create_list_response(
            "users",
            vec![create_test_user("1", "u1")],
            None,
        )))
        .expect(0)
        .mount(&mock.server)
        .await;

    let token = CancellationToken::new();
    token.cancel();
    let ctx = QueryContext::new().with_cancellation(token);

    let plugin = GoogleDirectoryPlugin::new();
    let (rows, result) =
        collect_rows(&plugin, &mock.connection("workspace"), "googledirectory_user", &ctx).await;

    result.unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_groups_default_query_matches_all() {
    let mock = MockDirectory::start().await;
    mock.mock_token_endpoint().await;

    Mock::given(method("GET"))
        .and(path(api_path("groups")))
        .and(query_param("customer", "my_customer"))
        .and(query_param("query", "name:**"))
        .and(query_param("maxResults", "200"))
        .respond_with(ResponseTemplate::new(200).set_body_json(create_list_response(
            "groups",
            vec![create_test_group("g1", "Engineering")],
            None,
        )))
        .expect(1)
        .mount(&mock.server)
        .await;

    let plugin = GoogleDirectoryPlugin::new();
    let (rows, result) = collect_rows(
        &plugin,
        &mock.connection("workspace"),
        "googledirectory_group",
        &QueryContext::new(),
    )
    .await;

    result.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("direct_members_count"), Some(&json!(2)));
    assert_eq!(rows[0].get("customer_id"), Some(&serde_json::Value::Null));
}

#[tokio::test]
async fn test_allow_listed_not_found_yields_no_rows() {
    let mock = MockDirectory::start().await;
    mock.mock_token_endpoint().await;
    mock.mock_error("groups", 404, "Domain not found.", "notFound").await;

    let plugin = GoogleDirectoryPlugin::new();
    let (rows, result) = collect_rows(
        &plugin,
        &mock.connection("workspace"),
        "googledirectory_group",
        &QueryContext::new(),
    )
    .await;

    result.unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_not_found_outside_allow_list_propagates() {
    let mock = MockDirectory::start().await;
    mock.mock_token_endpoint().await;
    mock.mock_error(
        "customer/my_customer/roleassignments",
        404,
        "Resource Not Found: roleId",
        "notFound",
    )
    .await;

    let plugin = GoogleDirectoryPlugin::new();
    let (rows, result) = collect_rows(
        &plugin,
        &mock.connection("workspace"),
        "googledirectory_role_assignment",
        &QueryContext::new(),
    )
    .await;

    assert!(rows.is_empty());
    let err = result.unwrap_err();
    assert_eq!(err.upstream_status(), Some(404));
    match err {
        ConnectorError::Upstream { reason, .. } => assert_eq!(reason.as_deref(), Some("notFound")),
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn test_privileges_ignore_disabled_api() {
    let mock = MockDirectory::start().await;
    mock.mock_token_endpoint().await;
    mock.mock_error(
        "customer/my_customer/roles/ALL/privileges",
        403,
        "Admin SDK API has not been used in project 123456789 before or it is disabled. Enable it by visiting the console.",
        "accessNotConfigured",
    )
    .await;

    let plugin = GoogleDirectoryPlugin::new();
    let (rows, result) = collect_rows(
        &plugin,
        &mock.connection("workspace"),
        "googledirectory_privilege",
        &QueryContext::new(),
    )
    .await;

    result.unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_privileges_permission_denied_propagates() {
    let mock = MockDirectory::start().await;
    mock.mock_token_endpoint().await;
    mock.mock_error(
        "customer/my_customer/roles/ALL/privileges",
        403,
        "Not Authorized to access this resource/api",
        "forbidden",
    )
    .await;

    let plugin = GoogleDirectoryPlugin::new();
    let (_, result) = collect_rows(
        &plugin,
        &mock.connection("workspace"),
        "googledirectory_privilege",
        &QueryContext::new(),
    )
    .await;

    assert_eq!(result.unwrap_err().upstream_status(), Some(403));
}

#[tokio::test]
async fn test_rows_before_failure_are_kept() {
    let mock = MockDirectory::start().await;
    mock.mock_token_endpoint().await;

    Mock::given(method("GET"))
        .and(path(api_path("customer/my_customer/devices/mobile")))
        .and(query_param_is_missing("pageToken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(create_list_response(
            "mobiledevices",
            vec![json!({"resourceId": "r1", "type": "ANDROID"})],
            Some("next"),
        )))
        .mount(&mock.server)
        .await;

    Mock::given(method("GET"))
        .and(path(api_path("customer/my_customer/devices/mobile")))
        .and(query_param("pageToken", "next"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(create_api_error(500, "Backend Error", "backendError")),
        )
        .mount(&mock.server)
        .await;

    let plugin = GoogleDirectoryPlugin::new();
    let (rows, result) = collect_rows(
        &plugin,
        &mock.connection("workspace"),
        "googledirectory_mobile_device",
        &QueryContext::new(),
    )
    .await;

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get_str("resource_id"), Some("r1"));
    assert_eq!(result.unwrap_err().upstream_status(), Some(500));
}

#[tokio::test]
async fn test_org_units_list_all_and_domain_timestamps() {
    let mock = MockDirectory::start().await;
    mock.mock_token_endpoint().await;

    Mock::given(method("GET"))
        .and(path(api_path("customer/C01/orgunits")))
        .and(query_param("type", "all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "organizationUnits": [
                {"name": "Sales", "orgUnitPath": "/Sales", "orgUnitId": "id:1"},
                {"name": "EMEA", "orgUnitPath": "/Sales/EMEA", "orgUnitId": "id:2", "parentOrgUnitPath": "/Sales"}
            ]
        })))
        .expect(1)
        .mount(&mock.server)
        .await;

    mock.mock_get(
        "customer/my_customer/domains",
        json!({"domains": [{"domainName": "example.com", "creationTime": "1600000000000", "isPrimary": true}]}),
    )
    .await;

    let plugin = GoogleDirectoryPlugin::new();
    let connection = mock.connection("workspace");

    let ctx = QueryContext::new().with_qual(Qualifier::equal("customer_id", "C01"));
    let (units, result) = collect_rows(&plugin, &connection, "googledirectory_org_unit", &ctx).await;
    result.unwrap();
    assert_eq!(units.len(), 2);
    assert_eq!(units[1].get_str("parent_org_unit_path"), Some("/Sales"));
    assert_eq!(units[1].get_str("customer_id"), Some("C01"));

    let (domains, result) =
        collect_rows(&plugin, &connection, "googledirectory_domain", &QueryContext::new()).await;
    result.unwrap();
    assert_eq!(domains[0].get_str("creation_time"), Some("2020-09-13T12:26:40+00:00"));
}

#[tokio::test]
async fn test_role_assignment_filters() {
    let mock = MockDirectory::start().await;
    mock.mock_token_endpoint().await;

    Mock::given(method("GET"))
        .and(path(api_path("customer/my_customer/roleassignments")))
        .and(query_param("roleId", "9170516996784129"))
        .and(query_param("userKey", "ada@example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"roleAssignmentId": "77", "roleId": "9170516996784129", "assignedTo": "1001", "scopeType": "CUSTOMER"}]
        })))
        .expect(1)
        .mount(&mock.server)
        .await;

    let ctx = QueryContext::new()
        .with_qual(Qualifier::equal("role_id", "9170516996784129"))
        .with_qual(Qualifier::equal("user_key", "ada@example.com"));

    let plugin = GoogleDirectoryPlugin::new();
    let (rows, result) = collect_rows(
        &plugin,
        &mock.connection("workspace"),
        "googledirectory_role_assignment",
        &ctx,
    )
    .await;

    result.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get_str("user_key"), Some("ada@example.com"));
    assert_eq!(rows[0].get_str("role_assignment_id"), Some("77"));
}
