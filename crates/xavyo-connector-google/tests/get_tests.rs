//! Single-row lookups against a mock Directory API.

mod common;

use common::*;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};
use xavyo_connector::prelude::*;
use xavyo_connector_google::GoogleDirectoryPlugin;

#[tokio::test]
async fn test_get_user_by_primary_email() {
    let mock = MockDirectory::start().await;
    mock.mock_token_endpoint().await;
    mock.mock_get("users/ada@example.com", create_test_user("1", "ada"))
        .await;

    let ctx = QueryContext::new().with_qual(Qualifier::equal("primary_email", "ada@example.com"));
    let plugin = GoogleDirectoryPlugin::new();
    let row = plugin
        .get(&mock.connection("workspace"), "googledirectory_user", &ctx)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(row.get_str("id"), Some("1"));
    assert_eq!(row.get_str("primary_email"), Some("ada@example.com"));
}

#[tokio::test]
async fn test_blank_key_makes_no_calls() {
    let mock = MockDirectory::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(create_token_response(ACCESS_TOKEN, 3600)))
        .expect(0)
        .mount(&mock.server)
        .await;

    let ctx = QueryContext::new().with_qual(Qualifier::equal("id", "  "));
    let plugin = GoogleDirectoryPlugin::new();
    let row = plugin
        .get(&mock.connection("workspace"), "googledirectory_group", &ctx)
        .await
        .unwrap();

    assert!(row.is_none());
    assert_eq!(plugin.services().builds(), 0);
}

#[tokio::test]
async fn test_get_not_found_is_surfaced() {
    let mock = MockDirectory::start().await;
    mock.mock_token_endpoint().await;
    mock.mock_error("groups/nope@example.com", 404, "Resource Not Found: groupKey", "notFound")
        .await;

    let ctx = QueryContext::new().with_qual(Qualifier::equal("email", "nope@example.com"));
    let plugin = GoogleDirectoryPlugin::new();
    let err = plugin
        .get(&mock.connection("workspace"), "googledirectory_group", &ctx)
        .await
        .unwrap_err();

    assert_eq!(err.upstream_status(), Some(404));
}

#[tokio::test]
async fn test_get_org_unit_by_nested_path() {
    let mock = MockDirectory::start().await;
    mock.mock_token_endpoint().await;
    mock.mock_get(
        "customer/my_customer/orgunits/Sales/EMEA",
        json!({"name": "EMEA", "orgUnitPath": "/Sales/EMEA", "orgUnitId": "id:2"}),
    )
    .await;

    let ctx = QueryContext::new().with_qual(Qualifier::equal("org_unit_path", "/Sales/EMEA"));
    let plugin = GoogleDirectoryPlugin::new();
    let row = plugin
        .get(&mock.connection("workspace"), "googledirectory_org_unit", &ctx)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(row.get_str("org_unit_id"), Some("id:2"));
}

#[tokio::test]
async fn test_get_role_under_qualified_customer() {
    let mock = MockDirectory::start().await;
    mock.mock_token_endpoint().await;
    mock.mock_get(
        "customer/C0abc/roles/9170516996784129",
        json!({"roleId": "9170516996784129", "roleName": "_HELP_DESK_ADMIN_ROLE", "isSystemRole": true}),
    )
    .await;

    let ctx = QueryContext::new()
        .with_qual(Qualifier::equal("customer_id", "C0abc"))
        .with_qual(Qualifier::equal("role_id", "9170516996784129"));
    let plugin = GoogleDirectoryPlugin::new();
    let row = plugin
        .get(&mock.connection("workspace"), "googledirectory_role", &ctx)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(row.get_str("role_name"), Some("_HELP_DESK_ADMIN_ROLE"));
    assert_eq!(row.get_str("customer_id"), Some("C0abc"));
}

#[tokio::test]
async fn test_get_root_org_unit_path_is_absent() {
    let mock = MockDirectory::start().await;
    mock.mock_token_endpoint().await;

    Mock::given(method("GET"))
        .and(path(api_path("customer/my_customer/orgunits")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "kind": "admin#directory#orgUnits",
            "organizationUnits": [{"name": "Sales", "orgUnitPath": "/Sales"}]
        })))
        .expect(0)
        .mount(&mock.server)
        .await;

    let ctx = QueryContext::new().with_qual(Qualifier::equal("org_unit_path", "/"));
    let plugin = GoogleDirectoryPlugin::new();
    let row = plugin
        .get(&mock.connection("workspace"), "googledirectory_org_unit", &ctx)
        .await
        .unwrap();

    assert!(row.is_none());
}
