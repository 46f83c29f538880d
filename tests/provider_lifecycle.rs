//! End-to-end provider tests against a mocked Akeneo API.

use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use terraform_provider_akeneo::server::{handle_line, Response};
use terraform_provider_akeneo::testing::{
    assert_error_contains, assert_no_errors, assert_plan_creates, assert_plan_replaces,
    ProviderTester,
};
use terraform_provider_akeneo::{AkeneoProvider, ProviderService};

async fn akeneo() -> MockServer {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/oauth/v1/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "token-abc",
            "expires_in": 3600,
            "token_type": "bearer",
            "refresh_token": "refresh"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    mock_server
}

fn provider_config(mock_server: &MockServer) -> serde_json::Value {
    json!({
        "host": mock_server.address().to_string(),
        "unsecure_api": true,
        "api_username": "admin",
        "api_password": "admin",
        "api_client_id": "client",
        "api_client_secret": "secret"
    })
}

#[tokio::test]
async fn test_attribute_and_option_lifecycle() {
    let mock_server = akeneo().await;

    Mock::given(method("POST"))
        .and(path("/api/rest/v1/attributes"))
        .and(header("Authorization", "Bearer token-abc"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/rest/v1/attributes/color"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "color",
            "type": "pim_catalog_simpleselect",
            "group": "marketing",
            "localizable": false,
            "scopable": false,
            "unique": false,
            "sort_order": 0,
            "labels": {"en_US": "Color"}
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/rest/v1/attributes/color/options"))
        .and(body_json(json!({
            "code": "red",
            "attribute": "color",
            "labels": {"en_US": "Red"}
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/rest/v1/attributes/color/options/red"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "red",
            "attribute": "color",
            "sort_order": 2,
            "labels": {"en_US": "Red"}
        })))
        .mount(&mock_server)
        .await;

    let tester = ProviderTester::new(AkeneoProvider::new());
    assert_ok!(
        tester
            .validate_provider_config(provider_config(&mock_server))
            .await
    );
    assert_ok!(tester.configure(provider_config(&mock_server)).await);

    let attribute = json!({
        "code": "color",
        "type": "pim_catalog_simpleselect",
        "group": "marketing",
        "labels": {"en_US": "Color"}
    });
    assert_ok!(
        tester
            .validate_resource_config("akeneo_attribute", attribute.clone())
            .await
    );
    let plan = assert_ok!(tester.plan_create("akeneo_attribute", attribute.clone()).await);
    assert_plan_creates(&plan);

    let state = assert_ok!(tester.lifecycle_create("akeneo_attribute", attribute).await);
    assert_eq!(state["type"], "pim_catalog_simpleselect");
    assert_eq!(state["labels"]["en_US"], "Color");

    let option = assert_ok!(
        tester
            .lifecycle_create(
                "akeneo_attribute_option",
                json!({"attribute": "color", "code": "red", "labels": {"en_US": "Red"}}),
            )
            .await
    );
    assert_eq!(option["sort_order"], 2);

    let plan = assert_ok!(
        tester
            .plan_update(
                "akeneo_attribute_option",
                option.clone(),
                json!({"attribute": "size", "code": "red", "labels": {"en_US": "Red"}, "sort_order": 2}),
            )
            .await
    );
    assert_plan_replaces(&plan);

    let imported = assert_ok!(tester.lifecycle_import("akeneo_attribute_option", "color/red").await);
    assert_eq!(imported, option);

    let upgraded = assert_ok!(
        tester
            .upgrade_resource_state("akeneo_attribute_option", 0, option.clone())
            .await
    );
    assert_eq!(upgraded, option);
    assert_err!(
        tester
            .upgrade_resource_state("akeneo_attribute_option", 3, option)
            .await
    );

    let err = assert_err!(tester.lifecycle_delete("akeneo_attribute", state.clone()).await);
    assert_error_contains(&err.into_diagnostics(), "does not support deletes");

    assert_ok!(tester.stop().await);
    let err = assert_err!(tester.read("akeneo_attribute", state).await);
    assert_error_contains(&err.into_diagnostics(), "Provider not configured correctly");
}

#[tokio::test]
async fn test_unknown_attribute_type_only_warns() {
    let mock_server = akeneo().await;
    let provider = AkeneoProvider::new();
    assert_ok!(provider.configure(provider_config(&mock_server)).await);

    let diagnostics = assert_ok!(
        provider
            .validate_resource_config(
                "akeneo_attribute",
                json!({"code": "rating", "type": "vendor_rating", "group": "other"}),
            )
            .await
    );
    assert_no_errors(&diagnostics);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].attribute.as_deref(), Some("type"));
}

#[tokio::test]
async fn test_wire_protocol_round_trip() {
    let mock_server = akeneo().await;

    Mock::given(method("GET"))
        .and(path("/api/rest/v1/channels/ecommerce"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "ecommerce",
            "locales": ["en_US", "fr_FR"],
            "currencies": ["EUR"],
            "category_tree": "master",
            "conversion_units": {},
            "labels": {"en_US": "Ecommerce"}
        })))
        .mount(&mock_server)
        .await;

    let provider = AkeneoProvider::new();

    let configure = json!({
        "id": 1,
        "method": "configure",
        "params": {"config": provider_config(&mock_server)}
    });
    let response: Response = handle_line(&provider, &configure.to_string()).await;
    assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);

    let read = json!({
        "id": 2,
        "method": "read",
        "params": {
            "resource_type": "akeneo_channel",
            "current_state": {"code": "ecommerce"}
        }
    });
    let response = handle_line(&provider, &read.to_string()).await;
    assert_eq!(response.id, json!(2));
    assert_eq!(response.result["locales"], json!(["en_US", "fr_FR"]));
    assert!(response.result["conversion_units"].is_null());

    let response = handle_line(
        &provider,
        r#"{"id": 3, "method": "import_resource_state", "params": {"resource_type": "akeneo_family_variant", "id": "shoes"}}"#,
    )
    .await;
    assert_eq!(response.diagnostics[0].summary, "Unexpected Import Identifier");

    let metadata = provider.metadata();
    assert_eq!(metadata.version, env!("CARGO_PKG_VERSION"));
}
