//! Provider construction and connection checking.

mod helpers;

use helpers::mock_broker::{broker_error, MockBroker};
use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{basic_auth, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_connection_reports_the_broker_version() {
    let broker = MockBroker::start().await;

    Mock::given(method("GET"))
        .and(path("/api/whoami"))
        .and(basic_auth("warren", "burrow"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({
                "name": "warren",
                "tags": "administrator"
            })),
        )
        .expect(1)
        .mount(broker.server())
        .await;
    broker
        .mock_get_json(
            "/api/overview",
            json!({
                "lavinmq_version": "2.3.0",
                "cluster_name": "warren@broker",
                "node": "warren@broker"
            }),
        )
        .await;

    let version = broker
        .provider()
        .test_connection(&CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(version, "2.3.0");
}

#[tokio::test]
async fn bad_credentials_surface_the_broker_reason() {
    let broker = MockBroker::start().await;

    Mock::given(method("GET"))
        .and(path("/api/whoami"))
        .respond_with(broker_error(401, "Unauthorized"))
        .mount(broker.server())
        .await;

    let err = broker
        .provider()
        .test_connection(&CancellationToken::new())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Unauthorized"));
}

#[test]
fn debug_output_redacts_the_password() {
    let config = warren_provider::ProviderConfig {
        endpoint: "http://localhost:15672".into(),
        username: "warren".into(),
        password: "burrow".into(),
        user_agent: None,
    };
    let rendered = format!("{config:?}");
    assert!(rendered.contains("***REDACTED***"));
    assert!(!rendered.contains("burrow"));
}
