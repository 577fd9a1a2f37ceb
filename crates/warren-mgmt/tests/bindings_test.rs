//! Binding operations: creation, key discovery through listing, and
//! addressing by `properties_key`.

mod helpers;

use helpers::mock_broker::MockBroker;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use warren_mgmt::{BindingSettings, DestinationType};

fn listed(routing_key: &str, properties_key: &str, arguments: serde_json::Value) -> serde_json::Value {
    json!({
        "source": "events",
        "vhost": "/",
        "destination": "audit",
        "destination_type": "queue",
        "routing_key": routing_key,
        "arguments": arguments,
        "properties_key": properties_key
    })
}

#[tokio::test]
async fn create_posts_to_the_source_destination_path() {
    let broker = MockBroker::start().await;

    Mock::given(method("POST"))
        .and(path("/api/bindings/%2F/e/events/q/audit"))
        .and(body_json(json!({"routing_key": "user.created"})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(broker.server())
        .await;

    let settings = BindingSettings {
        routing_key: "user.created".into(),
        ..BindingSettings::default()
    };
    broker
        .client()
        .create_binding(
            &CancellationToken::new(),
            "/",
            "events",
            DestinationType::Queue,
            "audit",
            &settings,
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn exchange_destinations_use_the_e_segment() {
    let broker = MockBroker::start().await;

    Mock::given(method("POST"))
        .and(path("/api/bindings/%2F/e/events/e/mirror"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(broker.server())
        .await;

    broker
        .client()
        .create_binding(
            &CancellationToken::new(),
            "/",
            "events",
            DestinationType::Exchange,
            "mirror",
            &BindingSettings::default(),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn find_binding_matches_on_the_endpoint_tuple() {
    let broker = MockBroker::start().await;
    broker
        .mock_get_json(
            "/api/bindings/%2F",
            json!([
                listed("user.deleted", "user.deleted", json!({})),
                listed("user.created", "user.created", json!({})),
            ]),
        )
        .await;

    let binding = broker
        .client()
        .find_binding(
            &CancellationToken::new(),
            "/",
            "events",
            DestinationType::Queue,
            "audit",
            "user.created",
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(binding.properties_key.as_deref(), Some("user.created"));
}

#[tokio::test]
async fn find_binding_takes_the_first_of_duplicate_tuples() {
    let broker = MockBroker::start().await;
    broker
        .mock_get_json(
            "/api/bindings/%2F",
            json!([
                listed("user.created", "user.created~1", json!({"x-match": "all"})),
                listed("user.created", "user.created~2", json!({})),
            ]),
        )
        .await;

    let binding = broker
        .client()
        .find_binding(
            &CancellationToken::new(),
            "/",
            "events",
            DestinationType::Queue,
            "audit",
            "user.created",
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(binding.properties_key.as_deref(), Some("user.created~1"));
}

#[tokio::test]
async fn find_binding_reports_absence_as_none() {
    let broker = MockBroker::start().await;
    broker.mock_get_json("/api/bindings/%2F", json!([])).await;

    let binding = broker
        .client()
        .find_binding(
            &CancellationToken::new(),
            "/",
            "events",
            DestinationType::Queue,
            "audit",
            "user.created",
        )
        .await
        .unwrap();
    assert!(binding.is_none());
}

#[tokio::test]
async fn get_binding_addresses_by_properties_key() {
    let broker = MockBroker::start().await;
    broker
        .mock_get_json(
            "/api/bindings/%2F/e/events/q/audit/user.created",
            listed("user.created", "user.created", json!({})),
        )
        .await;

    let binding = broker
        .client()
        .get_binding(
            &CancellationToken::new(),
            "/",
            "events",
            DestinationType::Queue,
            "audit",
            "user.created",
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(binding.routing_key, "user.created");
}

#[tokio::test]
async fn hash_properties_keys_survive_encoding() {
    let broker = MockBroker::start().await;
    broker
        .mock_get_json(
            "/api/bindings/%2F/e/events/q/audit/%23",
            listed("#", "#", json!({})),
        )
        .await;

    let binding = broker
        .client()
        .get_binding(
            &CancellationToken::new(),
            "/",
            "events",
            DestinationType::Queue,
            "audit",
            "#",
        )
        .await
        .unwrap();
    assert!(binding.is_some());
}

#[tokio::test]
async fn vanished_bindings_read_as_none() {
    let broker = MockBroker::start().await;
    broker
        .mock_get_not_found("/api/bindings/%2F/e/events/q/audit/user.created")
        .await;

    let binding = broker
        .client()
        .get_binding(
            &CancellationToken::new(),
            "/",
            "events",
            DestinationType::Queue,
            "audit",
            "user.created",
        )
        .await
        .unwrap();
    assert!(binding.is_none());
}

#[tokio::test]
async fn delete_uses_the_full_address() {
    let broker = MockBroker::start().await;
    broker
        .mock_delete_no_content("/api/bindings/%2F/e/events/q/audit/user.created")
        .await;

    broker
        .client()
        .delete_binding(
            &CancellationToken::new(),
            "/",
            "events",
            DestinationType::Queue,
            "audit",
            "user.created",
        )
        .await
        .unwrap();
}
