//! Vhost, exchange and queue operations against a mock broker, with the
//! exact paths and bodies the management API expects.

mod helpers;

use helpers::mock_broker::MockBroker;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use warren_mgmt::{ExchangeSettings, QueueSettings};

#[tokio::test]
async fn default_vhost_is_percent_encoded_in_paths() {
    let broker = MockBroker::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/vhosts/%2F"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(broker.server())
        .await;

    broker
        .client()
        .upsert_vhost(&CancellationToken::new(), "/")
        .await
        .unwrap();
}

#[tokio::test]
async fn vhost_round_trip() {
    let broker = MockBroker::start().await;
    broker.mock_put_created("/api/vhosts/orders").await;
    broker
        .mock_get_json("/api/vhosts/orders", json!({"name": "orders"}))
        .await;
    broker.mock_delete_no_content("/api/vhosts/orders").await;

    let client = broker.client();
    let cancel = CancellationToken::new();

    client.upsert_vhost(&cancel, "orders").await.unwrap();
    let vhost = client.get_vhost(&cancel, "orders").await.unwrap().unwrap();
    assert_eq!(vhost.name, "orders");
    client.delete_vhost(&cancel, "orders").await.unwrap();
}

#[tokio::test]
async fn exchange_declare_sends_the_typed_body() {
    let broker = MockBroker::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/exchanges/%2F/events"))
        .and(body_json(json!({
            "type": "topic",
            "durable": true,
            "auto_delete": false,
            "internal": false
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(broker.server())
        .await;

    let settings = ExchangeSettings {
        kind: "topic".into(),
        ..ExchangeSettings::default()
    };
    broker
        .client()
        .upsert_exchange(&CancellationToken::new(), "/", "events", &settings)
        .await
        .unwrap();
}

#[tokio::test]
async fn exchange_read_decodes_the_full_document() {
    let broker = MockBroker::start().await;
    broker
        .mock_get_json(
            "/api/exchanges/%2F/events",
            json!({
                "name": "events",
                "vhost": "/",
                "type": "topic",
                "durable": true,
                "auto_delete": false,
                "internal": false,
                "arguments": {"alternate-exchange": "fallback"}
            }),
        )
        .await;

    let exchange = broker
        .client()
        .get_exchange(&CancellationToken::new(), "/", "events")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(exchange.kind, "topic");
    assert_eq!(exchange.arguments["alternate-exchange"], "fallback");
}

#[tokio::test]
async fn queue_declare_sends_arguments_when_present() {
    let broker = MockBroker::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/queues/%2F/jobs"))
        .and(body_json(json!({
            "durable": true,
            "auto_delete": false,
            "arguments": {"x-max-length": 10000}
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(broker.server())
        .await;

    let mut settings = QueueSettings::default();
    settings
        .arguments
        .insert("x-max-length".into(), json!(10000));
    broker
        .client()
        .upsert_queue(&CancellationToken::new(), "/", "jobs", &settings)
        .await
        .unwrap();
}

#[tokio::test]
async fn queue_names_with_slashes_stay_single_segments() {
    let broker = MockBroker::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/queues/prod%2Feu/app%2Fjobs"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(broker.server())
        .await;

    broker
        .client()
        .upsert_queue(
            &CancellationToken::new(),
            "prod/eu",
            "app/jobs",
            &QueueSettings::default(),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn queue_pause_and_resume_hit_the_action_endpoints() {
    let broker = MockBroker::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/queues/%2F/jobs/pause"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(broker.server())
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/queues/%2F/jobs/resume"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(broker.server())
        .await;

    let client = broker.client();
    let cancel = CancellationToken::new();
    client.pause_queue(&cancel, "/", "jobs").await.unwrap();
    client.resume_queue(&cancel, "/", "jobs").await.unwrap();
}

#[tokio::test]
async fn queue_purge_deletes_contents() {
    let broker = MockBroker::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/queues/%2F/jobs/contents"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(broker.server())
        .await;

    broker
        .client()
        .purge_queue(&CancellationToken::new(), "/", "jobs")
        .await
        .unwrap();
}

#[tokio::test]
async fn queue_read_surfaces_the_paused_state() {
    let broker = MockBroker::start().await;
    broker
        .mock_get_json(
            "/api/queues/%2F/jobs",
            json!({
                "name": "jobs",
                "vhost": "/",
                "durable": true,
                "auto_delete": false,
                "state": "paused",
                "messages": 42
            }),
        )
        .await;

    let queue = broker
        .client()
        .get_queue(&CancellationToken::new(), "/", "jobs")
        .await
        .unwrap()
        .unwrap();
    assert!(queue.is_paused());
}

#[tokio::test]
async fn vhost_listing_decodes_each_entry() {
    let broker = MockBroker::start().await;
    broker
        .mock_get_json(
            "/api/vhosts",
            json!([{"name": "/"}, {"name": "orders"}]),
        )
        .await;

    let vhosts = broker
        .client()
        .list_vhosts(&CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(vhosts.len(), 2);
    assert_eq!(vhosts[1].name, "orders");
}
