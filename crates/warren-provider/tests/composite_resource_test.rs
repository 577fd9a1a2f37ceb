//! Shovel and federation reconciliation over the runtime-parameter
//! store: invariants enforced before HTTP, and broker echo noise folded
//! away on reads.

mod helpers;

use helpers::mock_broker::MockBroker;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use warren_provider::{
    FederationUpstreamSetSpec, FederationUpstreamSpec, ManagedResource, ShovelSpec,
};

fn shovel_spec() -> ShovelSpec {
    ShovelSpec {
        vhost: "/".into(),
        name: "drain".into(),
        src_uri: "amqp://".into(),
        src_queue: Some("old-jobs".into()),
        src_exchange: None,
        src_exchange_key: None,
        src_prefetch_count: Some(500),
        src_delete_after: Some("never".into()),
        dest_uri: "amqp://other".into(),
        dest_queue: Some("jobs".into()),
        dest_exchange: None,
        dest_exchange_key: None,
        reconnect_delay: None,
        ack_mode: "on-confirm".into(),
    }
}

fn upstream_spec() -> FederationUpstreamSpec {
    FederationUpstreamSpec {
        vhost: "/".into(),
        name: "east".into(),
        uri: "amqp://east.internal".into(),
        prefetch_count: Some(1000),
        reconnect_delay: None,
        ack_mode: "on-confirm".into(),
        exchange: Some("events".into()),
        max_hops: Some(1),
        expires: None,
        message_ttl: None,
        queue: None,
        consumer_tag: None,
    }
}

#[tokio::test]
async fn shovel_create_wraps_the_definition_in_value() {
    let broker = MockBroker::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/parameters/shovel/%2F/drain"))
        .and(body_json(json!({
            "value": {
                "src-uri": "amqp://",
                "src-queue": "old-jobs",
                "src-prefetch-count": 500,
                "src-delete-after": "never",
                "dest-uri": "amqp://other",
                "dest-queue": "jobs",
                "ack-mode": "on-confirm"
            }
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(broker.server())
        .await;
    broker
        .mock_get_json(
            "/api/parameters/shovel/%2F/drain",
            json!({
                "component": "shovel",
                "vhost": "/",
                "name": "drain",
                "value": {
                    "src-uri": "amqp://",
                    "src-queue": "old-jobs",
                    "src-prefetch-count": 500,
                    "src-delete-after": "never",
                    "dest-uri": "amqp://other",
                    "dest-queue": "jobs",
                    "ack-mode": "on-confirm"
                }
            }),
        )
        .await;

    let state = broker
        .provider()
        .shovels()
        .create(&CancellationToken::new(), &shovel_spec())
        .await
        .unwrap();

    assert_eq!(state.definition.src_queue.as_deref(), Some("old-jobs"));
    assert_eq!(state.definition.src_prefetch_count, Some(500));
}

#[tokio::test]
async fn shovel_with_both_sources_never_reaches_the_broker() {
    let broker = MockBroker::start().await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(broker.server())
        .await;

    let mut bad = shovel_spec();
    bad.src_exchange = Some("events".into());
    let err = broker
        .provider()
        .shovels()
        .create(&CancellationToken::new(), &bad)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("src_queue"));
    assert!(err.to_string().contains("mutually exclusive"));
}

#[tokio::test]
async fn shovel_with_no_destination_never_reaches_the_broker() {
    let broker = MockBroker::start().await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(broker.server())
        .await;

    let mut bad = shovel_spec();
    bad.dest_queue = None;
    let err = broker
        .provider()
        .shovels()
        .create(&CancellationToken::new(), &bad)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("dest_queue or dest_exchange"));
}

#[tokio::test]
async fn shovel_read_folds_broker_echo_zeroes() {
    let broker = MockBroker::start().await;

    broker
        .mock_get_json(
            "/api/parameters/shovel/%2F/drain",
            json!({
                "component": "shovel",
                "vhost": "/",
                "name": "drain",
                "value": {
                    "src-uri": "amqp://",
                    "src-queue": "old-jobs",
                    "src-exchange": "",
                    "src-prefetch-count": 0,
                    "dest-uri": "amqp://other",
                    "dest-queue": "jobs",
                    "reconnect-delay": 0,
                    "ack-mode": "on-confirm"
                }
            }),
        )
        .await;

    let state = broker
        .provider()
        .shovels()
        .import_state(&CancellationToken::new(), "/@drain")
        .await
        .unwrap();

    assert_eq!(state.definition.src_exchange, None);
    assert_eq!(state.definition.src_prefetch_count, None);
    assert_eq!(state.definition.reconnect_delay, None);
}

#[tokio::test]
async fn shovel_gone_reads_as_none() {
    let broker = MockBroker::start().await;

    broker
        .mock_get_json(
            "/api/parameters/shovel/%2F/drain",
            json!({
                "component": "shovel",
                "vhost": "/",
                "name": "drain",
                "value": {
                    "src-uri": "amqp://",
                    "src-queue": "old-jobs",
                    "dest-uri": "amqp://other",
                    "dest-queue": "jobs",
                    "ack-mode": "on-confirm"
                }
            }),
        )
        .await;

    let shovels = broker.provider().shovels();
    let cancel = CancellationToken::new();
    let state = shovels.import_state(&cancel, "/@drain").await.unwrap();

    broker.server().reset().await;
    broker
        .mock_get_not_found("/api/parameters/shovel/%2F/drain")
        .await;

    assert!(shovels.read(&cancel, &state).await.unwrap().is_none());
}

#[tokio::test]
async fn shovel_delete_removes_the_parameter() {
    let broker = MockBroker::start().await;

    broker
        .mock_get_json(
            "/api/parameters/shovel/%2F/drain",
            json!({
                "component": "shovel",
                "vhost": "/",
                "name": "drain",
                "value": {
                    "src-uri": "amqp://",
                    "src-queue": "old-jobs",
                    "dest-uri": "amqp://other",
                    "dest-queue": "jobs",
                    "ack-mode": "on-confirm"
                }
            }),
        )
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/parameters/shovel/%2F/drain"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(broker.server())
        .await;

    let shovels = broker.provider().shovels();
    let cancel = CancellationToken::new();
    let state = shovels.import_state(&cancel, "/@drain").await.unwrap();
    shovels.delete(&cancel, &state).await.unwrap();
}

#[tokio::test]
async fn federation_upstream_round_trips_with_normalization() {
    let broker = MockBroker::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/parameters/federation-upstream/%2F/east"))
        .and(body_json(json!({
            "value": {
                "uri": "amqp://east.internal",
                "prefetch-count": 1000,
                "ack-mode": "on-confirm",
                "exchange": "events",
                "max-hops": 1
            }
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(broker.server())
        .await;
    broker
        .mock_get_json(
            "/api/parameters/federation-upstream/%2F/east",
            json!({
                "component": "federation-upstream",
                "vhost": "/",
                "name": "east",
                "value": {
                    "uri": "amqp://east.internal",
                    "prefetch-count": 1000,
                    "reconnect-delay": 0,
                    "ack-mode": "on-confirm",
                    "exchange": "events",
                    "max-hops": 1,
                    "expires": 0,
                    "message-ttl": 0,
                    "queue": "",
                    "consumer-tag": ""
                }
            }),
        )
        .await;

    let state = broker
        .provider()
        .federation_upstreams()
        .create(&CancellationToken::new(), &upstream_spec())
        .await
        .unwrap();

    assert_eq!(state.definition.prefetch_count, Some(1000));
    assert_eq!(state.definition.reconnect_delay, None);
    assert_eq!(state.definition.queue, None);
    assert_eq!(state.definition.consumer_tag, None);
}

#[tokio::test]
async fn federation_upstream_rejects_unknown_ack_mode_before_http() {
    let broker = MockBroker::start().await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(broker.server())
        .await;

    let mut bad = upstream_spec();
    bad.ack_mode = "eventually".into();
    let err = broker
        .provider()
        .federation_upstreams()
        .create(&CancellationToken::new(), &bad)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("eventually"));
}

#[tokio::test]
async fn upstream_set_flattens_to_member_objects() {
    let broker = MockBroker::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/parameters/federation-upstream-set/%2F/all-peers"))
        .and(body_json(json!({
            "value": [{"upstream": "east"}, {"upstream": "west"}]
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(broker.server())
        .await;
    broker
        .mock_get_json(
            "/api/parameters/federation-upstream-set/%2F/all-peers",
            json!({
                "component": "federation-upstream-set",
                "vhost": "/",
                "name": "all-peers",
                "value": [{"upstream": "east"}, {"upstream": "west"}]
            }),
        )
        .await;

    let state = broker
        .provider()
        .federation_upstream_sets()
        .create(
            &CancellationToken::new(),
            &FederationUpstreamSetSpec {
                vhost: "/".into(),
                name: "all-peers".into(),
                upstreams: vec!["east".into(), "west".into()],
            },
        )
        .await
        .unwrap();

    assert_eq!(state.upstreams, ["east", "west"]);
}

#[tokio::test]
async fn empty_upstream_set_never_reaches_the_broker() {
    let broker = MockBroker::start().await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(broker.server())
        .await;

    let err = broker
        .provider()
        .federation_upstream_sets()
        .create(
            &CancellationToken::new(),
            &FederationUpstreamSetSpec {
                vhost: "/".into(),
                name: "all-peers".into(),
                upstreams: vec![],
            },
        )
        .await
        .unwrap_err();
    assert!(err.to_string().contains("at least one"));
}

#[tokio::test]
async fn upstream_set_import_uses_vhost_at_name() {
    let broker = MockBroker::start().await;

    broker
        .mock_get_json(
            "/api/parameters/federation-upstream-set/prod/peers",
            json!({
                "component": "federation-upstream-set",
                "vhost": "prod",
                "name": "peers",
                "value": [{"upstream": "east"}]
            }),
        )
        .await;

    let state = broker
        .provider()
        .federation_upstream_sets()
        .import_state(&CancellationToken::new(), "prod@peers")
        .await
        .unwrap();
    assert_eq!(state.vhost, "prod");
    assert_eq!(state.upstreams, ["east"]);
}
