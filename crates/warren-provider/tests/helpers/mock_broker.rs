//! Mock management API for reconciler tests.
//!
//! Same shape as the client-level helper: a wrapped [`MockServer`] plus
//! mounts for the broker's standard response documents. Reconciler tests
//! mostly mount bespoke mocks with `expect` counts, since what matters is
//! which requests were and were not issued.

#![allow(dead_code)]

use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use warren_mgmt::MgmtClient;
use warren_provider::{Provider, ProviderConfig};

pub const TEST_USER: &str = "warren";
pub const TEST_PASSWORD: &str = "burrow";

pub struct MockBroker {
    server: MockServer,
}

impl MockBroker {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    pub fn server(&self) -> &MockServer {
        &self.server
    }

    pub fn config(&self) -> ProviderConfig {
        ProviderConfig {
            endpoint: self.uri(),
            username: TEST_USER.into(),
            password: TEST_PASSWORD.into(),
            user_agent: None,
        }
    }

    /// A provider wired to this broker.
    pub fn provider(&self) -> Provider {
        Provider::new(&self.config()).expect("mock broker config is valid")
    }

    /// The bare management client, for seeding broker state in tests.
    pub fn client(&self) -> MgmtClient {
        MgmtClient::with_http_client(
            self.uri(),
            TEST_USER,
            TEST_PASSWORD,
            reqwest::Client::new(),
        )
    }

    pub async fn mock_get_json(&self, url_path: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path(url_path))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_get_not_found(&self, url_path: &str) {
        Mock::given(method("GET"))
            .and(path(url_path))
            .respond_with(not_found())
            .mount(&self.server)
            .await;
    }

    pub async fn mock_put_created(&self, url_path: &str) {
        Mock::given(method("PUT"))
            .and(path(url_path))
            .respond_with(ResponseTemplate::new(201))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_post_created(&self, url_path: &str) {
        Mock::given(method("POST"))
            .and(path(url_path))
            .respond_with(ResponseTemplate::new(201))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_delete_no_content(&self, url_path: &str) {
        Mock::given(method("DELETE"))
            .and(path(url_path))
            .respond_with(ResponseTemplate::new(204))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_delete_not_found(&self, url_path: &str) {
        Mock::given(method("DELETE"))
            .and(path(url_path))
            .respond_with(not_found())
            .mount(&self.server)
            .await;
    }
}

pub fn not_found() -> ResponseTemplate {
    ResponseTemplate::new(404).set_body_json(json!({
        "error": "Object Not Found",
        "reason": "Not Found"
    }))
}

pub fn broker_error(status: u16, reason: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({
        "error": "bad_request",
        "reason": reason
    }))
}
