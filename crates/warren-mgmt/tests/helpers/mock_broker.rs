//! Mock management API using wiremock for integration testing.
//!
//! Wraps a [`MockServer`] with mounts for the response shapes the broker
//! produces: JSON documents on reads, bare status codes on writes, and
//! the `{error, reason}` document on failures.

#![allow(dead_code)]

use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use warren_mgmt::MgmtClient;

pub const TEST_USER: &str = "warren";
pub const TEST_PASSWORD: &str = "burrow";

/// A mock broker management endpoint.
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

    /// The wrapped server, for mounting bespoke mocks.
    pub fn server(&self) -> &MockServer {
        &self.server
    }

    /// A client configured with this broker's endpoint and test credentials.
    pub fn client(&self) -> MgmtClient {
        MgmtClient::with_http_client(
            self.uri(),
            TEST_USER,
            TEST_PASSWORD,
            reqwest::Client::new(),
        )
    }

    /// Mount a GET returning a JSON document.
    pub async fn mock_get_json(&self, url_path: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path(url_path))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Mount a GET returning the broker's not-found document.
    pub async fn mock_get_not_found(&self, url_path: &str) {
        Mock::given(method("GET"))
            .and(path(url_path))
            .respond_with(not_found())
            .mount(&self.server)
            .await;
    }

    /// Mount a PUT answering 201 regardless of body.
    pub async fn mock_put_created(&self, url_path: &str) {
        Mock::given(method("PUT"))
            .and(path(url_path))
            .respond_with(ResponseTemplate::new(201))
            .mount(&self.server)
            .await;
    }

    /// Mount a POST answering 201 regardless of body.
    pub async fn mock_post_created(&self, url_path: &str) {
        Mock::given(method("POST"))
            .and(path(url_path))
            .respond_with(ResponseTemplate::new(201))
            .mount(&self.server)
            .await;
    }

    /// Mount a DELETE answering 204.
    pub async fn mock_delete_no_content(&self, url_path: &str) {
        Mock::given(method("DELETE"))
            .and(path(url_path))
            .respond_with(ResponseTemplate::new(204))
            .mount(&self.server)
            .await;
    }

    /// Mount a DELETE answering the broker's not-found document.
    pub async fn mock_delete_not_found(&self, url_path: &str) {
        Mock::given(method("DELETE"))
            .and(path(url_path))
            .respond_with(not_found())
            .mount(&self.server)
            .await;
    }
}

/// The broker's standard 404 response.
pub fn not_found() -> ResponseTemplate {
    ResponseTemplate::new(404).set_body_json(json!({
        "error": "Object Not Found",
        "reason": "Not Found"
    }))
}

/// An error response in the broker's `{error, reason}` shape.
pub fn broker_error(status: u16, reason: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({
        "error": "bad_request",
        "reason": reason
    }))
}
