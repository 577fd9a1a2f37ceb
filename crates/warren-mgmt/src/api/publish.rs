//! One-shot message publishing through the management API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;

use crate::client::MgmtClient;
use crate::error::MgmtResult;
use crate::path::api_path;

/// How the `payload` field is to be interpreted by the broker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadEncoding {
    /// Payload is the literal UTF-8 message body.
    #[default]
    String,
    /// Payload is base64; the broker decodes it before enqueueing.
    Base64,
}

/// Body for `POST api/exchanges/{vhost}/{exchange}/publish`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PublishRequest {
    pub routing_key: String,
    pub payload: String,
    pub payload_encoding: PayloadEncoding,
    /// AMQP properties (`delivery_mode`, `headers`, ...); the broker
    /// accepts an empty object.
    pub properties: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct PublishResponse {
    routed: bool,
}

impl MgmtClient {
    /// Publish one message and report whether any queue received it.
    ///
    /// `false` is not an error: it means the exchange exists but nothing
    /// was bound for the routing key.
    pub async fn publish_message(
        &self,
        cancel: &CancellationToken,
        vhost: &str,
        exchange: &str,
        request: &PublishRequest,
    ) -> MgmtResult<bool> {
        let path = api_path(["exchanges", vhost, exchange, "publish"]);
        let response: PublishResponse = self
            .post_json_response(cancel, &path, request, "publish response")
            .await?;
        Ok(response.routed)
    }
}
