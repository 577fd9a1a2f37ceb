//! One-shot message publish.
//!
//! Publishing is an action, not a managed object: create performs the
//! publish and records what was sent, read echoes that record back, and
//! delete forgets it without touching the broker. Declaring the resource
//! again after a change publishes again.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use warren_mgmt::{MgmtClient, PayloadEncoding, PublishRequest};

use crate::error::{ProviderError, ProviderResult};
use crate::resource::ManagedResource;
use crate::value::{to_arguments, Scalar};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishSpec {
    pub vhost: String,
    pub exchange: String,
    #[serde(default)]
    pub routing_key: String,
    pub payload: String,
    /// `"string"` or `"base64"`.
    #[serde(default = "default_encoding")]
    pub payload_encoding: String,
    #[serde(default)]
    pub properties: BTreeMap<String, Scalar>,
}

fn default_encoding() -> String {
    "string".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishState {
    pub vhost: String,
    pub exchange: String,
    pub routing_key: String,
    pub payload: String,
    pub payload_encoding: String,
    #[serde(default)]
    pub properties: BTreeMap<String, Scalar>,
    /// Whether any queue received the message.
    pub routed: bool,
}

pub struct PublishResource {
    client: MgmtClient,
}

impl PublishResource {
    pub fn new(client: MgmtClient) -> Self {
        Self { client }
    }

    fn validate(spec: &PublishSpec) -> ProviderResult<PayloadEncoding> {
        if spec.vhost.is_empty() {
            return Err(ProviderError::config("vhost", "vhost must not be empty"));
        }
        if spec.exchange.is_empty() {
            return Err(ProviderError::config(
                "exchange",
                "exchange must not be empty",
            ));
        }
        match spec.payload_encoding.as_str() {
            "string" => Ok(PayloadEncoding::String),
            "base64" => Ok(PayloadEncoding::Base64),
            other => Err(ProviderError::config(
                "payload_encoding",
                format!("unknown payload_encoding {other:?}, expected \"string\" or \"base64\""),
            )),
        }
    }
}

#[async_trait]
impl ManagedResource for PublishResource {
    type Spec = PublishSpec;
    type State = PublishState;

    const KIND: &'static str = "publish";

    async fn create(
        &self,
        cancel: &CancellationToken,
        spec: &Self::Spec,
    ) -> ProviderResult<Self::State> {
        let payload_encoding = Self::validate(spec)?;
        info!(
            vhost = %spec.vhost,
            exchange = %spec.exchange,
            routing_key = %spec.routing_key,
            "publishing message"
        );
        let request = PublishRequest {
            routing_key: spec.routing_key.clone(),
            payload: spec.payload.clone(),
            payload_encoding,
            properties: to_arguments(&spec.properties),
        };
        let routed = self
            .client
            .publish_message(cancel, &spec.vhost, &spec.exchange, &request)
            .await?;
        if !routed {
            warn!(
                vhost = %spec.vhost,
                exchange = %spec.exchange,
                routing_key = %spec.routing_key,
                "message published but not routed to any queue"
            );
        }
        Ok(PublishState {
            vhost: spec.vhost.clone(),
            exchange: spec.exchange.clone(),
            routing_key: spec.routing_key.clone(),
            payload: spec.payload.clone(),
            payload_encoding: spec.payload_encoding.clone(),
            properties: spec.properties.clone(),
            routed,
        })
    }

    async fn read(
        &self,
        _cancel: &CancellationToken,
        state: &Self::State,
    ) -> ProviderResult<Option<Self::State>> {
        // Nothing on the broker represents a past publish.
        Ok(Some(state.clone()))
    }

    async fn update(
        &self,
        _cancel: &CancellationToken,
        state: &Self::State,
        _spec: &Self::Spec,
    ) -> ProviderResult<Self::State> {
        // Every field forces replacement, so an update can only carry an
        // unchanged spec.
        Ok(state.clone())
    }

    async fn delete(&self, _cancel: &CancellationToken, state: &Self::State) -> ProviderResult<()> {
        info!(exchange = %state.exchange, "forgetting published message");
        Ok(())
    }
}
