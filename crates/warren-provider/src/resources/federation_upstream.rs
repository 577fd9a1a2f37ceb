//! Federation upstream resource.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::info;
use warren_mgmt::{FederationUpstreamDefinition, MgmtClient};

use crate::error::{ProviderError, ProviderResult};
use crate::import::two_parts;
use crate::resource::ManagedResource;

use super::{absorb_not_found, observed_after_write};

const KNOWN_ACK_MODES: &[&str] = &["on-confirm", "on-publish", "no-ack"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FederationUpstreamSpec {
    pub vhost: String,
    pub name: String,
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefetch_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reconnect_delay: Option<i64>,
    #[serde(default = "default_ack_mode")]
    pub ack_mode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exchange: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_hops: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_ttl: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumer_tag: Option<String>,
}

fn default_ack_mode() -> String {
    "on-confirm".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FederationUpstreamState {
    pub vhost: String,
    pub name: String,
    pub definition: FederationUpstreamDefinition,
}

pub struct FederationUpstreamResource {
    client: MgmtClient,
}

impl FederationUpstreamResource {
    pub fn new(client: MgmtClient) -> Self {
        Self { client }
    }

    fn validate(spec: &FederationUpstreamSpec) -> ProviderResult<()> {
        if spec.vhost.is_empty() {
            return Err(ProviderError::config("vhost", "vhost must not be empty"));
        }
        if spec.name.is_empty() {
            return Err(ProviderError::config(
                "name",
                "upstream name must not be empty",
            ));
        }
        if spec.uri.is_empty() {
            return Err(ProviderError::config("uri", "uri must not be empty"));
        }
        if !KNOWN_ACK_MODES.contains(&spec.ack_mode.as_str()) {
            return Err(ProviderError::config(
                "ack_mode",
                format!(
                    "unknown ack_mode {:?}, expected one of {KNOWN_ACK_MODES:?}",
                    spec.ack_mode
                ),
            ));
        }
        Ok(())
    }

    fn definition(spec: &FederationUpstreamSpec) -> FederationUpstreamDefinition {
        FederationUpstreamDefinition {
            uri: spec.uri.clone(),
            prefetch_count: spec.prefetch_count,
            reconnect_delay: spec.reconnect_delay,
            ack_mode: spec.ack_mode.clone(),
            exchange: spec.exchange.clone(),
            max_hops: spec.max_hops,
            expires: spec.expires,
            message_ttl: spec.message_ttl,
            queue: spec.queue.clone(),
            consumer_tag: spec.consumer_tag.clone(),
        }
    }

    async fn apply(
        &self,
        cancel: &CancellationToken,
        spec: &FederationUpstreamSpec,
    ) -> ProviderResult<FederationUpstreamState> {
        Self::validate(spec)?;
        self.client
            .upsert_federation_upstream(cancel, &spec.vhost, &spec.name, &Self::definition(spec))
            .await?;
        let observed = self
            .client
            .get_federation_upstream(cancel, &spec.vhost, &spec.name)
            .await?;
        let definition = observed_after_write(observed, Self::KIND, &spec.name)?;
        Ok(FederationUpstreamState {
            vhost: spec.vhost.clone(),
            name: spec.name.clone(),
            definition,
        })
    }
}

#[async_trait]
impl ManagedResource for FederationUpstreamResource {
    type Spec = FederationUpstreamSpec;
    type State = FederationUpstreamState;

    const KIND: &'static str = "federation upstream";

    async fn create(
        &self,
        cancel: &CancellationToken,
        spec: &Self::Spec,
    ) -> ProviderResult<Self::State> {
        info!(vhost = %spec.vhost, upstream = %spec.name, "creating federation upstream");
        self.apply(cancel, spec).await
    }

    async fn read(
        &self,
        cancel: &CancellationToken,
        state: &Self::State,
    ) -> ProviderResult<Option<Self::State>> {
        let observed = self
            .client
            .get_federation_upstream(cancel, &state.vhost, &state.name)
            .await?;
        Ok(observed.map(|definition| FederationUpstreamState {
            vhost: state.vhost.clone(),
            name: state.name.clone(),
            definition,
        }))
    }

    async fn update(
        &self,
        cancel: &CancellationToken,
        _state: &Self::State,
        spec: &Self::Spec,
    ) -> ProviderResult<Self::State> {
        info!(vhost = %spec.vhost, upstream = %spec.name, "replacing federation upstream");
        self.apply(cancel, spec).await
    }

    async fn delete(&self, cancel: &CancellationToken, state: &Self::State) -> ProviderResult<()> {
        info!(vhost = %state.vhost, upstream = %state.name, "deleting federation upstream");
        absorb_not_found(
            self.client
                .delete_federation_upstream(cancel, &state.vhost, &state.name)
                .await,
        )
    }

    async fn import_state(
        &self,
        cancel: &CancellationToken,
        id: &str,
    ) -> ProviderResult<Self::State> {
        let (vhost, name) = two_parts(id, "vhost@name")?;
        let observed = self.client.get_federation_upstream(cancel, vhost, name).await?;
        let definition = observed.ok_or_else(|| ProviderError::missing(Self::KIND, id))?;
        Ok(FederationUpstreamState {
            vhost: vhost.to_string(),
            name: name.to_string(),
            definition,
        })
    }
}
