//! Dynamic shovel resource.
//!
//! A shovel lives in the broker as a `shovel` runtime parameter; the spec
//! is the definition plus its address. Source and destination each name
//! exactly one endpoint, and the check runs before any HTTP so a bad
//! spec never half-applies.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::info;
use warren_mgmt::{MgmtClient, ShovelDefinition};

use crate::error::{ProviderError, ProviderResult};
use crate::import::two_parts;
use crate::resource::ManagedResource;

use super::{absorb_not_found, observed_after_write};

const KNOWN_ACK_MODES: &[&str] = &["on-confirm", "on-publish", "no-ack"];
const KNOWN_DELETE_AFTER: &[&str] = &["never", "queue-length"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShovelSpec {
    pub vhost: String,
    pub name: String,
    pub src_uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src_queue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src_exchange: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src_exchange_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src_prefetch_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src_delete_after: Option<String>,
    pub dest_uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dest_queue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dest_exchange: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dest_exchange_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reconnect_delay: Option<i64>,
    #[serde(default = "default_ack_mode")]
    pub ack_mode: String,
}

fn default_ack_mode() -> String {
    "on-confirm".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShovelState {
    pub vhost: String,
    pub name: String,
    pub definition: ShovelDefinition,
}

pub struct ShovelResource {
    client: MgmtClient,
}

impl ShovelResource {
    pub fn new(client: MgmtClient) -> Self {
        Self { client }
    }

    fn validate(spec: &ShovelSpec) -> ProviderResult<()> {
        if spec.vhost.is_empty() {
            return Err(ProviderError::config("vhost", "vhost must not be empty"));
        }
        if spec.name.is_empty() {
            return Err(ProviderError::config(
                "name",
                "shovel name must not be empty",
            ));
        }
        if spec.src_uri.is_empty() {
            return Err(ProviderError::config("src_uri", "src_uri must not be empty"));
        }
        if spec.dest_uri.is_empty() {
            return Err(ProviderError::config(
                "dest_uri",
                "dest_uri must not be empty",
            ));
        }
        match (&spec.src_queue, &spec.src_exchange) {
            (Some(_), Some(_)) => {
                return Err(ProviderError::config(
                    "src_queue",
                    "src_queue and src_exchange are mutually exclusive",
                ));
            }
            (None, None) => {
                return Err(ProviderError::config(
                    "src_queue",
                    "one of src_queue or src_exchange is required",
                ));
            }
            _ => {}
        }
        match (&spec.dest_queue, &spec.dest_exchange) {
            (Some(_), Some(_)) => {
                return Err(ProviderError::config(
                    "dest_queue",
                    "dest_queue and dest_exchange are mutually exclusive",
                ));
            }
            (None, None) => {
                return Err(ProviderError::config(
                    "dest_queue",
                    "one of dest_queue or dest_exchange is required",
                ));
            }
            _ => {}
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
        if let Some(delete_after) = &spec.src_delete_after {
            if !KNOWN_DELETE_AFTER.contains(&delete_after.as_str()) {
                return Err(ProviderError::config(
                    "src_delete_after",
                    format!(
                        "unknown src_delete_after {delete_after:?}, expected one of {KNOWN_DELETE_AFTER:?}"
                    ),
                ));
            }
        }
        Ok(())
    }

    fn definition(spec: &ShovelSpec) -> ShovelDefinition {
        ShovelDefinition {
            src_uri: spec.src_uri.clone(),
            src_queue: spec.src_queue.clone(),
            src_exchange: spec.src_exchange.clone(),
            src_exchange_key: spec.src_exchange_key.clone(),
            src_prefetch_count: spec.src_prefetch_count,
            src_delete_after: spec.src_delete_after.clone(),
            dest_uri: spec.dest_uri.clone(),
            dest_queue: spec.dest_queue.clone(),
            dest_exchange: spec.dest_exchange.clone(),
            dest_exchange_key: spec.dest_exchange_key.clone(),
            reconnect_delay: spec.reconnect_delay,
            ack_mode: spec.ack_mode.clone(),
        }
    }

    async fn apply(
        &self,
        cancel: &CancellationToken,
        spec: &ShovelSpec,
    ) -> ProviderResult<ShovelState> {
        Self::validate(spec)?;
        self.client
            .upsert_shovel(cancel, &spec.vhost, &spec.name, &Self::definition(spec))
            .await?;
        let observed = self.client.get_shovel(cancel, &spec.vhost, &spec.name).await?;
        let definition = observed_after_write(observed, Self::KIND, &spec.name)?;
        Ok(ShovelState {
            vhost: spec.vhost.clone(),
            name: spec.name.clone(),
            definition,
        })
    }
}

#[async_trait]
impl ManagedResource for ShovelResource {
    type Spec = ShovelSpec;
    type State = ShovelState;

    const KIND: &'static str = "shovel";

    async fn create(
        &self,
        cancel: &CancellationToken,
        spec: &Self::Spec,
    ) -> ProviderResult<Self::State> {
        info!(vhost = %spec.vhost, shovel = %spec.name, "creating shovel");
        self.apply(cancel, spec).await
    }

    async fn read(
        &self,
        cancel: &CancellationToken,
        state: &Self::State,
    ) -> ProviderResult<Option<Self::State>> {
        let observed = self
            .client
            .get_shovel(cancel, &state.vhost, &state.name)
            .await?;
        Ok(observed.map(|definition| ShovelState {
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
        info!(vhost = %spec.vhost, shovel = %spec.name, "replacing shovel");
        self.apply(cancel, spec).await
    }

    async fn delete(&self, cancel: &CancellationToken, state: &Self::State) -> ProviderResult<()> {
        info!(vhost = %state.vhost, shovel = %state.name, "deleting shovel");
        absorb_not_found(
            self.client
                .delete_shovel(cancel, &state.vhost, &state.name)
                .await,
        )
    }

    async fn import_state(
        &self,
        cancel: &CancellationToken,
        id: &str,
    ) -> ProviderResult<Self::State> {
        let (vhost, name) = two_parts(id, "vhost@name")?;
        let observed = self.client.get_shovel(cancel, vhost, name).await?;
        let definition = observed.ok_or_else(|| ProviderError::missing(Self::KIND, id))?;
        Ok(ShovelState {
            vhost: vhost.to_string(),
            name: name.to_string(),
            definition,
        })
    }
}
