//! Queue resource.
//!
//! Declared settings (durability, arguments) are immutable after the
//! declare, but consumption can be toggled. Update therefore never
//! re-declares: it only issues a pause or resume when the desired flag
//! disagrees with what the broker reports.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use warren_mgmt::{MgmtClient, QueueInfo, QueueSettings};

use crate::error::{ProviderError, ProviderResult};
use crate::import::two_parts;
use crate::resource::ManagedResource;
use crate::value::{from_arguments, to_arguments, Scalar};

use super::{absorb_not_found, observed_after_write};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueSpec {
    pub vhost: String,
    pub name: String,
    #[serde(default = "default_durable")]
    pub durable: bool,
    #[serde(default)]
    pub auto_delete: bool,
    #[serde(default)]
    pub arguments: BTreeMap<String, Scalar>,
    /// When true the queue is declared and then paused, so messages
    /// accumulate without being delivered.
    #[serde(default)]
    pub paused: bool,
}

fn default_durable() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueState {
    pub vhost: String,
    pub name: String,
    pub durable: bool,
    pub auto_delete: bool,
    #[serde(default)]
    pub arguments: BTreeMap<String, Scalar>,
    pub paused: bool,
    /// Raw broker state string ("running", "paused", ...), kept for
    /// diagnostics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

pub struct QueueResource {
    client: MgmtClient,
}

impl QueueResource {
    pub fn new(client: MgmtClient) -> Self {
        Self { client }
    }

    fn validate(spec: &QueueSpec) -> ProviderResult<()> {
        if spec.vhost.is_empty() {
            return Err(ProviderError::config("vhost", "vhost must not be empty"));
        }
        if spec.name.is_empty() {
            return Err(ProviderError::config("name", "queue name must not be empty"));
        }
        Ok(())
    }

    fn state_from(vhost: &str, info: QueueInfo) -> QueueState {
        let paused = info.is_paused();
        QueueState {
            vhost: vhost.to_string(),
            name: info.name,
            durable: info.durable,
            auto_delete: info.auto_delete,
            arguments: from_arguments(&info.arguments),
            paused,
            state: info.state,
        }
    }

    /// Issue at most one pause or resume, and only when the broker
    /// disagrees with the desired flag.
    async fn converge_paused(
        &self,
        cancel: &CancellationToken,
        vhost: &str,
        name: &str,
        observed_paused: bool,
        desired_paused: bool,
    ) -> ProviderResult<()> {
        match (observed_paused, desired_paused) {
            (false, true) => {
                info!(vhost, queue = name, "pausing queue");
                self.client.pause_queue(cancel, vhost, name).await?;
            }
            (true, false) => {
                info!(vhost, queue = name, "resuming queue");
                self.client.resume_queue(cancel, vhost, name).await?;
            }
            _ => {
                debug!(vhost, queue = name, paused = desired_paused, "queue pause state already converged");
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ManagedResource for QueueResource {
    type Spec = QueueSpec;
    type State = QueueState;

    const KIND: &'static str = "queue";

    async fn create(
        &self,
        cancel: &CancellationToken,
        spec: &Self::Spec,
    ) -> ProviderResult<Self::State> {
        Self::validate(spec)?;
        info!(vhost = %spec.vhost, queue = %spec.name, "declaring queue");
        let settings = QueueSettings {
            durable: spec.durable,
            auto_delete: spec.auto_delete,
            arguments: to_arguments(&spec.arguments),
        };
        self.client
            .upsert_queue(cancel, &spec.vhost, &spec.name, &settings)
            .await?;
        if spec.paused {
            self.client
                .pause_queue(cancel, &spec.vhost, &spec.name)
                .await?;
        }
        let observed = self
            .client
            .get_queue(cancel, &spec.vhost, &spec.name)
            .await?;
        let info = observed_after_write(observed, Self::KIND, &spec.name)?;
        Ok(Self::state_from(&spec.vhost, info))
    }

    async fn read(
        &self,
        cancel: &CancellationToken,
        state: &Self::State,
    ) -> ProviderResult<Option<Self::State>> {
        let observed = self
            .client
            .get_queue(cancel, &state.vhost, &state.name)
            .await?;
        Ok(observed.map(|info| Self::state_from(&state.vhost, info)))
    }

    async fn update(
        &self,
        cancel: &CancellationToken,
        _state: &Self::State,
        spec: &Self::Spec,
    ) -> ProviderResult<Self::State> {
        Self::validate(spec)?;
        let observed = self
            .client
            .get_queue(cancel, &spec.vhost, &spec.name)
            .await?
            .ok_or_else(|| ProviderError::missing(Self::KIND, &spec.name))?;
        self.converge_paused(
            cancel,
            &spec.vhost,
            &spec.name,
            observed.is_paused(),
            spec.paused,
        )
        .await?;
        let observed = self
            .client
            .get_queue(cancel, &spec.vhost, &spec.name)
            .await?;
        let info = observed_after_write(observed, Self::KIND, &spec.name)?;
        Ok(Self::state_from(&spec.vhost, info))
    }

    async fn delete(&self, cancel: &CancellationToken, state: &Self::State) -> ProviderResult<()> {
        info!(vhost = %state.vhost, queue = %state.name, "deleting queue");
        absorb_not_found(
            self.client
                .delete_queue(cancel, &state.vhost, &state.name)
                .await,
        )
    }

    async fn import_state(
        &self,
        cancel: &CancellationToken,
        id: &str,
    ) -> ProviderResult<Self::State> {
        let (name, vhost) = two_parts(id, "name@vhost")?;
        let observed = self.client.get_queue(cancel, vhost, name).await?;
        let info = observed.ok_or_else(|| ProviderError::missing(Self::KIND, id))?;
        Ok(Self::state_from(vhost, info))
    }
}
