//! Per-vhost limits resource.
//!
//! Limits are one logical object per vhost even though the broker stores
//! each key separately. Deleting the resource lifts every limit; the
//! vhost itself is untouched.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::info;
use warren_mgmt::{MgmtClient, VhostLimits};

use crate::error::{ProviderError, ProviderResult};
use crate::import::bare_name;
use crate::resource::ManagedResource;

use super::observed_after_write;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VhostLimitsSpec {
    pub vhost: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_connections: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_queues: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VhostLimitsState {
    pub vhost: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_connections: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_queues: Option<i64>,
}

pub struct VhostLimitsResource {
    client: MgmtClient,
}

impl VhostLimitsResource {
    pub fn new(client: MgmtClient) -> Self {
        Self { client }
    }

    fn validate(spec: &VhostLimitsSpec) -> ProviderResult<()> {
        if spec.vhost.is_empty() {
            return Err(ProviderError::config("vhost", "vhost must not be empty"));
        }
        for (attribute, value) in [
            ("max_connections", spec.max_connections),
            ("max_queues", spec.max_queues),
        ] {
            if matches!(value, Some(v) if v < 0) {
                return Err(ProviderError::config(attribute, "limit must not be negative"));
            }
        }
        Ok(())
    }

    fn desired(spec: &VhostLimitsSpec) -> VhostLimits {
        VhostLimits {
            max_connections: spec.max_connections,
            max_queues: spec.max_queues,
        }
    }

    fn state_from(vhost: &str, limits: VhostLimits) -> VhostLimitsState {
        VhostLimitsState {
            vhost: vhost.to_string(),
            max_connections: limits.max_connections,
            max_queues: limits.max_queues,
        }
    }

    async fn apply(
        &self,
        cancel: &CancellationToken,
        spec: &VhostLimitsSpec,
    ) -> ProviderResult<VhostLimitsState> {
        Self::validate(spec)?;
        self.client
            .apply_vhost_limits(cancel, &spec.vhost, &Self::desired(spec))
            .await?;
        let observed = self.client.get_vhost_limits(cancel, &spec.vhost).await?;
        let limits = observed_after_write(observed, Self::KIND, &spec.vhost)?;
        Ok(Self::state_from(&spec.vhost, limits))
    }
}

#[async_trait]
impl ManagedResource for VhostLimitsResource {
    type Spec = VhostLimitsSpec;
    type State = VhostLimitsState;

    const KIND: &'static str = "vhost limits";

    async fn create(
        &self,
        cancel: &CancellationToken,
        spec: &Self::Spec,
    ) -> ProviderResult<Self::State> {
        info!(vhost = %spec.vhost, "setting vhost limits");
        self.apply(cancel, spec).await
    }

    async fn read(
        &self,
        cancel: &CancellationToken,
        state: &Self::State,
    ) -> ProviderResult<Option<Self::State>> {
        let observed = self.client.get_vhost_limits(cancel, &state.vhost).await?;
        Ok(observed.map(|limits| Self::state_from(&state.vhost, limits)))
    }

    async fn update(
        &self,
        cancel: &CancellationToken,
        _state: &Self::State,
        spec: &Self::Spec,
    ) -> ProviderResult<Self::State> {
        info!(vhost = %spec.vhost, "replacing vhost limits");
        self.apply(cancel, spec).await
    }

    async fn delete(&self, cancel: &CancellationToken, state: &Self::State) -> ProviderResult<()> {
        info!(vhost = %state.vhost, "lifting vhost limits");
        self.client
            .apply_vhost_limits(cancel, &state.vhost, &VhostLimits::default())
            .await
            .map_err(ProviderError::from)
    }

    async fn import_state(
        &self,
        cancel: &CancellationToken,
        id: &str,
    ) -> ProviderResult<Self::State> {
        let vhost = bare_name(id, "vhost name")?;
        let observed = self.client.get_vhost_limits(cancel, vhost).await?;
        let limits = observed.ok_or_else(|| ProviderError::missing(Self::KIND, id))?;
        Ok(Self::state_from(vhost, limits))
    }
}
