//! Virtual host resource.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::info;
use warren_mgmt::MgmtClient;

use crate::error::{ProviderError, ProviderResult};
use crate::import::bare_name;
use crate::resource::ManagedResource;
use crate::resources::{absorb_not_found, observed_after_write};

/// Declared form of a virtual host. The management API takes nothing but
/// the name, so the spec is just that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VhostSpec {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VhostState {
    pub name: String,
}

pub struct VhostResource {
    client: MgmtClient,
}

impl VhostResource {
    pub fn new(client: MgmtClient) -> Self {
        Self { client }
    }

    fn validate(spec: &VhostSpec) -> ProviderResult<()> {
        if spec.name.is_empty() {
            return Err(ProviderError::config("name", "vhost name must not be empty"));
        }
        Ok(())
    }
}

#[async_trait]
impl ManagedResource for VhostResource {
    type Spec = VhostSpec;
    type State = VhostState;

    const KIND: &'static str = "vhost";

    async fn create(
        &self,
        cancel: &CancellationToken,
        spec: &Self::Spec,
    ) -> ProviderResult<Self::State> {
        Self::validate(spec)?;
        info!(vhost = %spec.name, "creating vhost");
        self.client.upsert_vhost(cancel, &spec.name).await?;
        let observed = self.client.get_vhost(cancel, &spec.name).await?;
        let info = observed_after_write(observed, Self::KIND, &spec.name)?;
        Ok(VhostState { name: info.name })
    }

    async fn read(
        &self,
        cancel: &CancellationToken,
        state: &Self::State,
    ) -> ProviderResult<Option<Self::State>> {
        let observed = self.client.get_vhost(cancel, &state.name).await?;
        Ok(observed.map(|info| VhostState { name: info.name }))
    }

    async fn delete(&self, cancel: &CancellationToken, state: &Self::State) -> ProviderResult<()> {
        info!(vhost = %state.name, "deleting vhost");
        absorb_not_found(self.client.delete_vhost(cancel, &state.name).await)
    }

    async fn import_state(
        &self,
        cancel: &CancellationToken,
        id: &str,
    ) -> ProviderResult<Self::State> {
        let name = bare_name(id, "vhost name")?;
        let observed = self.client.get_vhost(cancel, name).await?;
        let info = observed.ok_or_else(|| ProviderError::missing(Self::KIND, id))?;
        Ok(VhostState { name: info.name })
    }
}
