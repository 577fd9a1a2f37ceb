//! Permission grant for a user on a vhost.
//!
//! The broker keys permissions by (vhost, user); a PUT replaces the whole
//! grant, so update and create are the same request.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::info;
use warren_mgmt::{MgmtClient, PermissionInfo, PermissionSettings};

use crate::error::{ProviderError, ProviderResult};
use crate::import::two_parts;
use crate::resource::ManagedResource;
use crate::resources::{absorb_not_found, observed_after_write};

/// All three regexes are required. An empty pattern matches nothing,
/// which is how a deny is spelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSpec {
    pub vhost: String,
    pub user: String,
    pub configure: String,
    pub write: String,
    pub read: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionState {
    pub vhost: String,
    pub user: String,
    pub configure: String,
    pub write: String,
    pub read: String,
}

pub struct PermissionResource {
    client: MgmtClient,
}

impl PermissionResource {
    pub fn new(client: MgmtClient) -> Self {
        Self { client }
    }

    fn validate(spec: &PermissionSpec) -> ProviderResult<()> {
        if spec.vhost.is_empty() {
            return Err(ProviderError::config("vhost", "vhost must not be empty"));
        }
        if spec.user.is_empty() {
            return Err(ProviderError::config("user", "user must not be empty"));
        }
        Ok(())
    }

    fn state_from(info: PermissionInfo) -> PermissionState {
        PermissionState {
            vhost: info.vhost,
            user: info.user,
            configure: info.configure,
            write: info.write,
            read: info.read,
        }
    }

    async fn apply(
        &self,
        cancel: &CancellationToken,
        spec: &PermissionSpec,
    ) -> ProviderResult<PermissionState> {
        Self::validate(spec)?;
        let settings = PermissionSettings {
            configure: spec.configure.clone(),
            write: spec.write.clone(),
            read: spec.read.clone(),
        };
        self.client
            .upsert_permission(cancel, &spec.vhost, &spec.user, &settings)
            .await?;
        let observed = self
            .client
            .get_permission(cancel, &spec.vhost, &spec.user)
            .await?;
        let id = format!("{}@{}", spec.user, spec.vhost);
        let info = observed_after_write(observed, Self::KIND, &id)?;
        Ok(Self::state_from(info))
    }
}

#[async_trait]
impl ManagedResource for PermissionResource {
    type Spec = PermissionSpec;
    type State = PermissionState;

    const KIND: &'static str = "permission";

    async fn create(
        &self,
        cancel: &CancellationToken,
        spec: &Self::Spec,
    ) -> ProviderResult<Self::State> {
        info!(vhost = %spec.vhost, user = %spec.user, "granting permission");
        self.apply(cancel, spec).await
    }

    async fn read(
        &self,
        cancel: &CancellationToken,
        state: &Self::State,
    ) -> ProviderResult<Option<Self::State>> {
        let observed = self
            .client
            .get_permission(cancel, &state.vhost, &state.user)
            .await?;
        Ok(observed.map(Self::state_from))
    }

    async fn update(
        &self,
        cancel: &CancellationToken,
        _state: &Self::State,
        spec: &Self::Spec,
    ) -> ProviderResult<Self::State> {
        info!(vhost = %spec.vhost, user = %spec.user, "replacing permission");
        self.apply(cancel, spec).await
    }

    async fn delete(&self, cancel: &CancellationToken, state: &Self::State) -> ProviderResult<()> {
        info!(vhost = %state.vhost, user = %state.user, "revoking permission");
        absorb_not_found(
            self.client
                .delete_permission(cancel, &state.vhost, &state.user)
                .await,
        )
    }

    async fn import_state(
        &self,
        cancel: &CancellationToken,
        id: &str,
    ) -> ProviderResult<Self::State> {
        let (user, vhost) = two_parts(id, "user@vhost")?;
        let observed = self.client.get_permission(cancel, vhost, user).await?;
        let info = observed.ok_or_else(|| ProviderError::missing(Self::KIND, id))?;
        Ok(Self::state_from(info))
    }
}
