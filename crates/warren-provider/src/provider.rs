//! Provider entry point.
//!
//! The host configures one [`Provider`] per broker endpoint and obtains
//! resource handles from it. Handles share the underlying HTTP client,
//! so cloning is cheap and connection pooling happens once.

use tokio_util::sync::CancellationToken;
use tracing::info;
use warren_mgmt::MgmtClient;

use crate::config::ProviderConfig;
use crate::error::ProviderResult;
use crate::resources::binding::BindingResource;
use crate::resources::exchange::ExchangeResource;
use crate::resources::federation_upstream::FederationUpstreamResource;
use crate::resources::federation_upstream_set::FederationUpstreamSetResource;
use crate::resources::permission::PermissionResource;
use crate::resources::policy::PolicyResource;
use crate::resources::publish::PublishResource;
use crate::resources::purge::PurgeResource;
use crate::resources::queue::QueueResource;
use crate::resources::shovel::ShovelResource;
use crate::resources::user::UserResource;
use crate::resources::vhost::VhostResource;
use crate::resources::vhost_limits::VhostLimitsResource;

pub struct Provider {
    client: MgmtClient,
}

impl Provider {
    /// Validate the configuration and build the provider.
    ///
    /// No request is sent yet; call [`Provider::test_connection`] to
    /// verify the endpoint and credentials.
    pub fn new(config: &ProviderConfig) -> ProviderResult<Self> {
        let client = config.connect()?;
        Ok(Self { client })
    }

    /// The underlying management client, for callers that need an
    /// operation outside the managed resource kinds.
    #[must_use]
    pub fn client(&self) -> &MgmtClient {
        &self.client
    }

    /// Check endpoint and credentials, returning the broker version.
    pub async fn test_connection(&self, cancel: &CancellationToken) -> ProviderResult<String> {
        let who = self.client.whoami(cancel).await?;
        let overview = self.client.overview(cancel).await?;
        let version = overview.version().unwrap_or("unknown").to_string();
        info!(user = %who.name, version = %version, "connected to broker");
        Ok(version)
    }

    #[must_use]
    pub fn vhosts(&self) -> VhostResource {
        VhostResource::new(self.client.clone())
    }

    #[must_use]
    pub fn users(&self) -> UserResource {
        UserResource::new(self.client.clone())
    }

    #[must_use]
    pub fn permissions(&self) -> PermissionResource {
        PermissionResource::new(self.client.clone())
    }

    #[must_use]
    pub fn exchanges(&self) -> ExchangeResource {
        ExchangeResource::new(self.client.clone())
    }

    #[must_use]
    pub fn queues(&self) -> QueueResource {
        QueueResource::new(self.client.clone())
    }

    #[must_use]
    pub fn bindings(&self) -> BindingResource {
        BindingResource::new(self.client.clone())
    }

    #[must_use]
    pub fn policies(&self) -> PolicyResource {
        PolicyResource::new(self.client.clone())
    }

    #[must_use]
    pub fn shovels(&self) -> ShovelResource {
        ShovelResource::new(self.client.clone())
    }

    #[must_use]
    pub fn federation_upstreams(&self) -> FederationUpstreamResource {
        FederationUpstreamResource::new(self.client.clone())
    }

    #[must_use]
    pub fn federation_upstream_sets(&self) -> FederationUpstreamSetResource {
        FederationUpstreamSetResource::new(self.client.clone())
    }

    #[must_use]
    pub fn vhost_limits(&self) -> VhostLimitsResource {
        VhostLimitsResource::new(self.client.clone())
    }

    #[must_use]
    pub fn publishes(&self) -> PublishResource {
        PublishResource::new(self.client.clone())
    }

    #[must_use]
    pub fn purges(&self) -> PurgeResource {
        PurgeResource::new(self.client.clone())
    }
}
