//! Federation upstream set resource.
//!
//! The spec side is a plain ordered list of upstream names; the wire
//! form wraps each in `{"upstream": name}`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::info;
use warren_mgmt::{MgmtClient, UpstreamSetMember};

use crate::error::{ProviderError, ProviderResult};
use crate::import::two_parts;
use crate::resource::ManagedResource;

use super::{absorb_not_found, observed_after_write};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FederationUpstreamSetSpec {
    pub vhost: String,
    pub name: String,
    /// Upstream names, in order.
    pub upstreams: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FederationUpstreamSetState {
    pub vhost: String,
    pub name: String,
    pub upstreams: Vec<String>,
}

pub struct FederationUpstreamSetResource {
    client: MgmtClient,
}

impl FederationUpstreamSetResource {
    pub fn new(client: MgmtClient) -> Self {
        Self { client }
    }

    fn validate(spec: &FederationUpstreamSetSpec) -> ProviderResult<()> {
        if spec.vhost.is_empty() {
            return Err(ProviderError::config("vhost", "vhost must not be empty"));
        }
        if spec.name.is_empty() {
            return Err(ProviderError::config("name", "set name must not be empty"));
        }
        if spec.upstreams.is_empty() {
            return Err(ProviderError::config(
                "upstreams",
                "an upstream set needs at least one upstream",
            ));
        }
        if spec.upstreams.iter().any(String::is_empty) {
            return Err(ProviderError::config(
                "upstreams",
                "upstream names must not be empty",
            ));
        }
        Ok(())
    }

    fn members(spec: &FederationUpstreamSetSpec) -> Vec<UpstreamSetMember> {
        spec.upstreams
            .iter()
            .map(UpstreamSetMember::new)
            .collect()
    }

    fn names(members: Vec<UpstreamSetMember>) -> Vec<String> {
        members.into_iter().map(|member| member.upstream).collect()
    }

    async fn apply(
        &self,
        cancel: &CancellationToken,
        spec: &FederationUpstreamSetSpec,
    ) -> ProviderResult<FederationUpstreamSetState> {
        Self::validate(spec)?;
        self.client
            .upsert_federation_upstream_set(cancel, &spec.vhost, &spec.name, &Self::members(spec))
            .await?;
        let observed = self
            .client
            .get_federation_upstream_set(cancel, &spec.vhost, &spec.name)
            .await?;
        let members = observed_after_write(observed, Self::KIND, &spec.name)?;
        Ok(FederationUpstreamSetState {
            vhost: spec.vhost.clone(),
            name: spec.name.clone(),
            upstreams: Self::names(members),
        })
    }
}

#[async_trait]
impl ManagedResource for FederationUpstreamSetResource {
    type Spec = FederationUpstreamSetSpec;
    type State = FederationUpstreamSetState;

    const KIND: &'static str = "federation upstream set";

    async fn create(
        &self,
        cancel: &CancellationToken,
        spec: &Self::Spec,
    ) -> ProviderResult<Self::State> {
        info!(vhost = %spec.vhost, set = %spec.name, "creating federation upstream set");
        self.apply(cancel, spec).await
    }

    async fn read(
        &self,
        cancel: &CancellationToken,
        state: &Self::State,
    ) -> ProviderResult<Option<Self::State>> {
        let observed = self
            .client
            .get_federation_upstream_set(cancel, &state.vhost, &state.name)
            .await?;
        Ok(observed.map(|members| FederationUpstreamSetState {
            vhost: state.vhost.clone(),
            name: state.name.clone(),
            upstreams: Self::names(members),
        }))
    }

    async fn update(
        &self,
        cancel: &CancellationToken,
        _state: &Self::State,
        spec: &Self::Spec,
    ) -> ProviderResult<Self::State> {
        info!(vhost = %spec.vhost, set = %spec.name, "replacing federation upstream set");
        self.apply(cancel, spec).await
    }

    async fn delete(&self, cancel: &CancellationToken, state: &Self::State) -> ProviderResult<()> {
        info!(vhost = %state.vhost, set = %state.name, "deleting federation upstream set");
        absorb_not_found(
            self.client
                .delete_federation_upstream_set(cancel, &state.vhost, &state.name)
                .await,
        )
    }

    async fn import_state(
        &self,
        cancel: &CancellationToken,
        id: &str,
    ) -> ProviderResult<Self::State> {
        let (vhost, name) = two_parts(id, "vhost@name")?;
        let observed = self
            .client
            .get_federation_upstream_set(cancel, vhost, name)
            .await?;
        let members = observed.ok_or_else(|| ProviderError::missing(Self::KIND, id))?;
        Ok(FederationUpstreamSetState {
            vhost: vhost.to_string(),
            name: name.to_string(),
            upstreams: Self::names(members),
        })
    }
}
