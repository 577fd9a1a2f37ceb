//! One-shot queue purge.
//!
//! Like publish, purge is an action: create drops every ready message in
//! the queue, read echoes the recorded state, delete forgets it. The
//! queue itself is managed elsewhere.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::info;
use warren_mgmt::MgmtClient;

use crate::error::{ProviderError, ProviderResult};
use crate::resource::ManagedResource;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurgeSpec {
    pub vhost: String,
    pub queue: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurgeState {
    pub vhost: String,
    pub queue: String,
}

pub struct PurgeResource {
    client: MgmtClient,
}

impl PurgeResource {
    pub fn new(client: MgmtClient) -> Self {
        Self { client }
    }

    fn validate(spec: &PurgeSpec) -> ProviderResult<()> {
        if spec.vhost.is_empty() {
            return Err(ProviderError::config("vhost", "vhost must not be empty"));
        }
        if spec.queue.is_empty() {
            return Err(ProviderError::config("queue", "queue must not be empty"));
        }
        Ok(())
    }
}

#[async_trait]
impl ManagedResource for PurgeResource {
    type Spec = PurgeSpec;
    type State = PurgeState;

    const KIND: &'static str = "queue purge";

    async fn create(
        &self,
        cancel: &CancellationToken,
        spec: &Self::Spec,
    ) -> ProviderResult<Self::State> {
        Self::validate(spec)?;
        info!(vhost = %spec.vhost, queue = %spec.queue, "purging queue");
        self.client
            .purge_queue(cancel, &spec.vhost, &spec.queue)
            .await?;
        Ok(PurgeState {
            vhost: spec.vhost.clone(),
            queue: spec.queue.clone(),
        })
    }

    async fn read(
        &self,
        _cancel: &CancellationToken,
        state: &Self::State,
    ) -> ProviderResult<Option<Self::State>> {
        Ok(Some(state.clone()))
    }

    async fn update(
        &self,
        _cancel: &CancellationToken,
        state: &Self::State,
        _spec: &Self::Spec,
    ) -> ProviderResult<Self::State> {
        Ok(state.clone())
    }

    async fn delete(&self, _cancel: &CancellationToken, state: &Self::State) -> ProviderResult<()> {
        info!(queue = %state.queue, "forgetting queue purge");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_queue_is_rejected() {
        let err = PurgeResource::validate(&PurgeSpec {
            vhost: "/".into(),
            queue: String::new(),
        })
        .unwrap_err();
        assert!(err.to_string().contains("queue"));
    }
}
