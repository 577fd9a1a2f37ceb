//! Federation upstreams and upstream sets, stored as runtime parameters.

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::client::MgmtClient;
use crate::error::{MgmtError, MgmtResult};

/// Component name for single upstreams.
pub const FEDERATION_UPSTREAM_COMPONENT: &str = "federation-upstream";

/// Component name for named groups of upstreams.
pub const FEDERATION_UPSTREAM_SET_COMPONENT: &str = "federation-upstream-set";

fn default_ack_mode() -> String {
    "on-confirm".to_string()
}

/// A federation upstream definition.
///
/// Like shovels, brokers echo unset knobs back as `0`/`""`;
/// [`FederationUpstreamDefinition::normalized`] restores absence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FederationUpstreamDefinition {
    pub uri: String,
    #[serde(
        rename = "prefetch-count",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub prefetch_count: Option<i64>,
    #[serde(
        rename = "reconnect-delay",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub reconnect_delay: Option<i64>,
    #[serde(rename = "ack-mode", default = "default_ack_mode")]
    pub ack_mode: String,
    /// Exchange to federate; unset means "same name as the downstream".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exchange: Option<String>,
    #[serde(rename = "max-hops", default, skip_serializing_if = "Option::is_none")]
    pub max_hops: Option<i64>,
    /// Milliseconds the upstream keeps its internal queue after disconnect.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<i64>,
    #[serde(
        rename = "message-ttl",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub message_ttl: Option<i64>,
    /// Queue to federate; unset means "same name as the downstream".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue: Option<String>,
    #[serde(
        rename = "consumer-tag",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub consumer_tag: Option<String>,
}

impl FederationUpstreamDefinition {
    /// Fold broker zero-values back into absence.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        for field in [
            &mut self.prefetch_count,
            &mut self.reconnect_delay,
            &mut self.max_hops,
            &mut self.expires,
            &mut self.message_ttl,
        ] {
            *field = field.filter(|&n| n != 0);
        }
        for field in [&mut self.exchange, &mut self.queue, &mut self.consumer_tag] {
            if field.as_deref() == Some("") {
                *field = None;
            }
        }
        if self.ack_mode.is_empty() {
            self.ack_mode = default_ack_mode();
        }
        self
    }
}

/// One entry of a federation upstream set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamSetMember {
    pub upstream: String,
}

impl UpstreamSetMember {
    #[must_use]
    pub fn new(upstream: impl Into<String>) -> Self {
        Self {
            upstream: upstream.into(),
        }
    }
}

impl MgmtClient {
    /// Create or replace a federation upstream.
    pub async fn upsert_federation_upstream(
        &self,
        cancel: &CancellationToken,
        vhost: &str,
        name: &str,
        definition: &FederationUpstreamDefinition,
    ) -> MgmtResult<()> {
        let value = serde_json::to_value(definition)
            .map_err(|e| MgmtError::decode("federation upstream definition", e))?;
        self.upsert_parameter(cancel, FEDERATION_UPSTREAM_COMPONENT, vhost, name, &value)
            .await
    }

    /// Fetch one federation upstream, normalized; `None` when it is gone.
    pub async fn get_federation_upstream(
        &self,
        cancel: &CancellationToken,
        vhost: &str,
        name: &str,
    ) -> MgmtResult<Option<FederationUpstreamDefinition>> {
        match self
            .get_parameter(cancel, FEDERATION_UPSTREAM_COMPONENT, vhost, name)
            .await?
        {
            Some(info) => {
                let definition: FederationUpstreamDefinition =
                    info.decode_value("federation upstream definition")?;
                Ok(Some(definition.normalized()))
            }
            None => Ok(None),
        }
    }

    /// Delete a federation upstream.
    pub async fn delete_federation_upstream(
        &self,
        cancel: &CancellationToken,
        vhost: &str,
        name: &str,
    ) -> MgmtResult<()> {
        self.delete_parameter(cancel, FEDERATION_UPSTREAM_COMPONENT, vhost, name)
            .await
    }

    /// Create or replace a federation upstream set.
    pub async fn upsert_federation_upstream_set(
        &self,
        cancel: &CancellationToken,
        vhost: &str,
        name: &str,
        members: &[UpstreamSetMember],
    ) -> MgmtResult<()> {
        let value = serde_json::to_value(members)
            .map_err(|e| MgmtError::decode("federation upstream set", e))?;
        self.upsert_parameter(
            cancel,
            FEDERATION_UPSTREAM_SET_COMPONENT,
            vhost,
            name,
            &value,
        )
        .await
    }

    /// Fetch one federation upstream set; `None` when it is gone.
    pub async fn get_federation_upstream_set(
        &self,
        cancel: &CancellationToken,
        vhost: &str,
        name: &str,
    ) -> MgmtResult<Option<Vec<UpstreamSetMember>>> {
        match self
            .get_parameter(cancel, FEDERATION_UPSTREAM_SET_COMPONENT, vhost, name)
            .await?
        {
            Some(info) => Ok(Some(info.decode_value("federation upstream set")?)),
            None => Ok(None),
        }
    }

    /// Delete a federation upstream set.
    pub async fn delete_federation_upstream_set(
        &self,
        cancel: &CancellationToken,
        vhost: &str,
        name: &str,
    ) -> MgmtResult<()> {
        self.delete_parameter(cancel, FEDERATION_UPSTREAM_SET_COMPONENT, vhost, name)
            .await
    }
}
