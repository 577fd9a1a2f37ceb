//! Operator policy operations.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;

use crate::client::MgmtClient;
use crate::error::MgmtResult;
use crate::path::api_path;

/// Desired state for `PUT api/policies/{vhost}/{name}`.
///
/// `apply_to` takes `all`, `queues` or `exchanges`; the wire name is
/// dashed. Higher `priority` wins when several policies match an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyDefinition {
    pub pattern: String,
    #[serde(rename = "apply-to")]
    pub apply_to: String,
    #[serde(default)]
    pub priority: i64,
    pub definition: Map<String, Value>,
}

/// A policy as reported by the broker.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PolicyInfo {
    pub name: String,
    pub vhost: String,
    pub pattern: String,
    #[serde(rename = "apply-to")]
    pub apply_to: String,
    #[serde(default)]
    pub priority: i64,
    pub definition: Map<String, Value>,
}

impl MgmtClient {
    /// Create or replace a policy.
    pub async fn upsert_policy(
        &self,
        cancel: &CancellationToken,
        vhost: &str,
        name: &str,
        definition: &PolicyDefinition,
    ) -> MgmtResult<()> {
        self.put_json(cancel, &api_path(["policies", vhost, name]), definition)
            .await
    }

    /// Fetch one policy; `None` when the broker does not know it.
    pub async fn get_policy(
        &self,
        cancel: &CancellationToken,
        vhost: &str,
        name: &str,
    ) -> MgmtResult<Option<PolicyInfo>> {
        self.get_optional(cancel, &api_path(["policies", vhost, name]), "policy")
            .await
    }

    /// List the policies inside one vhost.
    pub async fn list_policies(
        &self,
        cancel: &CancellationToken,
        vhost: &str,
    ) -> MgmtResult<Vec<PolicyInfo>> {
        self.get_json(cancel, &api_path(["policies", vhost]), "policy list")
            .await
    }

    /// Delete a policy.
    pub async fn delete_policy(
        &self,
        cancel: &CancellationToken,
        vhost: &str,
        name: &str,
    ) -> MgmtResult<()> {
        self.delete(cancel, &api_path(["policies", vhost, name]))
            .await
    }
}
