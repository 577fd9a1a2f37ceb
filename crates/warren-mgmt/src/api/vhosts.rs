//! Virtual host operations.

use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::client::MgmtClient;
use crate::error::MgmtResult;
use crate::path::api_path;

/// A virtual host as reported by the broker.
///
/// The management API returns more fields (message counts, tracing state);
/// only the identity matters for control-plane reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VhostInfo {
    pub name: String,
}

impl MgmtClient {
    /// Create a vhost, or succeed if it already exists.
    ///
    /// The broker treats `PUT api/vhosts/{name}` as an upsert with no body.
    pub async fn upsert_vhost(&self, cancel: &CancellationToken, name: &str) -> MgmtResult<()> {
        self.put_empty(cancel, &api_path(["vhosts", name])).await
    }

    /// Fetch one vhost; `None` when the broker does not know it.
    pub async fn get_vhost(
        &self,
        cancel: &CancellationToken,
        name: &str,
    ) -> MgmtResult<Option<VhostInfo>> {
        self.get_optional(cancel, &api_path(["vhosts", name]), "vhost")
            .await
    }

    /// List every vhost on the broker.
    pub async fn list_vhosts(&self, cancel: &CancellationToken) -> MgmtResult<Vec<VhostInfo>> {
        self.get_json(cancel, &api_path(["vhosts"]), "vhost list")
            .await
    }

    /// Delete a vhost and everything in it.
    pub async fn delete_vhost(&self, cancel: &CancellationToken, name: &str) -> MgmtResult<()> {
        self.delete(cancel, &api_path(["vhosts", name])).await
    }
}
