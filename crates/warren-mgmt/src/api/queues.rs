//! Queue operations, including the pause/resume and purge actions.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;

use crate::client::MgmtClient;
use crate::error::MgmtResult;
use crate::path::api_path;

/// Desired state for `PUT api/queues/{vhost}/{name}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueueSettings {
    pub durable: bool,
    pub auto_delete: bool,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub arguments: Map<String, Value>,
}

impl Default for QueueSettings {
    fn default() -> Self {
        Self {
            durable: true,
            auto_delete: false,
            arguments: Map::new(),
        }
    }
}

/// A queue as reported by the broker.
///
/// `state` is observed, never declared: `running` normally, `paused`
/// after a pause action, plus transient states like `flow`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct QueueInfo {
    pub name: String,
    pub vhost: String,
    pub durable: bool,
    pub auto_delete: bool,
    #[serde(default)]
    pub arguments: Map<String, Value>,
    #[serde(default)]
    pub state: Option<String>,
}

impl QueueInfo {
    /// Whether the broker reports this queue as paused.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.state.as_deref() == Some("paused")
    }
}

impl MgmtClient {
    /// Declare a queue. As with exchanges, redeclaring with different
    /// settings fails on the broker side.
    pub async fn upsert_queue(
        &self,
        cancel: &CancellationToken,
        vhost: &str,
        name: &str,
        settings: &QueueSettings,
    ) -> MgmtResult<()> {
        self.put_json(cancel, &api_path(["queues", vhost, name]), settings)
            .await
    }

    /// Fetch one queue; `None` when the broker does not know it.
    pub async fn get_queue(
        &self,
        cancel: &CancellationToken,
        vhost: &str,
        name: &str,
    ) -> MgmtResult<Option<QueueInfo>> {
        self.get_optional(cancel, &api_path(["queues", vhost, name]), "queue")
            .await
    }

    /// List the queues inside one vhost.
    pub async fn list_queues(
        &self,
        cancel: &CancellationToken,
        vhost: &str,
    ) -> MgmtResult<Vec<QueueInfo>> {
        self.get_json(cancel, &api_path(["queues", vhost]), "queue list")
            .await
    }

    /// Delete a queue along with its messages.
    pub async fn delete_queue(
        &self,
        cancel: &CancellationToken,
        vhost: &str,
        name: &str,
    ) -> MgmtResult<()> {
        self.delete(cancel, &api_path(["queues", vhost, name])).await
    }

    /// Stop delivery from a queue. Consumers stay attached but receive
    /// nothing until the queue is resumed.
    pub async fn pause_queue(
        &self,
        cancel: &CancellationToken,
        vhost: &str,
        name: &str,
    ) -> MgmtResult<()> {
        self.put_empty(cancel, &api_path(["queues", vhost, name, "pause"]))
            .await
    }

    /// Resume delivery from a paused queue.
    pub async fn resume_queue(
        &self,
        cancel: &CancellationToken,
        vhost: &str,
        name: &str,
    ) -> MgmtResult<()> {
        self.put_empty(cancel, &api_path(["queues", vhost, name, "resume"]))
            .await
    }

    /// Drop every ready message in a queue.
    pub async fn purge_queue(
        &self,
        cancel: &CancellationToken,
        vhost: &str,
        name: &str,
    ) -> MgmtResult<()> {
        self.delete(cancel, &api_path(["queues", vhost, name, "contents"]))
            .await
    }
}
