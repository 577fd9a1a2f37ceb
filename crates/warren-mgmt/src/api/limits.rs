//! Per-vhost resource limits.
//!
//! The broker models limits as a sparse map: a key that is present caps
//! the resource, a key that is absent leaves it uncapped. Writes are
//! therefore per key, PUT to set and DELETE to lift.

use serde::Deserialize;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::client::MgmtClient;
use crate::error::{MgmtError, MgmtResult};
use crate::path::api_path;

/// Limit key capping concurrent connections.
pub const MAX_CONNECTIONS: &str = "max-connections";

/// Limit key capping declared queues.
pub const MAX_QUEUES: &str = "max-queues";

/// The limits of one vhost. `None` means uncapped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VhostLimits {
    pub max_connections: Option<i64>,
    pub max_queues: Option<i64>,
}

impl VhostLimits {
    /// The limits as (key, desired value) rows, in apply order.
    #[must_use]
    pub fn entries(&self) -> [(&'static str, Option<i64>); 2] {
        [
            (MAX_CONNECTIONS, self.max_connections),
            (MAX_QUEUES, self.max_queues),
        ]
    }

    /// Whether every limit is lifted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.max_connections.is_none() && self.max_queues.is_none()
    }
}

#[derive(Debug, Default, Deserialize)]
struct LimitValues {
    #[serde(rename = "max-connections", default)]
    max_connections: Option<i64>,
    #[serde(rename = "max-queues", default)]
    max_queues: Option<i64>,
}

/// Row shape of `GET api/vhost-limits/{vhost}`: one entry per vhost,
/// with the actual limits nested under `value`.
#[derive(Debug, Deserialize)]
struct VhostLimitsRow {
    vhost: String,
    #[serde(default)]
    value: LimitValues,
}

impl MgmtClient {
    /// Fetch the limits of one vhost.
    ///
    /// `None` means the vhost itself is unknown; a vhost with no limits
    /// set yields `Some(VhostLimits::default())`.
    pub async fn get_vhost_limits(
        &self,
        cancel: &CancellationToken,
        vhost: &str,
    ) -> MgmtResult<Option<VhostLimits>> {
        let rows: Option<Vec<VhostLimitsRow>> = self
            .get_optional(cancel, &api_path(["vhost-limits", vhost]), "vhost limits")
            .await?;
        Ok(rows.map(|rows| {
            rows.into_iter()
                .find(|row| row.vhost == vhost)
                .map(|row| VhostLimits {
                    max_connections: row.value.max_connections,
                    max_queues: row.value.max_queues,
                })
                .unwrap_or_default()
        }))
    }

    /// Cap one limit key.
    pub async fn set_vhost_limit(
        &self,
        cancel: &CancellationToken,
        vhost: &str,
        limit: &str,
        value: i64,
    ) -> MgmtResult<()> {
        let path = api_path(["vhost-limits", vhost, limit]);
        self.put_json(cancel, &path, &json!({ "value": value })).await
    }

    /// Lift one limit key.
    pub async fn clear_vhost_limit(
        &self,
        cancel: &CancellationToken,
        vhost: &str,
        limit: &str,
    ) -> MgmtResult<()> {
        self.delete(cancel, &api_path(["vhost-limits", vhost, limit]))
            .await
    }

    /// Drive the vhost's limits to `desired`, key by key.
    ///
    /// Present keys are PUT, absent keys are DELETEd. The broker rejects
    /// or 404s deletes of keys that were never set; those API errors are
    /// swallowed since the post-condition (key absent) already holds.
    pub async fn apply_vhost_limits(
        &self,
        cancel: &CancellationToken,
        vhost: &str,
        desired: &VhostLimits,
    ) -> MgmtResult<()> {
        for (limit, value) in desired.entries() {
            match value {
                Some(value) => self.set_vhost_limit(cancel, vhost, limit, value).await?,
                None => match self.clear_vhost_limit(cancel, vhost, limit).await {
                    Ok(()) => {}
                    Err(MgmtError::Api { status, .. }) => {
                        warn!(vhost, limit, status, "ignoring failed limit delete");
                    }
                    Err(err) => return Err(err),
                },
            }
        }
        Ok(())
    }
}
