//! Dynamic shovels, stored as `shovel` runtime parameters.

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::client::MgmtClient;
use crate::error::{MgmtError, MgmtResult};
use crate::path::api_path;

/// Component name shovel definitions are filed under.
pub const SHOVEL_COMPONENT: &str = "shovel";

fn default_ack_mode() -> String {
    "on-confirm".to_string()
}

/// A shovel definition, as stored in the parameter's `value` member.
///
/// Exactly one of `src_queue`/`src_exchange` should be set, and likewise
/// for the destination; the broker rejects definitions that set both.
/// Brokers echo unset numeric knobs back as `0` and unset strings as
/// `""`; [`ShovelDefinition::normalized`] folds those back to `None` so
/// reads compare equal to what was written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShovelDefinition {
    #[serde(rename = "src-uri")]
    pub src_uri: String,
    #[serde(rename = "src-queue", default, skip_serializing_if = "Option::is_none")]
    pub src_queue: Option<String>,
    #[serde(rename = "src-exchange", default, skip_serializing_if = "Option::is_none")]
    pub src_exchange: Option<String>,
    #[serde(
        rename = "src-exchange-key",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub src_exchange_key: Option<String>,
    #[serde(
        rename = "src-prefetch-count",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub src_prefetch_count: Option<i64>,
    /// `never` keeps the shovel alive; `queue-length` deletes it once the
    /// initial backlog has drained.
    #[serde(
        rename = "src-delete-after",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub src_delete_after: Option<String>,
    #[serde(rename = "dest-uri")]
    pub dest_uri: String,
    #[serde(rename = "dest-queue", default, skip_serializing_if = "Option::is_none")]
    pub dest_queue: Option<String>,
    #[serde(
        rename = "dest-exchange",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub dest_exchange: Option<String>,
    #[serde(
        rename = "dest-exchange-key",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub dest_exchange_key: Option<String>,
    #[serde(
        rename = "reconnect-delay",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub reconnect_delay: Option<i64>,
    #[serde(rename = "ack-mode", default = "default_ack_mode")]
    pub ack_mode: String,
}

impl ShovelDefinition {
    /// Fold broker zero-values back into absence.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.src_prefetch_count = self.src_prefetch_count.filter(|&n| n != 0);
        self.reconnect_delay = self.reconnect_delay.filter(|&n| n != 0);
        for field in [
            &mut self.src_queue,
            &mut self.src_exchange,
            &mut self.src_exchange_key,
            &mut self.src_delete_after,
            &mut self.dest_queue,
            &mut self.dest_exchange,
            &mut self.dest_exchange_key,
        ] {
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

impl MgmtClient {
    /// Create or replace a shovel definition.
    pub async fn upsert_shovel(
        &self,
        cancel: &CancellationToken,
        vhost: &str,
        name: &str,
        definition: &ShovelDefinition,
    ) -> MgmtResult<()> {
        let value = serde_json::to_value(definition)
            .map_err(|e| MgmtError::decode("shovel definition", e))?;
        self.upsert_parameter(cancel, SHOVEL_COMPONENT, vhost, name, &value)
            .await
    }

    /// Fetch one shovel definition, normalized; `None` when it is gone.
    pub async fn get_shovel(
        &self,
        cancel: &CancellationToken,
        vhost: &str,
        name: &str,
    ) -> MgmtResult<Option<ShovelDefinition>> {
        match self
            .get_parameter(cancel, SHOVEL_COMPONENT, vhost, name)
            .await?
        {
            Some(info) => {
                let definition: ShovelDefinition = info.decode_value("shovel definition")?;
                Ok(Some(definition.normalized()))
            }
            None => Ok(None),
        }
    }

    /// Delete a shovel definition, stopping the shovel.
    pub async fn delete_shovel(
        &self,
        cancel: &CancellationToken,
        vhost: &str,
        name: &str,
    ) -> MgmtResult<()> {
        self.delete_parameter(cancel, SHOVEL_COMPONENT, vhost, name)
            .await
    }

    /// Pause a running shovel without deleting its definition.
    pub async fn pause_shovel(
        &self,
        cancel: &CancellationToken,
        vhost: &str,
        name: &str,
    ) -> MgmtResult<()> {
        self.put_empty(cancel, &api_path(["shovels", vhost, name, "pause"]))
            .await
    }

    /// Resume a paused shovel.
    pub async fn resume_shovel(
        &self,
        cancel: &CancellationToken,
        vhost: &str,
        name: &str,
    ) -> MgmtResult<()> {
        self.put_empty(cancel, &api_path(["shovels", vhost, name, "resume"]))
            .await
    }
}
