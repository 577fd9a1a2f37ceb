//! Binding operations.
//!
//! Bindings are the one entity the broker names for us: creation returns
//! no identifier, and the server-assigned `properties_key` only becomes
//! visible by listing the vhost afterwards. [`MgmtClient::find_binding`]
//! performs that lookup; callers keep the returned key to address the
//! binding later.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;

use crate::client::MgmtClient;
use crate::error::MgmtResult;
use crate::path::api_path;

/// What a binding points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DestinationType {
    Queue,
    Exchange,
}

impl DestinationType {
    /// The one-letter segment used in binding URLs (`q` or `e`).
    #[must_use]
    pub fn path_segment(self) -> &'static str {
        match self {
            Self::Queue => "q",
            Self::Exchange => "e",
        }
    }
}

impl std::fmt::Display for DestinationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Queue => f.write_str("queue"),
            Self::Exchange => f.write_str("exchange"),
        }
    }
}

impl std::str::FromStr for DestinationType {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "queue" => Ok(Self::Queue),
            "exchange" => Ok(Self::Exchange),
            other => Err(format!(
                "unknown destination type {other:?}, expected \"queue\" or \"exchange\""
            )),
        }
    }
}

/// Body for `POST api/bindings/{vhost}/e/{source}/{q|e}/{destination}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BindingSettings {
    pub routing_key: String,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub arguments: Map<String, Value>,
}

/// A binding as reported by the broker.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BindingInfo {
    pub source: String,
    pub vhost: String,
    pub destination: String,
    pub destination_type: DestinationType,
    #[serde(default)]
    pub routing_key: String,
    #[serde(default)]
    pub arguments: Map<String, Value>,
    #[serde(default)]
    pub properties_key: Option<String>,
}

impl BindingInfo {
    /// Whether this row describes the given endpoint tuple. Arguments do
    /// not participate; two bindings differing only in arguments carry
    /// distinct `properties_key` values on the broker.
    #[must_use]
    pub fn matches(
        &self,
        source: &str,
        destination: &str,
        destination_type: DestinationType,
        routing_key: &str,
    ) -> bool {
        self.source == source
            && self.destination == destination
            && self.destination_type == destination_type
            && self.routing_key == routing_key
    }
}

fn binding_path(
    vhost: &str,
    source: &str,
    destination_type: DestinationType,
    destination: &str,
    properties_key: Option<&str>,
) -> String {
    let mut segments = vec![
        "bindings",
        vhost,
        "e",
        source,
        destination_type.path_segment(),
        destination,
    ];
    if let Some(key) = properties_key {
        segments.push(key);
    }
    api_path(segments)
}

impl MgmtClient {
    /// Bind `destination` to the exchange `source`.
    ///
    /// The broker does not report which binding was created; follow up
    /// with [`MgmtClient::find_binding`] to learn its `properties_key`.
    pub async fn create_binding(
        &self,
        cancel: &CancellationToken,
        vhost: &str,
        source: &str,
        destination_type: DestinationType,
        destination: &str,
        settings: &BindingSettings,
    ) -> MgmtResult<()> {
        let path = binding_path(vhost, source, destination_type, destination, None);
        self.post_json(cancel, &path, settings).await
    }

    /// Fetch one binding by its full address; `None` when it is gone.
    pub async fn get_binding(
        &self,
        cancel: &CancellationToken,
        vhost: &str,
        source: &str,
        destination_type: DestinationType,
        destination: &str,
        properties_key: &str,
    ) -> MgmtResult<Option<BindingInfo>> {
        let path = binding_path(vhost, source, destination_type, destination, Some(properties_key));
        self.get_optional(cancel, &path, "binding").await
    }

    /// List every binding inside one vhost.
    pub async fn list_bindings(
        &self,
        cancel: &CancellationToken,
        vhost: &str,
    ) -> MgmtResult<Vec<BindingInfo>> {
        self.get_json(cancel, &api_path(["bindings", vhost]), "binding list")
            .await
    }

    /// List every binding on the broker.
    pub async fn list_all_bindings(
        &self,
        cancel: &CancellationToken,
    ) -> MgmtResult<Vec<BindingInfo>> {
        self.get_json(cancel, &api_path(["bindings"]), "binding list")
            .await
    }

    /// Locate a binding by endpoint tuple.
    ///
    /// Returns the first match in the broker's list order; when several
    /// bindings share the tuple (distinct arguments) they are otherwise
    /// indistinguishable from the tuple alone.
    pub async fn find_binding(
        &self,
        cancel: &CancellationToken,
        vhost: &str,
        source: &str,
        destination_type: DestinationType,
        destination: &str,
        routing_key: &str,
    ) -> MgmtResult<Option<BindingInfo>> {
        let bindings = self.list_bindings(cancel, vhost).await?;
        Ok(bindings
            .into_iter()
            .find(|b| b.matches(source, destination, destination_type, routing_key)))
    }

    /// Delete a binding by its full address.
    pub async fn delete_binding(
        &self,
        cancel: &CancellationToken,
        vhost: &str,
        source: &str,
        destination_type: DestinationType,
        destination: &str,
        properties_key: &str,
    ) -> MgmtResult<()> {
        let path = binding_path(vhost, source, destination_type, destination, Some(properties_key));
        self.delete(cancel, &path).await
    }
}
