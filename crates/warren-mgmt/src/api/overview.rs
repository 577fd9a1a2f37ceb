//! Broker identity endpoints, used for connectivity checks.

use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::api::users::UserTags;
use crate::client::MgmtClient;
use crate::error::MgmtResult;
use crate::path::api_path;

/// Subset of `GET api/overview` worth surfacing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Overview {
    /// Version field as reported by LavinMQ.
    #[serde(default)]
    pub lavinmq_version: Option<String>,
    /// Version field as reported by RabbitMQ.
    #[serde(default)]
    pub rabbitmq_version: Option<String>,
    #[serde(default)]
    pub cluster_name: Option<String>,
    #[serde(default)]
    pub node: Option<String>,
}

impl Overview {
    /// Whichever version field the broker filled in.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.lavinmq_version
            .as_deref()
            .or(self.rabbitmq_version.as_deref())
    }
}

/// Response of `GET api/whoami`: the authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WhoAmI {
    pub name: String,
    #[serde(default)]
    pub tags: UserTags,
}

impl MgmtClient {
    /// Fetch broker metadata. Doubles as a liveness and credential probe.
    pub async fn overview(&self, cancel: &CancellationToken) -> MgmtResult<Overview> {
        self.get_json(cancel, &api_path(["overview"]), "overview")
            .await
    }

    /// Ask the broker who it thinks we are.
    pub async fn whoami(&self, cancel: &CancellationToken) -> MgmtResult<WhoAmI> {
        self.get_json(cancel, &api_path(["whoami"]), "whoami").await
    }
}
