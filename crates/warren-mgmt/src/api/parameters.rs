//! Runtime parameters, the storage layer for shovels and federation.
//!
//! A runtime parameter is an opaque JSON document filed under a component
//! name. The typed composites in [`crate::api::shovels`] and
//! [`crate::api::federation`] go through the untyped operations here and
//! re-decode the `value` member on the way out.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;

use crate::client::MgmtClient;
use crate::error::{MgmtError, MgmtResult};
use crate::path::api_path;

/// A runtime parameter as reported by the broker.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RuntimeParameterInfo {
    pub component: String,
    pub vhost: String,
    pub name: String,
    pub value: Value,
}

impl RuntimeParameterInfo {
    /// Decode the `value` member into a typed composite.
    pub fn decode_value<T: DeserializeOwned>(self, context: &'static str) -> MgmtResult<T> {
        serde_json::from_value(self.value).map_err(|e| MgmtError::decode(context, e))
    }
}

impl MgmtClient {
    /// Create or replace a runtime parameter. The broker stores whatever
    /// JSON it is handed; validation happens against the component's
    /// schema on its side.
    pub async fn upsert_parameter(
        &self,
        cancel: &CancellationToken,
        component: &str,
        vhost: &str,
        name: &str,
        value: &Value,
    ) -> MgmtResult<()> {
        let path = api_path(["parameters", component, vhost, name]);
        self.put_json(cancel, &path, &json!({ "value": value })).await
    }

    /// Fetch one runtime parameter; `None` when the broker does not know it.
    pub async fn get_parameter(
        &self,
        cancel: &CancellationToken,
        component: &str,
        vhost: &str,
        name: &str,
    ) -> MgmtResult<Option<RuntimeParameterInfo>> {
        let path = api_path(["parameters", component, vhost, name]);
        self.get_optional(cancel, &path, "runtime parameter").await
    }

    /// List the parameters of one component across vhosts.
    pub async fn list_parameters(
        &self,
        cancel: &CancellationToken,
        component: &str,
    ) -> MgmtResult<Vec<RuntimeParameterInfo>> {
        self.get_json(
            cancel,
            &api_path(["parameters", component]),
            "runtime parameter list",
        )
        .await
    }

    /// List the parameters of one component inside one vhost.
    pub async fn list_vhost_parameters(
        &self,
        cancel: &CancellationToken,
        component: &str,
        vhost: &str,
    ) -> MgmtResult<Vec<RuntimeParameterInfo>> {
        self.get_json(
            cancel,
            &api_path(["parameters", component, vhost]),
            "runtime parameter list",
        )
        .await
    }

    /// Delete a runtime parameter.
    pub async fn delete_parameter(
        &self,
        cancel: &CancellationToken,
        component: &str,
        vhost: &str,
        name: &str,
    ) -> MgmtResult<()> {
        self.delete(cancel, &api_path(["parameters", component, vhost, name]))
            .await
    }
}
