//! Exchange operations.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;

use crate::client::MgmtClient;
use crate::error::MgmtResult;
use crate::path::api_path;

/// Desired state for `PUT api/exchanges/{vhost}/{name}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExchangeSettings {
    /// Exchange type: `direct`, `fanout`, `topic` or `headers`.
    #[serde(rename = "type")]
    pub kind: String,
    pub durable: bool,
    pub auto_delete: bool,
    pub internal: bool,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub arguments: Map<String, Value>,
}

impl Default for ExchangeSettings {
    fn default() -> Self {
        Self {
            kind: "direct".to_string(),
            durable: true,
            auto_delete: false,
            internal: false,
            arguments: Map::new(),
        }
    }
}

/// An exchange as reported by the broker.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExchangeInfo {
    pub name: String,
    pub vhost: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub durable: bool,
    pub auto_delete: bool,
    #[serde(default)]
    pub internal: bool,
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

impl MgmtClient {
    /// Declare an exchange. Redeclaring with identical settings is a no-op
    /// on the broker; changed settings are rejected with a 400.
    pub async fn upsert_exchange(
        &self,
        cancel: &CancellationToken,
        vhost: &str,
        name: &str,
        settings: &ExchangeSettings,
    ) -> MgmtResult<()> {
        self.put_json(cancel, &api_path(["exchanges", vhost, name]), settings)
            .await
    }

    /// Fetch one exchange; `None` when the broker does not know it.
    pub async fn get_exchange(
        &self,
        cancel: &CancellationToken,
        vhost: &str,
        name: &str,
    ) -> MgmtResult<Option<ExchangeInfo>> {
        self.get_optional(cancel, &api_path(["exchanges", vhost, name]), "exchange")
            .await
    }

    /// List the exchanges inside one vhost.
    pub async fn list_exchanges(
        &self,
        cancel: &CancellationToken,
        vhost: &str,
    ) -> MgmtResult<Vec<ExchangeInfo>> {
        self.get_json(cancel, &api_path(["exchanges", vhost]), "exchange list")
            .await
    }

    /// Delete an exchange.
    pub async fn delete_exchange(
        &self,
        cancel: &CancellationToken,
        vhost: &str,
        name: &str,
    ) -> MgmtResult<()> {
        self.delete(cancel, &api_path(["exchanges", vhost, name]))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_rename_type_and_drop_empty_arguments() {
        let settings = ExchangeSettings {
            kind: "topic".into(),
            ..ExchangeSettings::default()
        };
        let body = serde_json::to_value(&settings).expect("settings");
        assert_eq!(
            body,
            serde_json::json!({
                "type": "topic",
                "durable": true,
                "auto_delete": false,
                "internal": false
            })
        );
    }

    #[test]
    fn settings_keep_populated_arguments() {
        let mut arguments = Map::new();
        arguments.insert("alternate-exchange".into(), Value::from("fallback"));
        let settings = ExchangeSettings {
            arguments,
            ..ExchangeSettings::default()
        };
        let body = serde_json::to_value(&settings).expect("settings");
        assert_eq!(body["arguments"]["alternate-exchange"], "fallback");
    }

    #[test]
    fn info_tolerates_missing_internal_flag() {
        let info: ExchangeInfo = serde_json::from_str(
            r#"{"name":"amq.topic","vhost":"/","type":"topic","durable":true,"auto_delete":false}"#,
        )
        .expect("exchange info");
        assert!(!info.internal);
        assert!(info.arguments.is_empty());
    }
}
