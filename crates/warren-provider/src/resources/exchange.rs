//! Exchange resource.
//!
//! Exchanges are immutable once declared: the broker rejects a re-declare
//! with different settings, so there is no update path. A changed spec
//! means delete and create.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::info;
use warren_mgmt::{ExchangeInfo, ExchangeSettings, MgmtClient};

use crate::error::{ProviderError, ProviderResult};
use crate::import::two_parts;
use crate::resource::ManagedResource;
use crate::value::{from_arguments, to_arguments, Scalar};

use super::{absorb_not_found, observed_after_write};

const KNOWN_TYPES: &[&str] = &["direct", "fanout", "topic", "headers"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeSpec {
    pub vhost: String,
    pub name: String,
    #[serde(default = "default_type")]
    pub exchange_type: String,
    #[serde(default = "default_durable")]
    pub durable: bool,
    #[serde(default)]
    pub auto_delete: bool,
    #[serde(default)]
    pub internal: bool,
    #[serde(default)]
    pub arguments: BTreeMap<String, Scalar>,
}

fn default_type() -> String {
    "direct".to_string()
}

fn default_durable() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeState {
    pub vhost: String,
    pub name: String,
    pub exchange_type: String,
    pub durable: bool,
    pub auto_delete: bool,
    pub internal: bool,
    #[serde(default)]
    pub arguments: BTreeMap<String, Scalar>,
}

pub struct ExchangeResource {
    client: MgmtClient,
}

impl ExchangeResource {
    pub fn new(client: MgmtClient) -> Self {
        Self { client }
    }

    fn validate(spec: &ExchangeSpec) -> ProviderResult<()> {
        if spec.vhost.is_empty() {
            return Err(ProviderError::config("vhost", "vhost must not be empty"));
        }
        if spec.name.is_empty() {
            return Err(ProviderError::config(
                "name",
                "exchange name must not be empty",
            ));
        }
        if !KNOWN_TYPES.contains(&spec.exchange_type.as_str()) {
            return Err(ProviderError::config(
                "type",
                format!(
                    "unknown exchange type {:?}, expected one of {KNOWN_TYPES:?}",
                    spec.exchange_type
                ),
            ));
        }
        Ok(())
    }

    fn state_from(vhost: &str, info: ExchangeInfo) -> ExchangeState {
        ExchangeState {
            vhost: vhost.to_string(),
            name: info.name,
            exchange_type: info.kind,
            durable: info.durable,
            auto_delete: info.auto_delete,
            internal: info.internal,
            arguments: from_arguments(&info.arguments),
        }
    }
}

#[async_trait]
impl ManagedResource for ExchangeResource {
    type Spec = ExchangeSpec;
    type State = ExchangeState;

    const KIND: &'static str = "exchange";

    async fn create(
        &self,
        cancel: &CancellationToken,
        spec: &Self::Spec,
    ) -> ProviderResult<Self::State> {
        Self::validate(spec)?;
        info!(vhost = %spec.vhost, exchange = %spec.name, "declaring exchange");
        let settings = ExchangeSettings {
            kind: spec.exchange_type.clone(),
            durable: spec.durable,
            auto_delete: spec.auto_delete,
            internal: spec.internal,
            arguments: to_arguments(&spec.arguments),
        };
        self.client
            .upsert_exchange(cancel, &spec.vhost, &spec.name, &settings)
            .await?;
        let observed = self
            .client
            .get_exchange(cancel, &spec.vhost, &spec.name)
            .await?;
        let info = observed_after_write(observed, Self::KIND, &spec.name)?;
        Ok(Self::state_from(&spec.vhost, info))
    }

    async fn read(
        &self,
        cancel: &CancellationToken,
        state: &Self::State,
    ) -> ProviderResult<Option<Self::State>> {
        let observed = self
            .client
            .get_exchange(cancel, &state.vhost, &state.name)
            .await?;
        Ok(observed.map(|info| Self::state_from(&state.vhost, info)))
    }

    async fn delete(&self, cancel: &CancellationToken, state: &Self::State) -> ProviderResult<()> {
        info!(vhost = %state.vhost, exchange = %state.name, "deleting exchange");
        absorb_not_found(
            self.client
                .delete_exchange(cancel, &state.vhost, &state.name)
                .await,
        )
    }

    async fn import_state(
        &self,
        cancel: &CancellationToken,
        id: &str,
    ) -> ProviderResult<Self::State> {
        let (name, vhost) = two_parts(id, "name@vhost")?;
        let observed = self.client.get_exchange(cancel, vhost, name).await?;
        let info = observed.ok_or_else(|| ProviderError::missing(Self::KIND, id))?;
        Ok(Self::state_from(vhost, info))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> ExchangeSpec {
        ExchangeSpec {
            vhost: "/".into(),
            name: "events".into(),
            exchange_type: "topic".into(),
            durable: true,
            auto_delete: false,
            internal: false,
            arguments: BTreeMap::new(),
        }
    }

    #[test]
    fn unknown_type_is_rejected() {
        let mut bad = spec();
        bad.exchange_type = "x-random".into();
        let err = ExchangeResource::validate(&bad).unwrap_err();
        assert!(err.to_string().contains("x-random"));
    }

    #[test]
    fn all_four_types_pass() {
        for kind in KNOWN_TYPES {
            let mut ok = spec();
            ok.exchange_type = (*kind).into();
            assert!(ExchangeResource::validate(&ok).is_ok(), "type {kind}");
        }
    }

    #[test]
    fn spec_defaults_are_direct_and_durable() {
        let parsed: ExchangeSpec =
            serde_json::from_value(serde_json::json!({"vhost": "/", "name": "ex"})).unwrap();
        assert_eq!(parsed.exchange_type, "direct");
        assert!(parsed.durable);
        assert!(!parsed.auto_delete);
    }
}
