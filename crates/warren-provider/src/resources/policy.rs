//! Operator policy resource.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::info;
use warren_mgmt::{MgmtClient, PolicyDefinition, PolicyInfo};

use crate::error::{ProviderError, ProviderResult};
use crate::import::two_parts;
use crate::resource::ManagedResource;
use crate::value::{from_arguments, to_arguments, Scalar};

use super::{absorb_not_found, observed_after_write};

const KNOWN_TARGETS: &[&str] = &["all", "queues", "exchanges"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicySpec {
    pub vhost: String,
    pub name: String,
    /// Regex matched against entity names.
    pub pattern: String,
    #[serde(default = "default_apply_to")]
    pub apply_to: String,
    #[serde(default)]
    pub priority: i64,
    pub definition: BTreeMap<String, Scalar>,
}

fn default_apply_to() -> String {
    "all".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyState {
    pub vhost: String,
    pub name: String,
    pub pattern: String,
    pub apply_to: String,
    pub priority: i64,
    pub definition: BTreeMap<String, Scalar>,
}

pub struct PolicyResource {
    client: MgmtClient,
}

impl PolicyResource {
    pub fn new(client: MgmtClient) -> Self {
        Self { client }
    }

    fn validate(spec: &PolicySpec) -> ProviderResult<()> {
        if spec.vhost.is_empty() {
            return Err(ProviderError::config("vhost", "vhost must not be empty"));
        }
        if spec.name.is_empty() {
            return Err(ProviderError::config(
                "name",
                "policy name must not be empty",
            ));
        }
        if spec.pattern.is_empty() {
            return Err(ProviderError::config(
                "pattern",
                "policy pattern must not be empty",
            ));
        }
        if !KNOWN_TARGETS.contains(&spec.apply_to.as_str()) {
            return Err(ProviderError::config(
                "apply_to",
                format!(
                    "unknown apply_to {:?}, expected one of {KNOWN_TARGETS:?}",
                    spec.apply_to
                ),
            ));
        }
        if spec.definition.is_empty() {
            return Err(ProviderError::config(
                "definition",
                "policy definition must not be empty",
            ));
        }
        Ok(())
    }

    fn state_from(info: PolicyInfo) -> PolicyState {
        PolicyState {
            vhost: info.vhost,
            name: info.name,
            pattern: info.pattern,
            apply_to: info.apply_to,
            priority: info.priority,
            definition: from_arguments(&info.definition),
        }
    }

    async fn apply(
        &self,
        cancel: &CancellationToken,
        spec: &PolicySpec,
    ) -> ProviderResult<PolicyState> {
        Self::validate(spec)?;
        let definition = PolicyDefinition {
            pattern: spec.pattern.clone(),
            apply_to: spec.apply_to.clone(),
            priority: spec.priority,
            definition: to_arguments(&spec.definition),
        };
        self.client
            .upsert_policy(cancel, &spec.vhost, &spec.name, &definition)
            .await?;
        let observed = self
            .client
            .get_policy(cancel, &spec.vhost, &spec.name)
            .await?;
        let info = observed_after_write(observed, Self::KIND, &spec.name)?;
        Ok(Self::state_from(info))
    }
}

#[async_trait]
impl ManagedResource for PolicyResource {
    type Spec = PolicySpec;
    type State = PolicyState;

    const KIND: &'static str = "policy";

    async fn create(
        &self,
        cancel: &CancellationToken,
        spec: &Self::Spec,
    ) -> ProviderResult<Self::State> {
        info!(vhost = %spec.vhost, policy = %spec.name, "creating policy");
        self.apply(cancel, spec).await
    }

    async fn read(
        &self,
        cancel: &CancellationToken,
        state: &Self::State,
    ) -> ProviderResult<Option<Self::State>> {
        let observed = self
            .client
            .get_policy(cancel, &state.vhost, &state.name)
            .await?;
        Ok(observed.map(Self::state_from))
    }

    async fn update(
        &self,
        cancel: &CancellationToken,
        _state: &Self::State,
        spec: &Self::Spec,
    ) -> ProviderResult<Self::State> {
        info!(vhost = %spec.vhost, policy = %spec.name, "replacing policy");
        self.apply(cancel, spec).await
    }

    async fn delete(&self, cancel: &CancellationToken, state: &Self::State) -> ProviderResult<()> {
        info!(vhost = %state.vhost, policy = %state.name, "deleting policy");
        absorb_not_found(
            self.client
                .delete_policy(cancel, &state.vhost, &state.name)
                .await,
        )
    }

    async fn import_state(
        &self,
        cancel: &CancellationToken,
        id: &str,
    ) -> ProviderResult<Self::State> {
        let (name, vhost) = two_parts(id, "name@vhost")?;
        let observed = self.client.get_policy(cancel, vhost, name).await?;
        let info = observed.ok_or_else(|| ProviderError::missing(Self::KIND, id))?;
        Ok(Self::state_from(info))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> PolicySpec {
        let mut definition = BTreeMap::new();
        definition.insert("message-ttl".to_string(), Scalar::Integer(60_000));
        PolicySpec {
            vhost: "/".into(),
            name: "ttl".into(),
            pattern: "^jobs\\.".into(),
            apply_to: "queues".into(),
            priority: 5,
            definition,
        }
    }

    #[test]
    fn unknown_apply_to_is_rejected() {
        let mut bad = spec();
        bad.apply_to = "streams".into();
        let err = PolicyResource::validate(&bad).unwrap_err();
        assert!(err.to_string().contains("streams"));
    }

    #[test]
    fn empty_definition_is_rejected() {
        let mut bad = spec();
        bad.definition.clear();
        let err = PolicyResource::validate(&bad).unwrap_err();
        assert!(err.to_string().contains("definition"));
    }

    #[test]
    fn apply_to_defaults_to_all() {
        let parsed: PolicySpec = serde_json::from_value(serde_json::json!({
            "vhost": "/",
            "name": "ttl",
            "pattern": ".*",
            "definition": {"max-length": 1000}
        }))
        .unwrap();
        assert_eq!(parsed.apply_to, "all");
        assert_eq!(parsed.priority, 0);
    }
}
