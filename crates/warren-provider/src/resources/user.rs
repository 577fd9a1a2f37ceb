//! Broker user resource.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::info;
use warren_mgmt::{MgmtClient, UserSettings, UserTags};

use crate::error::{ProviderError, ProviderResult};
use crate::import::bare_name;
use crate::resource::ManagedResource;
use crate::resources::{absorb_not_found, observed_after_write};

/// Tags the broker understands. Anything else is a typo we can catch
/// before it reaches the wire.
const KNOWN_TAGS: &[&str] = &[
    "administrator",
    "monitoring",
    "management",
    "policymaker",
    "impersonator",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    /// `None` leaves the broker's tags untouched; an empty list clears
    /// them. The two are distinct on the wire.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserState {
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Salted hash as reported by the broker. Never the cleartext password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
}

pub struct UserResource {
    client: MgmtClient,
}

impl UserResource {
    pub fn new(client: MgmtClient) -> Self {
        Self { client }
    }

    fn validate(spec: &UserSpec) -> ProviderResult<()> {
        if spec.name.is_empty() {
            return Err(ProviderError::config("name", "user name must not be empty"));
        }
        if spec.password.is_some() && spec.password_hash.is_some() {
            return Err(ProviderError::config(
                "password",
                "password and password_hash are mutually exclusive",
            ));
        }
        for tag in spec.tags.iter().flatten() {
            if !KNOWN_TAGS.contains(&tag.as_str()) {
                return Err(ProviderError::config(
                    "tags",
                    format!("unknown user tag {tag:?}, expected one of {KNOWN_TAGS:?}"),
                ));
            }
        }
        Ok(())
    }

    fn settings(spec: &UserSpec) -> UserSettings {
        UserSettings {
            password: spec.password.clone(),
            password_hash: spec.password_hash.clone(),
            tags: spec.tags.clone().map(UserTags::new),
        }
    }

    async fn apply(
        &self,
        cancel: &CancellationToken,
        spec: &UserSpec,
    ) -> ProviderResult<UserState> {
        Self::validate(spec)?;
        self.client
            .upsert_user(cancel, &spec.name, &Self::settings(spec))
            .await?;
        let observed = self.client.get_user(cancel, &spec.name).await?;
        let info = observed_after_write(observed, Self::KIND, &spec.name)?;
        Ok(UserState {
            name: info.name,
            tags: info.tags.0,
            password_hash: info.password_hash,
        })
    }
}

#[async_trait]
impl ManagedResource for UserResource {
    type Spec = UserSpec;
    type State = UserState;

    const KIND: &'static str = "user";

    async fn create(
        &self,
        cancel: &CancellationToken,
        spec: &Self::Spec,
    ) -> ProviderResult<Self::State> {
        info!(user = %spec.name, "creating user");
        self.apply(cancel, spec).await
    }

    async fn read(
        &self,
        cancel: &CancellationToken,
        state: &Self::State,
    ) -> ProviderResult<Option<Self::State>> {
        let observed = self.client.get_user(cancel, &state.name).await?;
        Ok(observed.map(|info| UserState {
            name: info.name,
            tags: info.tags.0,
            password_hash: info.password_hash,
        }))
    }

    async fn update(
        &self,
        cancel: &CancellationToken,
        _state: &Self::State,
        spec: &Self::Spec,
    ) -> ProviderResult<Self::State> {
        info!(user = %spec.name, "updating user");
        self.apply(cancel, spec).await
    }

    async fn delete(&self, cancel: &CancellationToken, state: &Self::State) -> ProviderResult<()> {
        info!(user = %state.name, "deleting user");
        absorb_not_found(self.client.delete_user(cancel, &state.name).await)
    }

    async fn import_state(
        &self,
        cancel: &CancellationToken,
        id: &str,
    ) -> ProviderResult<Self::State> {
        let name = bare_name(id, "user name")?;
        let observed = self.client.get_user(cancel, name).await?;
        let info = observed.ok_or_else(|| ProviderError::missing(Self::KIND, id))?;
        Ok(UserState {
            name: info.name,
            tags: info.tags.0,
            password_hash: info.password_hash,
        })
    }
}
