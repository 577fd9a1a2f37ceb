//! Binding resource.
//!
//! The broker assigns binding identity itself: a create returns no key,
//! so the reconciler lists the vhost to recover the `properties_key` and
//! then re-reads the binding at its full address before trusting it.
//! Bindings cannot be changed in place; a different spec is a new
//! binding.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::info;
use warren_mgmt::{BindingInfo, BindingSettings, DestinationType, MgmtClient};

use crate::error::{ProviderError, ProviderResult};
use crate::import::five_parts;
use crate::resource::ManagedResource;
use crate::value::{from_arguments, to_arguments, Scalar};

use super::{absorb_not_found, observed_after_write};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BindingSpec {
    pub vhost: String,
    /// Source exchange.
    pub source: String,
    pub destination: String,
    /// `"queue"` or `"exchange"`.
    pub destination_type: String,
    #[serde(default)]
    pub routing_key: String,
    #[serde(default)]
    pub arguments: BTreeMap<String, Scalar>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BindingState {
    pub vhost: String,
    pub source: String,
    pub destination: String,
    pub destination_type: String,
    pub routing_key: String,
    #[serde(default)]
    pub arguments: BTreeMap<String, Scalar>,
    /// Server-assigned key, the last segment of the binding's address.
    pub properties_key: String,
}

pub struct BindingResource {
    client: MgmtClient,
}

impl BindingResource {
    pub fn new(client: MgmtClient) -> Self {
        Self { client }
    }

    fn validate(spec: &BindingSpec) -> ProviderResult<DestinationType> {
        if spec.vhost.is_empty() {
            return Err(ProviderError::config("vhost", "vhost must not be empty"));
        }
        if spec.source.is_empty() {
            return Err(ProviderError::config(
                "source",
                "source exchange must not be empty",
            ));
        }
        if spec.destination.is_empty() {
            return Err(ProviderError::config(
                "destination",
                "destination must not be empty",
            ));
        }
        parse_destination_type(&spec.destination_type)
    }

    fn state_from(info: BindingInfo, properties_key: String) -> BindingState {
        BindingState {
            vhost: info.vhost,
            source: info.source,
            destination: info.destination,
            destination_type: info.destination_type.to_string(),
            routing_key: info.routing_key,
            arguments: from_arguments(&info.arguments),
            properties_key,
        }
    }

    fn address(state: &BindingState) -> ProviderResult<DestinationType> {
        parse_destination_type(&state.destination_type)
    }
}

fn parse_destination_type(raw: &str) -> ProviderResult<DestinationType> {
    raw.parse()
        .map_err(|message: String| ProviderError::config("destination_type", message))
}

#[async_trait]
impl ManagedResource for BindingResource {
    type Spec = BindingSpec;
    type State = BindingState;

    const KIND: &'static str = "binding";

    async fn create(
        &self,
        cancel: &CancellationToken,
        spec: &Self::Spec,
    ) -> ProviderResult<Self::State> {
        let destination_type = Self::validate(spec)?;
        info!(
            vhost = %spec.vhost,
            source = %spec.source,
            destination = %spec.destination,
            routing_key = %spec.routing_key,
            "creating binding"
        );
        let settings = BindingSettings {
            routing_key: spec.routing_key.clone(),
            arguments: to_arguments(&spec.arguments),
        };
        self.client
            .create_binding(
                cancel,
                &spec.vhost,
                &spec.source,
                destination_type,
                &spec.destination,
                &settings,
            )
            .await?;

        // The POST reports nothing back; recover the server-assigned key
        // by listing, then confirm the binding answers at that address.
        let found = self
            .client
            .find_binding(
                cancel,
                &spec.vhost,
                &spec.source,
                destination_type,
                &spec.destination,
                &spec.routing_key,
            )
            .await?
            .ok_or_else(|| {
                ProviderError::identity(
                    Self::KIND,
                    format!(
                        "binding {} -> {} not listed after create",
                        spec.source, spec.destination
                    ),
                )
            })?;
        let properties_key = found.properties_key.clone().ok_or_else(|| {
            ProviderError::identity(Self::KIND, "broker listed the binding without a properties_key")
        })?;

        let observed = self
            .client
            .get_binding(
                cancel,
                &spec.vhost,
                &spec.source,
                destination_type,
                &spec.destination,
                &properties_key,
            )
            .await?;
        let info = observed_after_write(observed, Self::KIND, &properties_key)?;
        Ok(Self::state_from(info, properties_key))
    }

    async fn read(
        &self,
        cancel: &CancellationToken,
        state: &Self::State,
    ) -> ProviderResult<Option<Self::State>> {
        let destination_type = Self::address(state)?;
        let observed = self
            .client
            .get_binding(
                cancel,
                &state.vhost,
                &state.source,
                destination_type,
                &state.destination,
                &state.properties_key,
            )
            .await?;
        Ok(observed.map(|info| Self::state_from(info, state.properties_key.clone())))
    }

    async fn delete(&self, cancel: &CancellationToken, state: &Self::State) -> ProviderResult<()> {
        let destination_type = Self::address(state)?;
        info!(
            vhost = %state.vhost,
            source = %state.source,
            destination = %state.destination,
            properties_key = %state.properties_key,
            "deleting binding"
        );
        absorb_not_found(
            self.client
                .delete_binding(
                    cancel,
                    &state.vhost,
                    &state.source,
                    destination_type,
                    &state.destination,
                    &state.properties_key,
                )
                .await,
        )
    }

    async fn import_state(
        &self,
        cancel: &CancellationToken,
        id: &str,
    ) -> ProviderResult<Self::State> {
        let (vhost, source, destination, destination_type, properties_key) =
            five_parts(id, "vhost@source@destination@destination_type@properties_key")?;
        let destination_type = parse_destination_type(destination_type)?;
        let observed = self
            .client
            .get_binding(
                cancel,
                vhost,
                source,
                destination_type,
                destination,
                properties_key,
            )
            .await?;
        let info = observed.ok_or_else(|| ProviderError::missing(Self::KIND, id))?;
        Ok(Self::state_from(info, properties_key.to_string()))
    }
}
