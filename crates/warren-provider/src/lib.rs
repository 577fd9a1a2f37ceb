//! Declarative reconciliation of broker control-plane state.
//!
//! This crate turns the typed management client in [`warren_mgmt`] into a
//! set of managed resources the orchestration host can drive: each kind
//! implements [`ManagedResource`] with `create`, `read`, `update`,
//! `delete` and `import_state`, all cancellable through a
//! [`tokio_util::sync::CancellationToken`].
//!
//! The shared discipline across kinds:
//!
//! - Mutations re-read the object afterwards and persist what the broker
//!   reports, so broker-side defaulting lands in state immediately.
//! - A read of a vanished object returns `Ok(None)`; the host drops the
//!   state and plans recreation.
//! - Spec validation (required fields, closed vocabularies, mutual
//!   exclusions) runs before any HTTP request.
//!
//! Start from [`ProviderConfig`] and [`Provider`]:
//!
//! ```no_run
//! use tokio_util::sync::CancellationToken;
//! use warren_provider::{Provider, ProviderConfig};
//!
//! # async fn demo() -> Result<(), warren_provider::ProviderError> {
//! let config = ProviderConfig {
//!     endpoint: "http://localhost:15672".into(),
//!     username: "guest".into(),
//!     password: "guest".into(),
//!     user_agent: None,
//! };
//! let provider = Provider::new(&config)?;
//! let version = provider.test_connection(&CancellationToken::new()).await?;
//! println!("broker {version}");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod provider;
pub mod resource;
pub mod resources;
pub mod value;

mod import;

pub use config::ProviderConfig;
pub use error::{ProviderError, ProviderResult};
pub use provider::Provider;
pub use resource::ManagedResource;
pub use value::Scalar;

pub use resources::binding::{BindingResource, BindingSpec, BindingState};
pub use resources::exchange::{ExchangeResource, ExchangeSpec, ExchangeState};
pub use resources::federation_upstream::{
    FederationUpstreamResource, FederationUpstreamSpec, FederationUpstreamState,
};
pub use resources::federation_upstream_set::{
    FederationUpstreamSetResource, FederationUpstreamSetSpec, FederationUpstreamSetState,
};
pub use resources::permission::{PermissionResource, PermissionSpec, PermissionState};
pub use resources::policy::{PolicyResource, PolicySpec, PolicyState};
pub use resources::publish::{PublishResource, PublishSpec, PublishState};
pub use resources::purge::{PurgeResource, PurgeSpec, PurgeState};
pub use resources::queue::{QueueResource, QueueSpec, QueueState};
pub use resources::shovel::{ShovelResource, ShovelSpec, ShovelState};
pub use resources::user::{UserResource, UserSpec, UserState};
pub use resources::vhost::{VhostResource, VhostSpec, VhostState};
pub use resources::vhost_limits::{VhostLimitsResource, VhostLimitsSpec, VhostLimitsState};
