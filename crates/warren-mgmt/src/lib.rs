//! Typed async client for the LavinMQ-compatible management HTTP API.
//!
//! The crate covers the control-plane surface: vhosts, users, permissions,
//! exchanges, queues, bindings, policies, runtime parameters (including
//! the shovel and federation composites stored inside them), per-vhost
//! limits, and the publish/purge conveniences.
//!
//! Design points:
//!
//! - Every call takes a [`CancellationToken`](tokio_util::sync::CancellationToken);
//!   cancellation beats whatever error the aborted transfer would report.
//! - Reads return `Option`: the broker's 404 means "gone", not "failed".
//! - Writes are fire-and-verify. The broker rarely echoes state back, so
//!   callers re-read after mutating; bindings additionally need
//!   [`MgmtClient::find_binding`] to learn their server-assigned key.
//! - No retries, no timeouts. Both belong to the caller.

pub mod api;
pub mod client;
pub mod error;
mod path;

pub use api::bindings::{BindingInfo, BindingSettings, DestinationType};
pub use api::exchanges::{ExchangeInfo, ExchangeSettings};
pub use api::federation::{
    FederationUpstreamDefinition, UpstreamSetMember, FEDERATION_UPSTREAM_COMPONENT,
    FEDERATION_UPSTREAM_SET_COMPONENT,
};
pub use api::limits::{VhostLimits, MAX_CONNECTIONS, MAX_QUEUES};
pub use api::overview::{Overview, WhoAmI};
pub use api::parameters::RuntimeParameterInfo;
pub use api::permissions::{PermissionInfo, PermissionSettings};
pub use api::policies::{PolicyDefinition, PolicyInfo};
pub use api::publish::{PayloadEncoding, PublishRequest};
pub use api::queues::{QueueInfo, QueueSettings};
pub use api::shovels::{ShovelDefinition, SHOVEL_COMPONENT};
pub use api::users::{UserInfo, UserSettings, UserTags};
pub use api::vhosts::VhostInfo;
pub use client::{MgmtClient, DEFAULT_USER_AGENT};
pub use error::{MgmtError, MgmtResult};
