//! One module per resource kind.
//!
//! Every module follows the same grain: a `*Spec` struct for the declared
//! form, a `*State` struct for what persists between reconciles, and a
//! `*Resource` implementing [`crate::resource::ManagedResource`] against
//! a [`warren_mgmt::MgmtClient`].

pub mod binding;
pub mod exchange;
pub mod federation_upstream;
pub mod federation_upstream_set;
pub mod permission;
pub mod policy;
pub mod publish;
pub mod purge;
pub mod queue;
pub mod shovel;
pub mod user;
pub mod vhost;
pub mod vhost_limits;

use warren_mgmt::MgmtResult;

use crate::error::{ProviderError, ProviderResult};

/// Deleting an object that is already gone is success: the desired
/// absence holds either way.
pub(crate) fn absorb_not_found(result: MgmtResult<()>) -> ProviderResult<()> {
    match result {
        Err(err) if err.is_not_found() => Ok(()),
        other => other.map_err(ProviderError::from),
    }
}

/// A write went through but the follow-up read found nothing; without an
/// observation there is no state to persist.
pub(crate) fn observed_after_write<T>(
    observed: Option<T>,
    kind: &'static str,
    id: &str,
) -> ProviderResult<T> {
    observed.ok_or_else(|| {
        ProviderError::identity(kind, format!("{id} not observable after write"))
    })
}
