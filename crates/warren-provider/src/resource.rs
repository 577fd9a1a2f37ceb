//! The lifecycle contract implemented by every resource kind.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::{ProviderError, ProviderResult};

/// Lifecycle operations for one kind of broker object.
///
/// `Spec` is the declared (desired) form; `State` is what gets persisted
/// between reconciles and carries the identity needed to address the
/// object later. Mutating operations return the state observed by
/// re-reading after the write, so persisted state always reflects the
/// broker, broker-side defaulting included.
///
/// `update` and `import_state` default to a typed "unsupported" error:
/// one-shot action resources and objects the broker treats as immutable
/// simply leave the defaults in place.
#[async_trait]
pub trait ManagedResource: Send + Sync {
    type Spec: Send + Sync;
    type State: Send + Sync;

    /// Kind name used in errors and logs.
    const KIND: &'static str;

    /// Create the object and return its observed state.
    async fn create(
        &self,
        cancel: &CancellationToken,
        spec: &Self::Spec,
    ) -> ProviderResult<Self::State>;

    /// Re-read the object. `None` means it is gone and should be dropped
    /// from persisted state.
    async fn read(
        &self,
        cancel: &CancellationToken,
        state: &Self::State,
    ) -> ProviderResult<Option<Self::State>>;

    /// Drive the object from its current state to `spec`.
    async fn update(
        &self,
        cancel: &CancellationToken,
        state: &Self::State,
        spec: &Self::Spec,
    ) -> ProviderResult<Self::State> {
        let _ = (cancel, state, spec);
        Err(ProviderError::unsupported(Self::KIND, "update"))
    }

    /// Remove the object. Deleting an object that is already gone
    /// succeeds.
    async fn delete(&self, cancel: &CancellationToken, state: &Self::State)
        -> ProviderResult<()>;

    /// Adopt an existing object by import identifier.
    async fn import_state(
        &self,
        cancel: &CancellationToken,
        id: &str,
    ) -> ProviderResult<Self::State> {
        let _ = (cancel, id);
        Err(ProviderError::unsupported(Self::KIND, "import"))
    }
}
