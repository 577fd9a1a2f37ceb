//! Provider error types.
//!
//! Everything the management client reports passes through unchanged; the
//! variants here cover what can go wrong before a request is issued
//! (validation, import parsing) or after one succeeds (identity recovery).

use thiserror::Error;

use warren_mgmt::MgmtError;

/// Error that can occur while reconciling declared resources.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// A declared attribute failed client-side validation.
    #[error("invalid value for {attribute}: {message}")]
    Config {
        attribute: &'static str,
        message: String,
    },

    /// A write succeeded but the resulting object could not be observed,
    /// so no identity can be persisted.
    #[error("cannot establish identity of {kind}: {message}")]
    Identity {
        kind: &'static str,
        message: String,
    },

    /// An import target does not exist on the broker.
    #[error("{kind} {id:?} not found")]
    Missing { kind: &'static str, id: String },

    /// An import identifier does not match the documented format.
    #[error("invalid import id {given:?}, expected {expected}")]
    InvalidImportId {
        given: String,
        expected: &'static str,
    },

    /// The resource kind does not implement this operation.
    #[error("{kind} does not support {operation}")]
    Unsupported {
        kind: &'static str,
        operation: &'static str,
    },

    /// Management API failure, passed through.
    #[error(transparent)]
    Mgmt(#[from] MgmtError),
}

impl ProviderError {
    pub fn config(attribute: &'static str, message: impl Into<String>) -> Self {
        ProviderError::Config {
            attribute,
            message: message.into(),
        }
    }

    pub fn identity(kind: &'static str, message: impl Into<String>) -> Self {
        ProviderError::Identity {
            kind,
            message: message.into(),
        }
    }

    pub fn missing(kind: &'static str, id: impl Into<String>) -> Self {
        ProviderError::Missing {
            kind,
            id: id.into(),
        }
    }

    pub fn invalid_import_id(given: impl Into<String>, expected: &'static str) -> Self {
        ProviderError::InvalidImportId {
            given: given.into(),
            expected,
        }
    }

    pub fn unsupported(kind: &'static str, operation: &'static str) -> Self {
        ProviderError::Unsupported { kind, operation }
    }

    /// Whether the underlying cause was a cancelled token.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ProviderError::Mgmt(err) if err.is_cancelled())
    }

    /// Whether this error means "the object is not there".
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            ProviderError::Missing { .. } => true,
            ProviderError::Mgmt(err) => err.is_not_found(),
            _ => false,
        }
    }
}

/// Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;
