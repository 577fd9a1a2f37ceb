//! Management-client error types
//!
//! Error definitions for the HTTP envelope and the per-entity services,
//! with helpers to classify broker responses.

use thiserror::Error;

/// Error that can occur while talking to the management API.
#[derive(Debug, Error)]
pub enum MgmtError {
    /// The operation's cancellation token fired before a response arrived.
    ///
    /// Reported in preference to any transport error that the abandoned
    /// request may also have produced.
    #[error("request cancelled")]
    Cancelled,

    /// Network-level failure: connect, TLS, or mid-body I/O.
    #[error("transport error: {source}")]
    Transport {
        #[source]
        source: reqwest::Error,
    },

    /// The broker answered with a non-success status.
    ///
    /// `reason` carries the broker's `{error, reason}` body when it was
    /// parseable, otherwise the raw response text.
    #[error("broker returned {status}: {reason}")]
    Api { status: u16, reason: String },

    /// A success response carried a body this client could not decode.
    ///
    /// Indicates a contract mismatch between client and broker.
    #[error("failed to decode {context}: {message}")]
    Decode { context: &'static str, message: String },

    /// Client construction or request assembly failed before any I/O.
    #[error("invalid client configuration: {message}")]
    InvalidConfig { message: String },
}

impl MgmtError {
    /// Create an API error from a status code and reason text.
    pub fn api(status: u16, reason: impl Into<String>) -> Self {
        MgmtError::Api {
            status,
            reason: reason.into(),
        }
    }

    /// Create a decode error for the named payload.
    pub fn decode(context: &'static str, source: impl std::fmt::Display) -> Self {
        MgmtError::Decode {
            context,
            message: source.to_string(),
        }
    }

    /// Create an invalid-configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        MgmtError::InvalidConfig {
            message: message.into(),
        }
    }

    /// Whether this is the broker's 404 answer.
    ///
    /// GETs map this to "entity absent" rather than a failure so callers
    /// can detect drift.
    pub fn is_not_found(&self) -> bool {
        matches!(self, MgmtError::Api { status: 404, .. })
    }

    /// Whether the operation was cut short by cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, MgmtError::Cancelled)
    }

    /// HTTP status carried by this error, when it came from the broker.
    pub fn status(&self) -> Option<u16> {
        match self {
            MgmtError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for MgmtError {
    fn from(source: reqwest::Error) -> Self {
        MgmtError::Transport { source }
    }
}

/// Result type for management-client operations.
pub type MgmtResult<T> = Result<T, MgmtError>;
