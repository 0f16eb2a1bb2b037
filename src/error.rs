//! Unified error handling for the client core.
//!
//! Every fallible client operation returns [`ClientError`]. Remote failures
//! keep the backend's text so that adapters (ban detection, forum message
//! normalization) can inspect it; local validation failures never reach the
//! backend.

use butterfly_api::{PrincipalError, RemoteError};
use thiserror::Error;

// ============================================================================
// Client Errors
// ============================================================================

/// Errors surfaced by client operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The backend rejected the call or could not be reached.
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// Input failed a local check; the remote call was not attempted.
    #[error("{0}")]
    Validation(String),

    /// The same action is already in flight.
    #[error("action already in progress")]
    Busy,

    /// No identity is logged in.
    #[error("not authenticated")]
    Unauthenticated,
}

impl ClientError {
    /// Shorthand for [`ClientError::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Remote(RemoteError::Rejected(_)) => "remote_rejected",
            Self::Remote(RemoteError::Transport(_)) => "remote_transport",
            Self::Validation(_) => "validation",
            Self::Busy => "busy",
            Self::Unauthenticated => "unauthenticated",
        }
    }

    /// The underlying remote failure, if any.
    pub fn as_remote(&self) -> Option<&RemoteError> {
        match self {
            Self::Remote(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PrincipalError> for ClientError {
    fn from(err: PrincipalError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;
