//! Remote call failures.

use thiserror::Error;

/// How a remote call failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// The backend rejected or trapped the call. Carries the backend's text.
    #[error("{0}")]
    Rejected(String),

    /// The call never got a reply (network, transport, timeout).
    #[error("network error: {0}")]
    Transport(String),
}

impl RemoteError {
    /// Shorthand for [`RemoteError::Rejected`].
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }

    /// Shorthand for [`RemoteError::Transport`].
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// The raw message text, without the variant prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Rejected(msg) | Self::Transport(msg) => msg,
        }
    }

    /// Whether the failure happened below the backend (no reply at all).
    #[inline]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// Result of a remote call.
pub type RemoteResult<T> = Result<T, RemoteError>;
