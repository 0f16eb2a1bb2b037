//! Ban detection.
//!
//! The backend does not expose the caller's ban status as a query. A banned
//! caller's role query fails instead, and the failure text mentions the ban.
//! This adapter is the only code that inspects that text; everything else
//! consumes [`BanStatus`].

use crate::error::ClientError;
use butterfly_api::RemoteError;
use tracing::warn;

/// Marker the backend puts in a banned caller's rejection.
const BAN_MARKER: &str = "banned";

/// Marker preceding the ban reason, when the backend supplies one.
const REASON_MARKER: &str = "reason:";

/// Typed ban state of a principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BanStatus {
    /// Not banned.
    Active,
    /// Banned, with the reason if one was given.
    Banned { reason: Option<String> },
}

impl BanStatus {
    /// Whether this status denies access.
    #[inline]
    pub fn is_banned(&self) -> bool {
        matches!(self, Self::Banned { .. })
    }

    /// The ban reason, if banned with one.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Banned { reason } => reason.as_deref(),
            Self::Active => None,
        }
    }
}

impl From<butterfly_api::BanRecord> for BanStatus {
    fn from(record: butterfly_api::BanRecord) -> Self {
        if record.is_banned {
            Self::Banned {
                reason: record.reason.filter(|r| !r.trim().is_empty()),
            }
        } else {
            Self::Active
        }
    }
}

/// Classify a remote failure as a ban signal.
///
/// Only backend rejections count; transport failures never imply a ban.
pub fn detect_ban(err: &RemoteError) -> Option<BanStatus> {
    let RemoteError::Rejected(message) = err else {
        return None;
    };

    // ASCII lowering keeps byte offsets aligned with `message`.
    let lowered = message.to_ascii_lowercase();
    if !lowered.contains(BAN_MARKER) {
        return None;
    }

    let reason = lowered
        .find(REASON_MARKER)
        .map(|idx| message[idx + REASON_MARKER.len()..].trim())
        .filter(|r| !r.is_empty())
        .map(str::to_string);

    warn!(reason = ?reason, "Backend signalled a banned caller");
    Some(BanStatus::Banned { reason })
}

/// Resolve the caller's ban status from the outcome of a role query.
///
/// A successful query means the caller is active. A ban-signalling failure
/// becomes [`BanStatus::Banned`]; any other failure is returned unchanged.
pub fn ban_status_from<T>(result: Result<T, RemoteError>) -> Result<BanStatus, ClientError> {
    match result {
        Ok(_) => Ok(BanStatus::Active),
        Err(err) => match detect_ban(&err) {
            Some(status) => Ok(status),
            None => Err(ClientError::Remote(err)),
        },
    }
}
