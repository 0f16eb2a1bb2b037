//! Principal roles.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role the backend associates with a principal.
///
/// Only the backend changes roles, and only at an admin's request.
/// `Admin` is the sole role with moderation rights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Full moderation rights.
    Admin,
    /// Regular community member.
    User,
    /// Authenticated but not yet a member.
    Guest,
}

impl UserRole {
    /// Whether this role may use the moderation console.
    #[inline]
    pub fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Lowercase wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
            Self::Guest => "guest",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
