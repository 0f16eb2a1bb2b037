//! Capability cache: eligibility, role and ban status per identity.
//!
//! The three queries are independent. Each consumer waits only for the one
//! signal it needs, and every mutation invalidates exactly the slot it can
//! change:
//!
//! | mutation            | invalidates        |
//! |---------------------|--------------------|
//! | confirm eligibility | eligibility        |
//! | ban / unban         | ban status (target)|
//! | role assignment     | role (target)      |

use super::{QueryCache, QueryState};
use crate::error::{ClientError, ClientResult};
use crate::security::{BanStatus, ban_status_from};
use butterfly_api::{Backend, Principal, UserRole};
use std::sync::Arc;
use tracing::{debug, trace};

/// Read-through cache of the server-declared capability flags.
pub struct CapabilityCache {
    backend: Arc<dyn Backend>,
    eligibility: QueryCache<(), bool>,
    role: QueryCache<(), UserRole>,
    ban: QueryCache<(), BanStatus>,
}

impl CapabilityCache {
    /// Create a cache reading through `backend`.
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            eligibility: QueryCache::new("eligibility"),
            role: QueryCache::new("role"),
            ban: QueryCache::new("ban_status"),
        }
    }

    // ========================================================================
    // Peeks (render path)
    // ========================================================================

    /// Cached eligibility of `principal`.
    pub fn eligibility(&self, principal: Option<&Principal>) -> QueryState<bool> {
        self.eligibility.peek(principal, &())
    }

    /// Cached role of `principal`.
    pub fn role(&self, principal: Option<&Principal>) -> QueryState<UserRole> {
        self.role.peek(principal, &())
    }

    /// Cached ban status of `principal`.
    pub fn ban_status(&self, principal: Option<&Principal>) -> QueryState<BanStatus> {
        self.ban.peek(principal, &())
    }

    /// Whether `principal` is known to be an admin.
    ///
    /// Unknown or failed role lookups are not admin.
    pub fn is_admin(&self, principal: Option<&Principal>) -> bool {
        matches!(self.role(principal), QueryState::Ready(role) if role.is_admin())
    }

    /// Whether the eligibility slot must be loaded.
    pub fn eligibility_needs_fetch(&self, principal: Option<&Principal>) -> bool {
        self.eligibility.needs_fetch(principal, &())
    }

    /// Whether the role slot must be loaded.
    pub fn role_needs_fetch(&self, principal: Option<&Principal>) -> bool {
        self.role.needs_fetch(principal, &())
    }

    /// Whether the ban-status slot must be loaded.
    pub fn ban_needs_fetch(&self, principal: Option<&Principal>) -> bool {
        self.ban.needs_fetch(principal, &())
    }

    // ========================================================================
    // Loads
    // ========================================================================

    /// Load eligibility through the cache.
    pub async fn load_eligibility(&self, principal: Option<&Principal>) -> QueryState<bool> {
        let backend = Arc::clone(&self.backend);
        self.eligibility
            .fetch(principal, (), || async move {
                let Some(p) = principal else {
                    return Err(ClientError::Unauthenticated);
                };
                Ok(backend.has_confirmed_eligibility(p).await?)
            })
            .await
    }

    /// Load the role through the cache.
    pub async fn load_role(&self, principal: Option<&Principal>) -> QueryState<UserRole> {
        let backend = Arc::clone(&self.backend);
        self.role
            .fetch(principal, (), || async move {
                let Some(p) = principal else {
                    return Err(ClientError::Unauthenticated);
                };
                Ok(backend.get_caller_user_role(p).await?)
            })
            .await
    }

    /// Load the ban status through the cache.
    ///
    /// Inferred from the role query: a ban-signalling failure is a ban, a
    /// success means active.
    pub async fn load_ban_status(&self, principal: Option<&Principal>) -> QueryState<BanStatus> {
        let backend = Arc::clone(&self.backend);
        self.ban
            .fetch(principal, (), || async move {
                let Some(p) = principal else {
                    return Err(ClientError::Unauthenticated);
                };
                ban_status_from(backend.get_caller_user_role(p).await)
            })
            .await
    }

    // ========================================================================
    // Mutations & invalidation
    // ========================================================================

    /// Confirm `principal`'s eligibility, then invalidate its eligibility slot.
    pub async fn confirm_eligibility(&self, principal: &Principal) -> ClientResult<()> {
        self.backend.confirm_eligibility(principal).await?;
        debug!(principal = %principal, "Eligibility confirmed");
        self.eligibility.invalidate(principal, &());
        Ok(())
    }

    /// A ban or unban of `target` succeeded.
    pub fn ban_changed(&self, target: &Principal) {
        if !self.ban.invalidate(target, &()) {
            trace!(principal = %target, "No cached ban status to invalidate");
        }
    }

    /// A role assignment for `target` succeeded.
    pub fn role_assigned(&self, target: &Principal) {
        if !self.role.invalidate(target, &()) {
            trace!(principal = %target, "No cached role to invalidate");
        }
    }

    /// Forget everything cached for `principal`.
    pub fn purge(&self, principal: &Principal) {
        self.eligibility.purge(principal);
        self.role.purge(principal);
        self.ban.purge(principal);
    }
}
