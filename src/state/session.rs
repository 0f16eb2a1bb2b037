//! Identity session holder.
//!
//! Holds the one authenticated identity of the session, or none. Login and
//! logout are the only transitions, and each is published on a `watch`
//! channel so observers can drop state that belonged to the old identity.

use butterfly_api::Principal;
use parking_lot::RwLock;
use std::fmt;
use tokio::sync::watch;
use tracing::info;

/// The authenticated principal of the current session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity {
    principal: Principal,
}

impl Identity {
    /// Wrap the principal a successful login produced.
    pub fn new(principal: Principal) -> Self {
        Self { principal }
    }

    /// The stable external handle every cache key is scoped by.
    #[inline]
    pub fn principal(&self) -> &Principal {
        &self.principal
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.principal.fmt(f)
    }
}

/// Holder of the current identity.
pub struct Session {
    current: RwLock<Option<Identity>>,
    events: watch::Sender<Option<Identity>>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// An unauthenticated session.
    pub fn new() -> Self {
        let (events, _) = watch::channel(None);
        Self {
            current: RwLock::new(None),
            events,
        }
    }

    /// The current identity, if logged in.
    pub fn current(&self) -> Option<Identity> {
        self.current.read().clone()
    }

    /// The current identity's principal, if logged in.
    pub fn principal(&self) -> Option<Principal> {
        self.current.read().as_ref().map(|id| id.principal.clone())
    }

    /// Whether an identity is present.
    pub fn is_authenticated(&self) -> bool {
        self.current.read().is_some()
    }

    /// Install `identity`, returning the identity it replaced.
    pub fn login(&self, identity: Identity) -> Option<Identity> {
        info!(principal = %identity, "Identity logged in");
        self.replace(Some(identity))
    }

    /// Drop the current identity, returning it.
    pub fn logout(&self) -> Option<Identity> {
        let previous = self.replace(None);
        if let Some(ref id) = previous {
            info!(principal = %id, "Identity logged out");
        }
        previous
    }

    /// Observe identity changes.
    pub fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.events.subscribe()
    }

    fn replace(&self, next: Option<Identity>) -> Option<Identity> {
        let previous = {
            let mut guard = self.current.write();
            std::mem::replace(&mut *guard, next.clone())
        };
        if previous != next {
            // send_replace never fails, even with no receivers
            self.events.send_replace(next);
        }
        previous
    }
}
