//! Read-through query cache scoped by principal.
//!
//! Every slot is keyed by `(principal, key)`, so a value fetched for one
//! identity can never be read under another. Stale results are rejected by
//! version: a load only lands if its slot was neither invalidated, purged,
//! nor re-fetched while the load was in flight.
//!
//! # Slot lifecycle
//!
//! ```text
//! (absent) ──fetch──▶ Loading ──ok──▶ Ready(v) ──invalidate──▶ Ready(v), stale
//!                        │                                        │
//!                        └──err──▶ Failed(e)   ◀──err── refetch ──┘
//! ```
//!
//! Failed slots stay failed until invalidated; there is no automatic retry.

pub mod capability;

pub use capability::CapabilityCache;

use crate::error::ClientError;
use butterfly_api::Principal;
use dashmap::DashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, trace};

/// Versions are global so a purged-then-recreated slot never reuses one.
static NEXT_VERSION: AtomicU64 = AtomicU64::new(1);

#[inline]
fn next_version() -> u64 {
    NEXT_VERSION.fetch_add(1, Ordering::Relaxed)
}

/// Observable state of one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryState<V> {
    /// Disabled (no identity) or never requested.
    Idle,
    /// First load in flight.
    Loading,
    /// Last known server value.
    Ready(V),
    /// The last load failed.
    Failed(ClientError),
}

impl<V> QueryState<V> {
    /// Whether a value is available.
    #[inline]
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// Whether no outcome is known yet.
    #[inline]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Idle | Self::Loading)
    }

    /// The value, if ready.
    pub fn value(&self) -> Option<&V> {
        match self {
            Self::Ready(v) => Some(v),
            _ => None,
        }
    }

    /// The failure, if failed.
    pub fn error(&self) -> Option<&ClientError> {
        match self {
            Self::Failed(e) => Some(e),
            _ => None,
        }
    }

    /// Map the ready value.
    pub fn map<U>(self, f: impl FnOnce(V) -> U) -> QueryState<U> {
        match self {
            Self::Idle => QueryState::Idle,
            Self::Loading => QueryState::Loading,
            Self::Ready(v) => QueryState::Ready(f(v)),
            Self::Failed(e) => QueryState::Failed(e),
        }
    }
}

impl<V> From<Result<V, ClientError>> for QueryState<V> {
    fn from(result: Result<V, ClientError>) -> Self {
        match result {
            Ok(v) => Self::Ready(v),
            Err(e) => Self::Failed(e),
        }
    }
}

/// A cached query slot.
#[derive(Debug)]
struct Slot<V> {
    state: QueryState<V>,
    /// Invalidated; the value (if any) is served until the refetch lands.
    stale: bool,
    /// A load is in flight.
    loading: bool,
    /// Version of the load allowed to write this slot.
    version: u64,
}

impl<V> Slot<V> {
    fn new() -> Self {
        Self {
            state: QueryState::Idle,
            stale: false,
            loading: false,
            version: 0,
        }
    }
}

/// Principal-scoped read-through cache for one family of queries.
pub struct QueryCache<K, V> {
    name: &'static str,
    slots: DashMap<(Principal, K), Slot<V>>,
}

impl<K, V> QueryCache<K, V>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
    V: Clone,
{
    /// An empty cache; `name` labels log lines.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            slots: DashMap::new(),
        }
    }

    /// Current state of a slot, without loading.
    pub fn peek(&self, scope: Option<&Principal>, key: &K) -> QueryState<V> {
        let Some(scope) = scope else {
            return QueryState::Idle;
        };
        self.slots
            .get(&(scope.clone(), key.clone()))
            .map(|slot| slot.state.clone())
            .unwrap_or(QueryState::Idle)
    }

    /// Whether a render depending on this slot should trigger a load.
    ///
    /// Never true without a scope: queries are disabled while logged out.
    pub fn needs_fetch(&self, scope: Option<&Principal>, key: &K) -> bool {
        let Some(scope) = scope else {
            return false;
        };
        match self.slots.get(&(scope.clone(), key.clone())) {
            None => true,
            Some(slot) => {
                !slot.loading && (slot.stale || matches!(slot.state, QueryState::Idle))
            }
        }
    }

    /// Read-through load.
    ///
    /// Returns `Idle` without calling `loader` when `scope` is `None`, and the
    /// cached value when it is ready and fresh. Otherwise runs `loader` and
    /// records its outcome unless the slot was superseded meanwhile. The
    /// outcome is returned either way.
    pub async fn fetch<F, Fut>(&self, scope: Option<&Principal>, key: K, loader: F) -> QueryState<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, ClientError>>,
    {
        let Some(scope) = scope else {
            return QueryState::Idle;
        };
        let id = (scope.clone(), key);

        let version = {
            let mut slot = self.slots.entry(id.clone()).or_insert_with(Slot::new);
            if !slot.stale && slot.state.is_ready() {
                return slot.state.clone();
            }
            let version = next_version();
            slot.version = version;
            slot.loading = true;
            if !slot.state.is_ready() {
                slot.state = QueryState::Loading;
            }
            version
        };

        debug!(query = self.name, principal = %scope, key = ?id.1, "Query loading");
        let mut in_flight = InFlight {
            name: self.name,
            slots: &self.slots,
            id: &id,
            version,
            finished: false,
        };
        let state = QueryState::from(loader().await);
        in_flight.finished = true;

        match self.slots.get_mut(&id) {
            Some(mut slot) if slot.version == version => {
                slot.state = state.clone();
                slot.stale = false;
                slot.loading = false;
                if let QueryState::Failed(ref e) = slot.state {
                    debug!(query = self.name, principal = %scope, error = %e, code = e.error_code(), "Query failed");
                }
            }
            _ => {
                trace!(query = self.name, principal = %scope, key = ?id.1, "Discarding superseded query result");
            }
        }

        state
    }

    /// Mark one slot stale. Returns whether the slot existed.
    pub fn invalidate(&self, scope: &Principal, key: &K) -> bool {
        match self.slots.get_mut(&(scope.clone(), key.clone())) {
            Some(mut slot) => {
                Self::mark_stale(&mut slot);
                debug!(query = self.name, principal = %scope, key = ?key, "Query invalidated");
                true
            }
            None => false,
        }
    }

    /// Mark every slot of `scope` whose key matches `pred` stale.
    pub fn invalidate_where(&self, scope: &Principal, pred: impl Fn(&K) -> bool) -> usize {
        let mut count = 0;
        for mut entry in self.slots.iter_mut() {
            let (principal, key) = entry.key();
            if principal == scope && pred(key) {
                Self::mark_stale(entry.value_mut());
                count += 1;
            }
        }
        if count > 0 {
            debug!(query = self.name, principal = %scope, count, "Queries invalidated");
        }
        count
    }

    /// Drop every slot belonging to `scope`.
    ///
    /// Loads still in flight for it find no slot and are discarded.
    pub fn purge(&self, scope: &Principal) -> usize {
        let before = self.slots.len();
        self.slots.retain(|(principal, _), _| principal != scope);
        let removed = before.saturating_sub(self.slots.len());
        if removed > 0 {
            debug!(query = self.name, principal = %scope, count = removed, "Purged query slots");
        }
        removed
    }

    /// Number of slots across all scopes.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the cache holds no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn mark_stale(slot: &mut Slot<V>) {
        slot.stale = true;
        slot.loading = false;
        slot.version = next_version();
    }
}

/// Guard over one load; releases the slot if the load is dropped unfinished.
///
/// A slot left `loading` would never be fetched again, so a cancelled load
/// puts it back to where a render asks for it: a first load returns to
/// `Idle`, a revalidation stays stale.
struct InFlight<'a, K: Eq + Hash, V> {
    name: &'static str,
    slots: &'a DashMap<(Principal, K), Slot<V>>,
    id: &'a (Principal, K),
    version: u64,
    finished: bool,
}

impl<K: Eq + Hash, V> Drop for InFlight<'_, K, V> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        if let Some(mut slot) = self.slots.get_mut(self.id) {
            if slot.version != self.version {
                return;
            }
            slot.loading = false;
            if matches!(slot.state, QueryState::Loading) {
                slot.state = QueryState::Idle;
            } else {
                slot.stale = true;
            }
            debug!(query = self.name, principal = %self.id.0, "Query load cancelled");
        }
    }
}
