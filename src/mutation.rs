//! Pending-state tracking for user actions.
//!
//! A control backed by a [`MutationTracker`] is disabled while its action is
//! in flight and usable again as soon as the action completes, success or
//! failure.

use crate::error::{ClientError, ClientResult};
use parking_lot::Mutex;
use std::future::Future;

/// Lifecycle of one user action.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MutationStatus {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed(String),
}

/// Tracks one action's pending/outcome state.
#[derive(Debug, Default)]
pub struct MutationTracker {
    status: Mutex<MutationStatus>,
}

impl MutationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current status.
    pub fn status(&self) -> MutationStatus {
        self.status.lock().clone()
    }

    /// Whether the action is in flight.
    pub fn is_pending(&self) -> bool {
        *self.status.lock() == MutationStatus::Pending
    }

    /// Forget the last outcome.
    pub fn reset(&self) {
        let mut status = self.status.lock();
        if *status != MutationStatus::Pending {
            *status = MutationStatus::Idle;
        }
    }

    /// Run `action`, refusing to start while another run is pending.
    pub async fn run<T, Fut>(&self, action: Fut) -> ClientResult<T>
    where
        Fut: Future<Output = ClientResult<T>>,
    {
        {
            let mut status = self.status.lock();
            if *status == MutationStatus::Pending {
                return Err(ClientError::Busy);
            }
            *status = MutationStatus::Pending;
        }

        let mut pending = PendingGuard {
            status: &self.status,
            settled: false,
        };
        let result = action.await;
        pending.settled = true;

        *self.status.lock() = match &result {
            Ok(_) => MutationStatus::Succeeded,
            Err(e) => MutationStatus::Failed(e.to_string()),
        };
        result
    }
}

/// Resets `Pending` to `Idle` when a run is dropped before it completes.
struct PendingGuard<'a> {
    status: &'a Mutex<MutationStatus>,
    settled: bool,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            *self.status.lock() = MutationStatus::Idle;
        }
    }
}
