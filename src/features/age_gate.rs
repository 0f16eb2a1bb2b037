//! Eligibility confirmation.

use crate::cache::CapabilityCache;
use crate::error::{ClientError, ClientResult};
use crate::mutation::MutationTracker;
use crate::notify::Notices;
use butterfly_api::Principal;
use std::sync::Arc;
use tracing::{Instrument, info, warn};

/// The age-gate checkbox.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AgeGateForm {
    pub confirmed: bool,
}

/// Runs the confirm-eligibility action.
pub struct AgeGate {
    capabilities: Arc<CapabilityCache>,
    notices: Arc<Notices>,
    confirm: MutationTracker,
}

impl AgeGate {
    pub fn new(capabilities: Arc<CapabilityCache>, notices: Arc<Notices>) -> Self {
        Self {
            capabilities,
            notices,
            confirm: MutationTracker::new(),
        }
    }

    /// Whether a confirmation is in flight.
    pub fn is_pending(&self) -> bool {
        self.confirm.is_pending()
    }

    /// Confirm `caller`'s eligibility.
    ///
    /// On success the eligibility slot is invalidated, so the next settle
    /// sends the member to the feed.
    pub async fn confirm(&self, caller: Option<&Principal>, form: &AgeGateForm) -> ClientResult<()> {
        let Some(caller) = caller else {
            return Err(ClientError::Unauthenticated);
        };
        if !form.confirmed {
            self.notices.error("Please confirm you are 18 or older");
            return Err(ClientError::validation("Please confirm you are 18 or older"));
        }

        let result = self
            .confirm
            .run(self.capabilities.confirm_eligibility(caller))
            .instrument(crate::telemetry::spans::mutation("confirm_eligibility"))
            .await;

        match result {
            Ok(()) => {
                info!(principal = %caller, "Eligibility confirmed");
                self.notices.success("Welcome to Butterfly Connections!");
                Ok(())
            }
            Err(e) => {
                warn!(principal = %caller, error = %e, code = e.error_code(), "Eligibility confirmation failed");
                self.notices.error("Failed to confirm eligibility. Please try again.");
                Err(e)
            }
        }
    }
}
