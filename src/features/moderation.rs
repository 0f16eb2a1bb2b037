//! Admin console: permissions, user actions and the report queue.
//!
//! Only admins may use the console. Every user action validates the typed
//! principal locally before any remote call is made.

use crate::cache::{CapabilityCache, QueryCache, QueryState};
use crate::error::{ClientError, ClientResult};
use crate::mutation::MutationTracker;
use crate::notify::Notices;
use crate::security::BanStatus;
use crate::shell::Access;
use butterfly_api::{
    Backend, PageRequest, Principal, Report, ReportId, ReportKind, ReportReason, UserRole,
};
use std::sync::Arc;
use tracing::{Instrument, debug, info, trace};

const ACTION_FAILED: &str = "Action failed. Please try again.";

/// The console's user-action form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserActionForm {
    pub principal_input: String,
    pub ban_reason: String,
}

impl UserActionForm {
    pub fn new(principal_input: impl Into<String>) -> Self {
        Self {
            principal_input: principal_input.into(),
            ban_reason: String::new(),
        }
    }

    /// Parse the typed principal.
    pub fn validate(&self) -> ClientResult<Principal> {
        let text = self.principal_input.trim();
        if text.is_empty() {
            return Err(ClientError::validation("Please enter a Principal ID"));
        }
        Principal::from_text(text).map_err(|_| ClientError::validation("Invalid Principal ID format"))
    }
}

/// Moderation service.
pub struct Moderation {
    backend: Arc<dyn Backend>,
    capabilities: Arc<CapabilityCache>,
    notices: Arc<Notices>,
    page_size: u64,
    ban_lookup: QueryCache<Principal, BanStatus>,
    reports: QueryCache<PageRequest, Vec<Report>>,
    user_action: MutationTracker,
    report_action: MutationTracker,
}

impl Moderation {
    pub fn new(
        backend: Arc<dyn Backend>,
        capabilities: Arc<CapabilityCache>,
        notices: Arc<Notices>,
        page_size: u64,
    ) -> Self {
        Self {
            backend,
            capabilities,
            notices,
            page_size,
            ban_lookup: QueryCache::new("ban_lookup"),
            reports: QueryCache::new("reports"),
            user_action: MutationTracker::new(),
            report_action: MutationTracker::new(),
        }
    }

    /// Console access for `caller`, from the cached role.
    ///
    /// A failed role lookup denies.
    pub fn permissions(&self, caller: Option<&Principal>) -> Access {
        match self.capabilities.role(caller) {
            QueryState::Idle | QueryState::Loading => Access::Checking,
            QueryState::Ready(role) if role.is_admin() => {
                debug!(principal = ?caller.map(Principal::as_str), "Moderation access granted");
                Access::Granted
            }
            QueryState::Ready(_) | QueryState::Failed(_) => {
                trace!(principal = ?caller.map(Principal::as_str), "Moderation access denied");
                Access::Denied
            }
        }
    }

    /// The first page of the report queue.
    pub fn first_page(&self) -> PageRequest {
        PageRequest::first(self.page_size)
    }

    // ========================================================================
    // User actions
    // ========================================================================

    /// Look up `target`'s ban state.
    pub async fn ban_status(
        &self,
        caller: Option<&Principal>,
        target: &Principal,
    ) -> QueryState<BanStatus> {
        let backend = Arc::clone(&self.backend);
        self.ban_lookup
            .fetch(caller, target.clone(), || async move {
                let caller = caller.ok_or(ClientError::Unauthenticated)?;
                let record = backend.check_ban_status(caller, target).await?;
                Ok(BanStatus::from(record))
            })
            .await
    }

    /// Whether a user action is in flight.
    pub fn is_acting(&self) -> bool {
        self.user_action.is_pending()
    }

    /// Ban the principal typed in `form` for `form.ban_reason`.
    pub async fn ban(&self, caller: &Principal, form: &mut UserActionForm) -> ClientResult<()> {
        let target = self.form_target(form)?;
        let reason = form.ban_reason.trim().to_string();
        if reason.is_empty() {
            return Err(self.invalid(ClientError::validation("Please enter a ban reason")));
        }

        let result = self
            .user_action
            .run(async { Ok(self.backend.ban_user(caller, &target, reason).await?) })
            .instrument(crate::telemetry::spans::mutation("ban_user"))
            .await;

        match result {
            Ok(()) => {
                info!(principal = %caller, target = %target, "User banned");
                form.ban_reason.clear();
                self.ban_changed(caller, &target);
                self.notices.success("User has been banned successfully");
                Ok(())
            }
            Err(e) => Err(self.failed(e)),
        }
    }

    /// Lift the ban of the principal typed in `form`.
    pub async fn unban(&self, caller: &Principal, form: &UserActionForm) -> ClientResult<()> {
        let target = self.form_target(form)?;

        let result = self
            .user_action
            .run(async { Ok(self.backend.unban_user(caller, &target).await?) })
            .instrument(crate::telemetry::spans::mutation("unban_user"))
            .await;

        match result {
            Ok(()) => {
                info!(principal = %caller, target = %target, "User unbanned");
                self.ban_changed(caller, &target);
                self.notices.success("User has been unbanned successfully");
                Ok(())
            }
            Err(e) => Err(self.failed(e)),
        }
    }

    /// Assign `role` to `target`.
    pub async fn assign_role(
        &self,
        caller: &Principal,
        target: &Principal,
        role: UserRole,
    ) -> ClientResult<()> {
        let result = self
            .user_action
            .run(async {
                Ok(self
                    .backend
                    .assign_caller_user_role(caller, target, role)
                    .await?)
            })
            .instrument(crate::telemetry::spans::mutation("assign_user_role"))
            .await;

        match result {
            Ok(()) => {
                info!(principal = %caller, target = %target, role = %role, "Role assigned");
                self.capabilities.role_assigned(target);
                self.notices.success(format!("Role updated to {}", role));
                Ok(())
            }
            Err(e) => Err(self.failed(e)),
        }
    }

    // ========================================================================
    // Reports
    // ========================================================================

    /// Load a page of the report queue.
    pub async fn reports(
        &self,
        caller: Option<&Principal>,
        page: PageRequest,
    ) -> QueryState<Vec<Report>> {
        let backend = Arc::clone(&self.backend);
        self.reports
            .fetch(caller, page, || async move {
                let caller = caller.ok_or(ClientError::Unauthenticated)?;
                Ok(backend.list_reports(caller, page).await?)
            })
            .await
    }

    pub fn reports_need_fetch(&self, caller: Option<&Principal>, page: PageRequest) -> bool {
        self.reports.needs_fetch(caller, &page)
    }

    /// Mark report `id` reviewed.
    pub async fn resolve(&self, caller: &Principal, id: ReportId) -> ClientResult<()> {
        let result = self
            .report_action
            .run(async { Ok(self.backend.resolve_report(caller, id).await?) })
            .instrument(crate::telemetry::spans::mutation("resolve_report"))
            .await;
        self.report_outcome(caller, result, "Report resolved")
    }

    /// Remove the content report `id` points at.
    pub async fn remove_content(&self, caller: &Principal, id: ReportId) -> ClientResult<()> {
        let result = self
            .report_action
            .run(async { Ok(self.backend.remove_content(caller, id).await?) })
            .instrument(crate::telemetry::spans::mutation("remove_content"))
            .await;
        self.report_outcome(caller, result, "Content removed")
    }

    /// File a report. Any member may report; nothing cached changes.
    pub async fn report_content(
        &self,
        caller: &Principal,
        content_id: &str,
        kind: ReportKind,
        reason: ReportReason,
    ) -> ClientResult<()> {
        if matches!(&reason, ReportReason::Other(text) if text.trim().is_empty()) {
            return Err(self.invalid(ClientError::validation("Please describe the reason")));
        }

        let result = self
            .backend
            .report_content(caller, content_id.to_string(), kind, reason)
            .instrument(crate::telemetry::spans::mutation("report_content"))
            .await;

        match result {
            Ok(()) => {
                debug!(principal = %caller, content = content_id, kind = kind.label(), "Report filed");
                self.notices.success("Report submitted");
                Ok(())
            }
            Err(e) => Err(self.failed(e.into())),
        }
    }

    /// Forget everything cached for `principal`.
    pub fn purge(&self, principal: &Principal) {
        self.ban_lookup.purge(principal);
        self.reports.purge(principal);
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn form_target(&self, form: &UserActionForm) -> ClientResult<Principal> {
        form.validate().map_err(|e| self.invalid(e))
    }

    fn ban_changed(&self, caller: &Principal, target: &Principal) {
        self.ban_lookup.invalidate(caller, target);
        self.capabilities.ban_changed(target);
    }

    fn report_outcome(
        &self,
        caller: &Principal,
        result: ClientResult<()>,
        success: &str,
    ) -> ClientResult<()> {
        match result {
            Ok(()) => {
                self.reports.invalidate_where(caller, |_| true);
                self.notices.success(success);
                Ok(())
            }
            Err(e) => Err(self.failed(e)),
        }
    }

    fn invalid(&self, err: ClientError) -> ClientError {
        self.notices.error(err.to_string());
        err
    }

    fn failed(&self, err: ClientError) -> ClientError {
        debug!(error = %err, code = err.error_code(), "Moderation action failed");
        self.notices.error(ACTION_FAILED);
        err
    }
}
