//! The remote backend seam.
//!
//! Every call is made on behalf of an authenticated caller, so each method
//! takes the caller's [`Principal`]. Implementations carry the transport;
//! this crate only fixes the shape of the calls.
//!
//! The caller's own ban status is deliberately absent. A banned caller sees
//! [`Backend::get_caller_user_role`] fail, and clients infer the ban from
//! that failure.

use crate::error::RemoteResult;
use crate::principal::Principal;
use crate::role::UserRole;
use crate::types::{
    BanRecord, CommunityProfile, ConnectionsReply, ConnectionsThread, HelloCornerMessage,
    MediaBlob, MentorFilter, MessageDraft, MessageId, PageRequest, Reaction, ReactionCounts,
    ReplyId, Report, ReportId, ReportKind, ReportReason, ThreadId,
};
use async_trait::async_trait;

/// Procedures exposed by the Butterfly Connections backend.
#[async_trait]
pub trait Backend: Send + Sync {
    // ------------------------------------------------------------------------
    // Eligibility
    // ------------------------------------------------------------------------

    /// Whether the caller has passed the age/eligibility gate.
    async fn has_confirmed_eligibility(&self, caller: &Principal) -> RemoteResult<bool>;

    /// Record the caller's eligibility confirmation. Confirming twice is harmless.
    async fn confirm_eligibility(&self, caller: &Principal) -> RemoteResult<()>;

    // ------------------------------------------------------------------------
    // Roles
    // ------------------------------------------------------------------------

    /// The caller's role. Fails for a banned caller.
    async fn get_caller_user_role(&self, caller: &Principal) -> RemoteResult<UserRole>;

    /// Whether the caller is an admin.
    async fn is_caller_admin(&self, caller: &Principal) -> RemoteResult<bool>;

    /// Assign `role` to `user`. Admin only.
    async fn assign_caller_user_role(
        &self,
        caller: &Principal,
        user: &Principal,
        role: UserRole,
    ) -> RemoteResult<()>;

    // ------------------------------------------------------------------------
    // Profiles & Directory
    // ------------------------------------------------------------------------

    /// A member's profile.
    async fn get_community_profile(
        &self,
        caller: &Principal,
        user: &Principal,
    ) -> RemoteResult<CommunityProfile>;

    /// Replace the caller's profile.
    async fn update_community_profile(
        &self,
        caller: &Principal,
        profile: CommunityProfile,
    ) -> RemoteResult<()>;

    /// Profiles matching the directory filter.
    async fn browse_mentors(
        &self,
        caller: &Principal,
        filter: MentorFilter,
    ) -> RemoteResult<Vec<CommunityProfile>>;

    /// Upload the caller's profile photo.
    async fn upload_profile_photo(&self, caller: &Principal, blob: MediaBlob) -> RemoteResult<()>;

    /// A member's profile photo, if any.
    async fn get_profile_photo(
        &self,
        caller: &Principal,
        user: &Principal,
    ) -> RemoteResult<Option<MediaBlob>>;

    // ------------------------------------------------------------------------
    // Contacts
    // ------------------------------------------------------------------------

    /// A member's contacts.
    async fn get_contacts(&self, caller: &Principal, user: &Principal)
    -> RemoteResult<Vec<Principal>>;

    /// Send a connection request to `to`.
    async fn add_contact(&self, caller: &Principal, to: &Principal) -> RemoteResult<()>;

    /// Accept a pending request from `requester`.
    async fn accept_contact(&self, caller: &Principal, requester: &Principal) -> RemoteResult<()>;

    // ------------------------------------------------------------------------
    // Connections forum
    // ------------------------------------------------------------------------

    /// A page of threads visible to the caller.
    async fn list_threads(
        &self,
        caller: &Principal,
        page: PageRequest,
    ) -> RemoteResult<Vec<ConnectionsThread>>;

    /// Open a thread.
    async fn create_thread(
        &self,
        caller: &Principal,
        title: String,
        content: String,
    ) -> RemoteResult<ThreadId>;

    /// A single thread.
    async fn get_thread(&self, caller: &Principal, id: ThreadId) -> RemoteResult<ConnectionsThread>;

    /// Replies of a thread, oldest first.
    async fn get_thread_replies(
        &self,
        caller: &Principal,
        id: ThreadId,
    ) -> RemoteResult<Vec<ConnectionsReply>>;

    /// Reply to a thread.
    async fn reply_to_thread(
        &self,
        caller: &Principal,
        id: ThreadId,
        content: String,
    ) -> RemoteResult<ReplyId>;

    // ------------------------------------------------------------------------
    // Hello Corner
    // ------------------------------------------------------------------------

    /// A page of feed messages, newest first.
    async fn list_hello_corner_messages(
        &self,
        caller: &Principal,
        page: PageRequest,
    ) -> RemoteResult<Vec<HelloCornerMessage>>;

    /// Post a feed message.
    async fn create_hello_corner_message(
        &self,
        caller: &Principal,
        draft: MessageDraft,
    ) -> RemoteResult<MessageId>;

    /// Reaction tallies of a message.
    async fn get_message_reactions(
        &self,
        caller: &Principal,
        id: MessageId,
    ) -> RemoteResult<ReactionCounts>;

    /// Set the caller's reaction on a message.
    async fn react_to_message(
        &self,
        caller: &Principal,
        id: MessageId,
        reaction: Reaction,
    ) -> RemoteResult<()>;

    /// Clear the caller's reaction on a message.
    async fn remove_reaction(&self, caller: &Principal, id: MessageId) -> RemoteResult<()>;

    // ------------------------------------------------------------------------
    // Moderation
    // ------------------------------------------------------------------------

    /// File a report.
    async fn report_content(
        &self,
        caller: &Principal,
        content_id: String,
        kind: ReportKind,
        reason: ReportReason,
    ) -> RemoteResult<()>;

    /// A page of reports. Admin only.
    async fn list_reports(&self, caller: &Principal, page: PageRequest) -> RemoteResult<Vec<Report>>;

    /// Mark a report reviewed. Admin only.
    async fn resolve_report(&self, caller: &Principal, id: ReportId) -> RemoteResult<()>;

    /// Remove the content a report points at. Admin only.
    async fn remove_content(&self, caller: &Principal, id: ReportId) -> RemoteResult<()>;

    /// Ban a principal. Admin only.
    async fn ban_user(&self, caller: &Principal, user: &Principal, reason: String)
    -> RemoteResult<()>;

    /// Lift a ban. Admin only.
    async fn unban_user(&self, caller: &Principal, user: &Principal) -> RemoteResult<()>;

    /// Ban state of another principal. Admin only.
    async fn check_ban_status(&self, caller: &Principal, user: &Principal)
    -> RemoteResult<BanRecord>;
}
