//! In-memory backend double.
//!
//! Behaves like the real service closely enough for client flows: roles,
//! eligibility and bans are per principal, a banned caller's role query is
//! rejected with a ban message, and every procedure can be made to fail or
//! be held in flight.

#![allow(dead_code)]

use async_trait::async_trait;
use butterfly_api::{
    Backend, BanRecord, CommunityProfile, ConnectionsReply, ConnectionsThread,
    HelloCornerMessage, MediaBlob, MentorFilter, MessageDraft, MessageId, PageRequest, Principal,
    Reaction, ReactionCounts, RemoteError, RemoteResult, ReplyId, Report, ReportId, ReportKind,
    ReportReason, ReportStatus, ThreadId, UserRole,
};
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::{Notify, Semaphore};

/// A call parked until the test releases it.
pub struct Hold {
    entered: Notify,
    release: Semaphore,
}

impl Hold {
    /// Wait until the held call has started.
    pub async fn entered(&self) {
        self.entered.notified().await;
    }

    /// Let the held call finish.
    pub fn release(&self) {
        self.release.add_permits(1);
    }
}

#[derive(Default)]
struct State {
    eligible: HashSet<Principal>,
    roles: HashMap<Principal, UserRole>,
    bans: HashMap<Principal, Option<String>>,
    failures: HashMap<&'static str, RemoteError>,
    holds: HashMap<&'static str, Arc<Hold>>,
    calls: Vec<&'static str>,
    profiles: HashMap<Principal, CommunityProfile>,
    photos: HashMap<Principal, MediaBlob>,
    contacts: HashMap<Principal, Vec<Principal>>,
    requests: HashMap<Principal, Vec<Principal>>,
    threads: Vec<ConnectionsThread>,
    replies: Vec<ConnectionsReply>,
    messages: Vec<HelloCornerMessage>,
    reactions: HashMap<MessageId, HashMap<Principal, Reaction>>,
    reports: Vec<Report>,
    next_id: u64,
}

impl State {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Programmable fake of the remote service.
#[derive(Default)]
pub struct FakeBackend {
    state: Mutex<State>,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    // ------------------------------------------------------------------------
    // Programming
    // ------------------------------------------------------------------------

    pub fn set_eligible(&self, who: &Principal, eligible: bool) {
        let mut state = self.state.lock();
        if eligible {
            state.eligible.insert(who.clone());
        } else {
            state.eligible.remove(who);
        }
    }

    pub fn set_role(&self, who: &Principal, role: UserRole) {
        self.state.lock().roles.insert(who.clone(), role);
    }

    pub fn set_banned(&self, who: &Principal, reason: Option<&str>) {
        self.state
            .lock()
            .bans
            .insert(who.clone(), reason.map(str::to_string));
    }

    pub fn is_banned(&self, who: &Principal) -> bool {
        self.state.lock().bans.contains_key(who)
    }

    pub fn role_of(&self, who: &Principal) -> UserRole {
        self.state.lock().roles.get(who).copied().unwrap_or(UserRole::User)
    }

    /// Make every call to `method` fail with `err` until cleared.
    pub fn fail(&self, method: &'static str, err: RemoteError) {
        self.state.lock().failures.insert(method, err);
    }

    pub fn clear_failure(&self, method: &'static str) {
        self.state.lock().failures.remove(method);
    }

    /// Park the next call to `method` until the returned hold is released.
    pub fn hold(&self, method: &'static str) -> Arc<Hold> {
        let hold = Arc::new(Hold {
            entered: Notify::new(),
            release: Semaphore::new(0),
        });
        self.state.lock().holds.insert(method, Arc::clone(&hold));
        hold
    }

    /// How many times `method` was called.
    pub fn calls(&self, method: &str) -> usize {
        self.state.lock().calls.iter().filter(|m| **m == method).count()
    }

    pub fn seed_thread(&self, author: &Principal, title: &str) -> ThreadId {
        let mut state = self.state.lock();
        let id = state.next_id();
        state.threads.push(ConnectionsThread {
            id,
            author: author.clone(),
            title: title.to_string(),
            content: format!("{} body", title),
            replies: Vec::new(),
            created_at: Utc::now(),
        });
        id
    }

    pub fn seed_message(&self, author: &Principal, text: &str) -> MessageId {
        let mut state = self.state.lock();
        let id = state.next_id();
        state.messages.push(HelloCornerMessage {
            id,
            author: author.clone(),
            text: text.to_string(),
            photo: None,
            video: None,
            created_at: Utc::now(),
        });
        id
    }

    pub fn seed_report(&self, reporter: &Principal, content_id: &str) -> ReportId {
        let mut state = self.state.lock();
        let id = state.next_id();
        state.reports.push(Report {
            id,
            reporter: reporter.clone(),
            content_id: content_id.to_string(),
            kind: ReportKind::Message,
            reason: ReportReason::Troll,
            description: String::new(),
            status: ReportStatus::Pending,
            created_at: Utc::now(),
        });
        id
    }

    pub fn report_status(&self, id: ReportId) -> Option<ReportStatus> {
        self.state
            .lock()
            .reports
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.status)
    }

    pub fn pending_requests(&self, to: &Principal) -> Vec<Principal> {
        self.state.lock().requests.get(to).cloned().unwrap_or_default()
    }

    // ------------------------------------------------------------------------
    // Plumbing
    // ------------------------------------------------------------------------

    /// Record the call, honor holds, then apply programmed failures.
    async fn enter(&self, method: &'static str) -> RemoteResult<()> {
        let hold = {
            let mut state = self.state.lock();
            state.calls.push(method);
            state.holds.remove(method)
        };
        if let Some(hold) = hold {
            hold.entered.notify_one();
            if let Ok(permit) = hold.release.acquire().await {
                permit.forget();
            }
        }
        match self.state.lock().failures.get(method) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn page<T: Clone>(items: &[T], page: PageRequest) -> Vec<T> {
        items
            .iter()
            .rev()
            .skip(page.offset as usize)
            .take(page.limit as usize)
            .cloned()
            .collect()
    }

    fn require_admin(&self, caller: &Principal) -> RemoteResult<()> {
        if self.role_of(caller).is_admin() {
            Ok(())
        } else {
            Err(RemoteError::rejected("Unauthorized: Only admins can perform this action"))
        }
    }

    fn require_active(&self, caller: &Principal) -> RemoteResult<()> {
        match self.state.lock().bans.get(caller) {
            Some(Some(reason)) => Err(RemoteError::rejected(format!(
                "User is banned. Reason: {}",
                reason
            ))),
            Some(None) => Err(RemoteError::rejected("User is banned")),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn has_confirmed_eligibility(&self, caller: &Principal) -> RemoteResult<bool> {
        self.enter("has_confirmed_eligibility").await?;
        Ok(self.state.lock().eligible.contains(caller))
    }

    async fn confirm_eligibility(&self, caller: &Principal) -> RemoteResult<()> {
        self.enter("confirm_eligibility").await?;
        self.state.lock().eligible.insert(caller.clone());
        Ok(())
    }

    async fn get_caller_user_role(&self, caller: &Principal) -> RemoteResult<UserRole> {
        self.enter("get_caller_user_role").await?;
        self.require_active(caller)?;
        Ok(self.role_of(caller))
    }

    async fn is_caller_admin(&self, caller: &Principal) -> RemoteResult<bool> {
        self.enter("is_caller_admin").await?;
        Ok(self.role_of(caller).is_admin())
    }

    async fn assign_caller_user_role(
        &self,
        caller: &Principal,
        user: &Principal,
        role: UserRole,
    ) -> RemoteResult<()> {
        self.enter("assign_caller_user_role").await?;
        self.require_admin(caller)?;
        self.set_role(user, role);
        Ok(())
    }

    async fn get_community_profile(
        &self,
        _caller: &Principal,
        user: &Principal,
    ) -> RemoteResult<CommunityProfile> {
        self.enter("get_community_profile").await?;
        Ok(self
            .state
            .lock()
            .profiles
            .get(user)
            .cloned()
            .unwrap_or_default())
    }

    async fn update_community_profile(
        &self,
        caller: &Principal,
        profile: CommunityProfile,
    ) -> RemoteResult<()> {
        self.enter("update_community_profile").await?;
        self.state.lock().profiles.insert(caller.clone(), profile);
        Ok(())
    }

    async fn browse_mentors(
        &self,
        _caller: &Principal,
        filter: MentorFilter,
    ) -> RemoteResult<Vec<CommunityProfile>> {
        self.enter("browse_mentors").await?;
        let state = self.state.lock();
        let mut found: Vec<CommunityProfile> = state
            .profiles
            .values()
            .filter(|p| !filter.mentoring || p.open_to_mentoring)
            .filter(|p| !filter.mentorship || p.seeking_mentorship)
            .filter(|p| !filter.supporter_of_community || p.supporter_of_community)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.display_name.cmp(&b.display_name));
        Ok(found)
    }

    async fn upload_profile_photo(&self, caller: &Principal, blob: MediaBlob) -> RemoteResult<()> {
        self.enter("upload_profile_photo").await?;
        self.state.lock().photos.insert(caller.clone(), blob);
        Ok(())
    }

    async fn get_profile_photo(
        &self,
        _caller: &Principal,
        user: &Principal,
    ) -> RemoteResult<Option<MediaBlob>> {
        self.enter("get_profile_photo").await?;
        Ok(self.state.lock().photos.get(user).cloned())
    }

    async fn get_contacts(
        &self,
        _caller: &Principal,
        user: &Principal,
    ) -> RemoteResult<Vec<Principal>> {
        self.enter("get_contacts").await?;
        Ok(self.state.lock().contacts.get(user).cloned().unwrap_or_default())
    }

    async fn add_contact(&self, caller: &Principal, to: &Principal) -> RemoteResult<()> {
        self.enter("add_contact").await?;
        let mut state = self.state.lock();
        let pending = state.requests.entry(to.clone()).or_default();
        if pending.contains(caller) {
            return Err(RemoteError::rejected("Connection request already sent"));
        }
        pending.push(caller.clone());
        Ok(())
    }

    async fn accept_contact(&self, caller: &Principal, requester: &Principal) -> RemoteResult<()> {
        self.enter("accept_contact").await?;
        let mut state = self.state.lock();
        let pending = state.requests.entry(caller.clone()).or_default();
        let Some(pos) = pending.iter().position(|p| p == requester) else {
            return Err(RemoteError::rejected("No pending connection request"));
        };
        pending.remove(pos);
        state
            .contacts
            .entry(caller.clone())
            .or_default()
            .push(requester.clone());
        state
            .contacts
            .entry(requester.clone())
            .or_default()
            .push(caller.clone());
        Ok(())
    }

    async fn list_threads(
        &self,
        _caller: &Principal,
        page: PageRequest,
    ) -> RemoteResult<Vec<ConnectionsThread>> {
        self.enter("list_threads").await?;
        Ok(Self::page(&self.state.lock().threads, page))
    }

    async fn create_thread(
        &self,
        caller: &Principal,
        title: String,
        content: String,
    ) -> RemoteResult<ThreadId> {
        self.enter("create_thread").await?;
        let mut state = self.state.lock();
        let id = state.next_id();
        state.threads.push(ConnectionsThread {
            id,
            author: caller.clone(),
            title,
            content,
            replies: Vec::new(),
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn get_thread(&self, _caller: &Principal, id: ThreadId) -> RemoteResult<ConnectionsThread> {
        self.enter("get_thread").await?;
        self.state
            .lock()
            .threads
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| RemoteError::rejected("Thread not found"))
    }

    async fn get_thread_replies(
        &self,
        _caller: &Principal,
        id: ThreadId,
    ) -> RemoteResult<Vec<ConnectionsReply>> {
        self.enter("get_thread_replies").await?;
        Ok(self
            .state
            .lock()
            .replies
            .iter()
            .filter(|r| r.thread_id == id)
            .cloned()
            .collect())
    }

    async fn reply_to_thread(
        &self,
        caller: &Principal,
        id: ThreadId,
        content: String,
    ) -> RemoteResult<ReplyId> {
        self.enter("reply_to_thread").await?;
        let mut state = self.state.lock();
        let reply_id = state.next_id();
        let Some(thread) = state.threads.iter_mut().find(|t| t.id == id) else {
            return Err(RemoteError::rejected("Thread not found"));
        };
        thread.replies.push(reply_id);
        state.replies.push(ConnectionsReply {
            id: reply_id,
            thread_id: id,
            author: caller.clone(),
            content,
            created_at: Utc::now(),
        });
        Ok(reply_id)
    }

    async fn list_hello_corner_messages(
        &self,
        _caller: &Principal,
        page: PageRequest,
    ) -> RemoteResult<Vec<HelloCornerMessage>> {
        self.enter("list_hello_corner_messages").await?;
        Ok(Self::page(&self.state.lock().messages, page))
    }

    async fn create_hello_corner_message(
        &self,
        caller: &Principal,
        draft: MessageDraft,
    ) -> RemoteResult<MessageId> {
        self.enter("create_hello_corner_message").await?;
        let mut state = self.state.lock();
        let id = state.next_id();
        state.messages.push(HelloCornerMessage {
            id,
            author: caller.clone(),
            text: draft.text,
            photo: draft.photo,
            video: draft.video,
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn get_message_reactions(
        &self,
        caller: &Principal,
        id: MessageId,
    ) -> RemoteResult<ReactionCounts> {
        self.enter("get_message_reactions").await?;
        let state = self.state.lock();
        let Some(reactions) = state.reactions.get(&id) else {
            return Ok(ReactionCounts::default());
        };
        Ok(ReactionCounts {
            likes: reactions.values().filter(|r| **r == Reaction::Like).count() as u64,
            dislikes: reactions.values().filter(|r| **r == Reaction::Dislike).count() as u64,
            user_reaction: reactions.get(caller).copied(),
        })
    }

    async fn react_to_message(
        &self,
        caller: &Principal,
        id: MessageId,
        reaction: Reaction,
    ) -> RemoteResult<()> {
        self.enter("react_to_message").await?;
        self.state
            .lock()
            .reactions
            .entry(id)
            .or_default()
            .insert(caller.clone(), reaction);
        Ok(())
    }

    async fn remove_reaction(&self, caller: &Principal, id: MessageId) -> RemoteResult<()> {
        self.enter("remove_reaction").await?;
        if let Some(reactions) = self.state.lock().reactions.get_mut(&id) {
            reactions.remove(caller);
        }
        Ok(())
    }

    async fn report_content(
        &self,
        caller: &Principal,
        content_id: String,
        kind: ReportKind,
        reason: ReportReason,
    ) -> RemoteResult<()> {
        self.enter("report_content").await?;
        let mut state = self.state.lock();
        let id = state.next_id();
        state.reports.push(Report {
            id,
            reporter: caller.clone(),
            content_id,
            kind,
            reason,
            description: String::new(),
            status: ReportStatus::Pending,
            created_at: Utc::now(),
        });
        Ok(())
    }

    async fn list_reports(&self, caller: &Principal, page: PageRequest) -> RemoteResult<Vec<Report>> {
        self.enter("list_reports").await?;
        self.require_admin(caller)?;
        Ok(Self::page(&self.state.lock().reports, page))
    }

    async fn resolve_report(&self, caller: &Principal, id: ReportId) -> RemoteResult<()> {
        self.enter("resolve_report").await?;
        self.require_admin(caller)?;
        let mut state = self.state.lock();
        let report = state
            .reports
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| RemoteError::rejected("Report not found"))?;
        report.status = ReportStatus::Reviewed;
        Ok(())
    }

    async fn remove_content(&self, caller: &Principal, id: ReportId) -> RemoteResult<()> {
        self.enter("remove_content").await?;
        self.require_admin(caller)?;
        let mut state = self.state.lock();
        let Some(pos) = state.reports.iter().position(|r| r.id == id) else {
            return Err(RemoteError::rejected("Report not found"));
        };
        let report = state.reports.remove(pos);
        if let Ok(message_id) = report.content_id.parse::<MessageId>() {
            state.messages.retain(|m| m.id != message_id);
        }
        Ok(())
    }

    async fn ban_user(&self, caller: &Principal, user: &Principal, reason: String) -> RemoteResult<()> {
        self.enter("ban_user").await?;
        self.require_admin(caller)?;
        self.state.lock().bans.insert(user.clone(), Some(reason));
        Ok(())
    }

    async fn unban_user(&self, caller: &Principal, user: &Principal) -> RemoteResult<()> {
        self.enter("unban_user").await?;
        self.require_admin(caller)?;
        self.state.lock().bans.remove(user);
        Ok(())
    }

    async fn check_ban_status(&self, caller: &Principal, user: &Principal) -> RemoteResult<BanRecord> {
        self.enter("check_ban_status").await?;
        self.require_admin(caller)?;
        Ok(match self.state.lock().bans.get(user) {
            Some(reason) => BanRecord {
                is_banned: true,
                reason: reason.clone(),
            },
            None => BanRecord::default(),
        })
    }
}
