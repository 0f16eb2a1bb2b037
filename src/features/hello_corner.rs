//! Hello Corner community feed.
//!
//! Message pages and per-message reaction tallies are cached per caller.
//! Reactions use an explicit optimistic overlay: while a toggle is in flight
//! its target reaction is layered over the last server tallies, and the
//! overlay is dropped only after the refetched tallies have landed.

use super::media;
use crate::cache::{QueryCache, QueryState};
use crate::config::MediaConfig;
use crate::error::{ClientError, ClientResult};
use crate::mutation::MutationTracker;
use crate::notify::Notices;
use butterfly_api::{
    Backend, HelloCornerMessage, MediaBlob, MediaKind, MessageDraft, MessageId, PageRequest,
    Principal, Reaction, ReactionCounts,
};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use tracing::{Instrument, debug, warn};

/// Composer state for a new message. Kept intact when posting fails.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageComposer {
    pub text: String,
    photo: Option<MediaBlob>,
    video: Option<MediaBlob>,
}

impl MessageComposer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn photo(&self) -> Option<&MediaBlob> {
        self.photo.as_ref()
    }

    pub fn video(&self) -> Option<&MediaBlob> {
        self.video.as_ref()
    }

    pub fn remove_photo(&mut self) {
        self.photo = None;
    }

    pub fn remove_video(&mut self) {
        self.video = None;
    }

    fn to_draft(&self) -> MessageDraft {
        MessageDraft {
            text: self.text.trim().to_string(),
            photo: self.photo.clone(),
            video: self.video.clone(),
        }
    }
}

/// Apply a pending reaction change to server tallies.
fn apply_overlay(mut counts: ReactionCounts, target: Option<Reaction>) -> ReactionCounts {
    match counts.user_reaction {
        Some(Reaction::Like) => counts.likes = counts.likes.saturating_sub(1),
        Some(Reaction::Dislike) => counts.dislikes = counts.dislikes.saturating_sub(1),
        None => {}
    }
    match target {
        Some(Reaction::Like) => counts.likes += 1,
        Some(Reaction::Dislike) => counts.dislikes += 1,
        None => {}
    }
    counts.user_reaction = target;
    counts
}

/// Hello Corner service.
pub struct HelloCorner {
    backend: Arc<dyn Backend>,
    notices: Arc<Notices>,
    limits: MediaConfig,
    page_size: u64,
    messages: QueryCache<PageRequest, Vec<HelloCornerMessage>>,
    reactions: QueryCache<MessageId, ReactionCounts>,
    /// Pending reaction target per (caller, message).
    overlay: DashMap<(Principal, MessageId), Option<Reaction>>,
    post: MutationTracker,
}

impl HelloCorner {
    pub fn new(
        backend: Arc<dyn Backend>,
        notices: Arc<Notices>,
        limits: MediaConfig,
        page_size: u64,
    ) -> Self {
        Self {
            backend,
            notices,
            limits,
            page_size,
            messages: QueryCache::new("hello_corner_messages"),
            reactions: QueryCache::new("message_reactions"),
            overlay: DashMap::new(),
            post: MutationTracker::new(),
        }
    }

    /// The first page of the feed.
    pub fn first_page(&self) -> PageRequest {
        PageRequest::first(self.page_size)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Load a page of messages.
    pub async fn messages(
        &self,
        caller: Option<&Principal>,
        page: PageRequest,
    ) -> QueryState<Vec<HelloCornerMessage>> {
        let backend = Arc::clone(&self.backend);
        self.messages
            .fetch(caller, page, || async move {
                let caller = caller.ok_or(ClientError::Unauthenticated)?;
                Ok(backend.list_hello_corner_messages(caller, page).await?)
            })
            .await
    }

    /// Load a message's reaction tallies from the server.
    pub async fn reactions(
        &self,
        caller: Option<&Principal>,
        id: MessageId,
    ) -> QueryState<ReactionCounts> {
        let backend = Arc::clone(&self.backend);
        self.reactions
            .fetch(caller, id, || async move {
                let caller = caller.ok_or(ClientError::Unauthenticated)?;
                Ok(backend.get_message_reactions(caller, id).await?)
            })
            .await
    }

    /// Whether a message page must be reloaded.
    pub fn messages_need_fetch(&self, caller: Option<&Principal>, page: PageRequest) -> bool {
        self.messages.needs_fetch(caller, &page)
    }

    /// Tallies as displayed: server tallies with any pending toggle applied.
    pub fn effective_reactions(
        &self,
        caller: Option<&Principal>,
        id: MessageId,
    ) -> QueryState<ReactionCounts> {
        let base = self.reactions.peek(caller, &id);
        let Some(caller) = caller else {
            return base;
        };
        match self.overlay.get(&(caller.clone(), id)) {
            Some(target) => base.map(|counts| apply_overlay(counts, *target)),
            None => base,
        }
    }

    /// Whether a toggle on `id` is in flight for `caller`.
    pub fn is_reacting(&self, caller: &Principal, id: MessageId) -> bool {
        self.overlay.contains_key(&(caller.clone(), id))
    }

    // ========================================================================
    // Composer
    // ========================================================================

    /// Attach a photo, replacing any previous one.
    pub fn attach_photo(&self, composer: &mut MessageComposer, blob: MediaBlob) -> ClientResult<()> {
        self.checked(media::validate(&blob, MediaKind::Image, &self.limits))?;
        composer.photo = Some(blob);
        self.notices.success("Photo attached!");
        Ok(())
    }

    /// Attach a video, replacing any previous one.
    pub fn attach_video(&self, composer: &mut MessageComposer, blob: MediaBlob) -> ClientResult<()> {
        self.checked(media::validate(&blob, MediaKind::Video, &self.limits))?;
        composer.video = Some(blob);
        self.notices.success("Video attached!");
        Ok(())
    }

    /// Whether a message is being posted.
    pub fn is_posting(&self) -> bool {
        self.post.is_pending()
    }

    /// Post the composer's message, resetting it on success.
    pub async fn post(
        &self,
        caller: &Principal,
        composer: &mut MessageComposer,
    ) -> ClientResult<MessageId> {
        let draft = composer.to_draft();
        if draft.text.is_empty() {
            return self.checked(Err(ClientError::validation("Please enter a message")));
        }

        let result = self
            .post
            .run(async { Ok(self.backend.create_hello_corner_message(caller, draft).await?) })
            .instrument(crate::telemetry::spans::mutation("create_hello_corner_message"))
            .await;

        match result {
            Ok(id) => {
                self.messages.invalidate_where(caller, |_| true);
                *composer = MessageComposer::default();
                self.notices.success("Message posted!");
                Ok(id)
            }
            Err(e) => {
                warn!(principal = %caller, error = %e, code = e.error_code(), "Failed to post message");
                self.notices.error("Failed to post message");
                Err(e)
            }
        }
    }

    // ========================================================================
    // Reactions
    // ========================================================================

    /// Toggle `reaction` on message `id`.
    ///
    /// Choosing the caller's current reaction removes it. A second toggle on
    /// the same message while one is pending is refused with
    /// [`ClientError::Busy`].
    pub async fn toggle_reaction(
        &self,
        caller: &Principal,
        id: MessageId,
        reaction: Reaction,
    ) -> ClientResult<()> {
        let key = (caller.clone(), id);
        let target = match self.overlay.entry(key.clone()) {
            Entry::Occupied(_) => {
                debug!(principal = %caller, message = id, "Reaction toggle ignored while pending");
                return Err(ClientError::Busy);
            }
            Entry::Vacant(slot) => {
                let current = self
                    .reactions
                    .peek(Some(caller), &id)
                    .value()
                    .and_then(|counts| counts.user_reaction);
                let target = if current == Some(reaction) {
                    None
                } else {
                    Some(reaction)
                };
                slot.insert(target);
                target
            }
        };

        // dropped on every exit, including a toggle abandoned mid-call
        let _pending = PendingReaction {
            overlay: &self.overlay,
            key: &key,
        };

        let result = match target {
            Some(r) => self.backend.react_to_message(caller, id, r).await,
            None => self.backend.remove_reaction(caller, id).await,
        };

        if let Err(e) = result {
            let e = ClientError::from(e);
            debug!(principal = %caller, message = id, error = %e, "Reaction update failed");
            self.notices.error("Failed to update reaction");
            return Err(e);
        }

        self.reactions.invalidate(caller, &id);
        self.messages.invalidate_where(caller, |_| true);
        // reconcile: the overlay stays until the server tallies are back
        self.reactions(Some(caller), id).await;
        Ok(())
    }

    /// Forget everything cached for `principal`.
    pub fn purge(&self, principal: &Principal) {
        self.messages.purge(principal);
        self.reactions.purge(principal);
        self.overlay.retain(|(p, _), _| p != principal);
    }

    fn checked<T>(&self, result: ClientResult<T>) -> ClientResult<T> {
        if let Err(ref e) = result {
            self.notices.error(e.to_string());
        }
        result
    }
}

/// Owns one overlay entry and discards it when the toggle ends.
struct PendingReaction<'a> {
    overlay: &'a DashMap<(Principal, MessageId), Option<Reaction>>,
    key: &'a (Principal, MessageId),
}

impl Drop for PendingReaction<'_> {
    fn drop(&mut self) {
        self.overlay.remove(self.key);
    }
}
