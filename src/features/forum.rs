//! Connections forum.
//!
//! Thread pages, single threads and reply lists are cached per caller.
//! Creating a thread invalidates every thread page; replying invalidates the
//! thread's replies, the thread itself and every thread page.

use crate::cache::{QueryCache, QueryState};
use crate::error::{ClientError, ClientResult};
use crate::mutation::MutationTracker;
use crate::notify::Notices;
use butterfly_api::{
    Backend, ConnectionsReply, ConnectionsThread, PageRequest, Principal, ReplyId, ThreadId,
};
use std::sync::Arc;
use tracing::{Instrument, info};

/// New-thread form state. Kept intact when posting fails.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThreadDraft {
    pub title: String,
    pub content: String,
}

/// Reply form state. Kept intact when posting fails.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplyDraft {
    pub content: String,
}

/// Forum service.
pub struct Forum {
    backend: Arc<dyn Backend>,
    notices: Arc<Notices>,
    page_size: u64,
    threads: QueryCache<PageRequest, Vec<ConnectionsThread>>,
    thread: QueryCache<ThreadId, ConnectionsThread>,
    replies: QueryCache<ThreadId, Vec<ConnectionsReply>>,
    create: MutationTracker,
    reply: MutationTracker,
}

impl Forum {
    pub fn new(backend: Arc<dyn Backend>, notices: Arc<Notices>, page_size: u64) -> Self {
        Self {
            backend,
            notices,
            page_size,
            threads: QueryCache::new("threads"),
            thread: QueryCache::new("thread"),
            replies: QueryCache::new("thread_replies"),
            create: MutationTracker::new(),
            reply: MutationTracker::new(),
        }
    }

    /// The first page of the thread list.
    pub fn first_page(&self) -> PageRequest {
        PageRequest::first(self.page_size)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Load a page of threads.
    pub async fn threads(
        &self,
        caller: Option<&Principal>,
        page: PageRequest,
    ) -> QueryState<Vec<ConnectionsThread>> {
        let backend = Arc::clone(&self.backend);
        self.threads
            .fetch(caller, page, || async move {
                let caller = caller.ok_or(ClientError::Unauthenticated)?;
                Ok(backend.list_threads(caller, page).await?)
            })
            .await
    }

    /// Load one thread.
    pub async fn thread(
        &self,
        caller: Option<&Principal>,
        id: ThreadId,
    ) -> QueryState<ConnectionsThread> {
        let backend = Arc::clone(&self.backend);
        self.thread
            .fetch(caller, id, || async move {
                let caller = caller.ok_or(ClientError::Unauthenticated)?;
                Ok(backend.get_thread(caller, id).await?)
            })
            .await
    }

    /// Load a thread's replies.
    pub async fn replies(
        &self,
        caller: Option<&Principal>,
        id: ThreadId,
    ) -> QueryState<Vec<ConnectionsReply>> {
        let backend = Arc::clone(&self.backend);
        self.replies
            .fetch(caller, id, || async move {
                let caller = caller.ok_or(ClientError::Unauthenticated)?;
                Ok(backend.get_thread_replies(caller, id).await?)
            })
            .await
    }

    /// Cached page of threads.
    pub fn peek_threads(
        &self,
        caller: Option<&Principal>,
        page: PageRequest,
    ) -> QueryState<Vec<ConnectionsThread>> {
        self.threads.peek(caller, &page)
    }

    /// Whether a thread page must be reloaded.
    pub fn threads_need_fetch(&self, caller: Option<&Principal>, page: PageRequest) -> bool {
        self.threads.needs_fetch(caller, &page)
    }

    /// Whether a thread's replies must be reloaded.
    pub fn replies_need_fetch(&self, caller: Option<&Principal>, id: ThreadId) -> bool {
        self.replies.needs_fetch(caller, &id)
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Whether a new thread is being posted.
    pub fn is_creating(&self) -> bool {
        self.create.is_pending()
    }

    /// Whether a reply is being posted.
    pub fn is_replying(&self) -> bool {
        self.reply.is_pending()
    }

    /// Post a new thread from `draft`, clearing it on success.
    pub async fn create_thread(
        &self,
        caller: &Principal,
        draft: &mut ThreadDraft,
    ) -> ClientResult<ThreadId> {
        let title = draft.title.trim().to_string();
        let content = draft.content.trim().to_string();
        if title.is_empty() || content.is_empty() {
            return Err(self.invalid("Please fill in both title and content"));
        }

        let result = self
            .create
            .run(async {
                Ok(self.backend.create_thread(caller, title, content).await?)
            })
            .instrument(crate::telemetry::spans::mutation("create_thread"))
            .await;

        match result {
            Ok(id) => {
                info!(principal = %caller, thread = id, "Thread created");
                self.threads.invalidate_where(caller, |_| true);
                *draft = ThreadDraft::default();
                self.notices.success("Thread created successfully!");
                Ok(id)
            }
            Err(e) => {
                self.notices.error(normalize_forum_error(&e));
                Err(e)
            }
        }
    }

    /// Reply to `thread` from `draft`, clearing it on success.
    pub async fn reply(
        &self,
        caller: &Principal,
        thread: ThreadId,
        draft: &mut ReplyDraft,
    ) -> ClientResult<ReplyId> {
        let content = draft.content.trim().to_string();
        if content.is_empty() {
            return Err(self.invalid("Please enter a reply"));
        }

        let result = self
            .reply
            .run(async { Ok(self.backend.reply_to_thread(caller, thread, content).await?) })
            .instrument(crate::telemetry::spans::mutation("reply_to_thread"))
            .await;

        match result {
            Ok(id) => {
                self.replies.invalidate(caller, &thread);
                self.thread.invalidate(caller, &thread);
                self.threads.invalidate_where(caller, |_| true);
                *draft = ReplyDraft::default();
                self.notices.success("Reply posted successfully!");
                Ok(id)
            }
            Err(e) => {
                self.notices.error(normalize_forum_error(&e));
                Err(e)
            }
        }
    }

    /// Forget everything cached for `principal`.
    pub fn purge(&self, principal: &Principal) {
        self.threads.purge(principal);
        self.thread.purge(principal);
        self.replies.purge(principal);
    }

    fn invalid(&self, message: &str) -> ClientError {
        self.notices.error(message);
        ClientError::validation(message)
    }
}

/// Turn a forum failure into the message shown to the member.
pub fn normalize_forum_error(err: &ClientError) -> String {
    let ClientError::Remote(remote) = err else {
        return err.to_string();
    };
    if remote.is_transport() {
        return "Network error. Please check your connection and try again.".to_string();
    }

    let message = remote.message().to_lowercase();
    let friendly = if message.contains("unauthorized") || message.contains("only users can") {
        "You must be logged in to perform this action."
    } else if message.contains("forbidden")
        || message.contains("only view threads from your connections")
    {
        "You can only view threads from your connections."
    } else if message.contains("thread not found") {
        "This thread could not be found."
    } else if message.contains("connection request already sent") {
        "Connection request already sent."
    } else if message.contains("network") || message.contains("fetch") {
        "Network error. Please check your connection and try again."
    } else {
        return remote.message().to_string();
    };
    friendly.to_string()
}
