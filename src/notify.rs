//! User-facing notices (toasts).
//!
//! Remote failures of user actions land here instead of unwinding through
//! the render tree.

use parking_lot::Mutex;
use std::collections::VecDeque;
use tracing::debug;

/// Cap on undelivered notices; the oldest are dropped first.
const MAX_PENDING: usize = 32;

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A single toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Queue of notices awaiting display.
#[derive(Debug, Default)]
pub struct Notices {
    queue: Mutex<VecDeque<Notice>>,
}

impl Notices {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a success notice.
    pub fn success(&self, message: impl Into<String>) {
        self.push(NoticeLevel::Success, message.into());
    }

    /// Queue an error notice.
    pub fn error(&self, message: impl Into<String>) {
        self.push(NoticeLevel::Error, message.into());
    }

    /// Take every queued notice, oldest first.
    pub fn drain(&self) -> Vec<Notice> {
        self.queue.lock().drain(..).collect()
    }

    /// The most recent notice, without taking it.
    pub fn last(&self) -> Option<Notice> {
        self.queue.lock().back().cloned()
    }

    fn push(&self, level: NoticeLevel, message: String) {
        debug!(level = ?level, message = %message, "Notice");
        let mut queue = self.queue.lock();
        if queue.len() == MAX_PENDING {
            queue.pop_front();
        }
        queue.push_back(Notice { level, message });
    }
}
