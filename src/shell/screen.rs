//! What a render pass produces.

use super::nav::NavChrome;
use butterfly_api::ThreadId;

/// Access to an admin-only page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Role lookup in flight.
    Checking,
    Granted,
    /// Replaces the whole content area.
    Denied,
}

/// A page rendered inside the protected shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    /// Hello Corner feed.
    Feed,
    PostDetail { post_id: String },
    ProfileMe,
    ProfileView { user_id: String },
    Directory,
    Connections,
    /// `thread_id` is `None` when the path segment is not a thread number.
    ThreadDetail { thread_id: Option<ThreadId> },
    Guidelines,
    Moderation(Access),
}

/// Terminal view for a banned caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BannedView {
    pub reason: Option<String>,
}

impl BannedView {
    pub const TITLE: &'static str = "Account Banned";
    pub const BODY: &'static str =
        "Your account has been banned from Butterfly Connections.";
}

/// Outcome of a render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Spinner only.
    Loading,
    Landing,
    AgeGate,
    NotFound,
    /// Banned; sign-out is the only action.
    Banned(BannedView),
    /// A required capability lookup failed; no content is shown.
    Unavailable { message: String },
    /// Shell with navigation chrome around a page.
    Protected { nav: NavChrome, page: Page },
}

impl Screen {
    /// The wrapped page, if the shell admitted one.
    pub fn page(&self) -> Option<&Page> {
        match self {
            Self::Protected { page, .. } => Some(page),
            _ => None,
        }
    }

    /// The navigation chrome, if shown.
    pub fn nav(&self) -> Option<&NavChrome> {
        match self {
            Self::Protected { nav, .. } => Some(nav),
            _ => None,
        }
    }

    /// Whether the screen offers a sign-out action.
    pub fn can_sign_out(&self) -> bool {
        matches!(
            self,
            Self::AgeGate | Self::Banned(_) | Self::Unavailable { .. } | Self::Protected { .. }
        )
    }
}
