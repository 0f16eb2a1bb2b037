//! Route table.
//!
//! Maps a location path onto the page it renders. Matching ignores a query
//! string, a fragment and trailing slashes.

use std::fmt;

/// Landing page; the only page an anonymous visitor may see.
pub const LANDING: &str = "/";
/// Age/eligibility confirmation.
pub const AGE_GATE: &str = "/age-gate";
/// Community feed; the home of an eligible member.
pub const FEED: &str = "/feed";
/// Member directory.
pub const DIRECTORY: &str = "/directory";
/// Forum thread list.
pub const CONNECTIONS: &str = "/connections";
/// The caller's own profile.
pub const PROFILE: &str = "/profile";
/// Community guidelines.
pub const GUIDELINES: &str = "/guidelines";
/// Admin console.
pub const MODERATION: &str = "/moderation";

/// A resolved route.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Landing,
    AgeGate,
    Feed,
    PostDetail { post_id: String },
    ProfileMe,
    ProfileView { user_id: String },
    Directory,
    Connections,
    ThreadDetail { thread_id: String },
    Guidelines,
    Moderation,
    NotFound,
}

impl Route {
    /// Resolve a location path.
    pub fn parse(path: &str) -> Self {
        let path = normalize(path);
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Self::Landing,
            ["age-gate"] => Self::AgeGate,
            ["feed"] => Self::Feed,
            ["post", id] => Self::PostDetail {
                post_id: id.to_string(),
            },
            ["profile"] => Self::ProfileMe,
            ["profile", user] => Self::ProfileView {
                user_id: user.to_string(),
            },
            ["directory"] => Self::Directory,
            ["connections"] => Self::Connections,
            ["connections", thread] => Self::ThreadDetail {
                thread_id: thread.to_string(),
            },
            ["guidelines"] => Self::Guidelines,
            ["moderation"] => Self::Moderation,
            _ => Self::NotFound,
        }
    }

    /// Whether the route renders inside the protected shell.
    pub fn is_protected(&self) -> bool {
        !matches!(self, Self::Landing | Self::AgeGate | Self::NotFound)
    }

    /// Canonical path of the route.
    pub fn path(&self) -> String {
        match self {
            Self::Landing => LANDING.to_string(),
            Self::AgeGate => AGE_GATE.to_string(),
            Self::Feed => FEED.to_string(),
            Self::PostDetail { post_id } => format!("/post/{}", post_id),
            Self::ProfileMe => PROFILE.to_string(),
            Self::ProfileView { user_id } => format!("{}/{}", PROFILE, user_id),
            Self::Directory => DIRECTORY.to_string(),
            Self::Connections => CONNECTIONS.to_string(),
            Self::ThreadDetail { thread_id } => format!("{}/{}", CONNECTIONS, thread_id),
            Self::Guidelines => GUIDELINES.to_string(),
            Self::Moderation => MODERATION.to_string(),
            Self::NotFound => "/404".to_string(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Strip query, fragment and trailing slashes. The root stays `/`.
pub fn normalize(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let trimmed = path[..end].trim_end_matches('/');
    if trimmed.is_empty() { LANDING } else { trimmed }
}
