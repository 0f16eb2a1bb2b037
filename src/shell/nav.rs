//! Navigation chrome shared by every protected page.

use crate::routes;

/// A link in the authenticated navigation bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavLink {
    Feed,
    Directory,
    Connections,
    Profile,
    Guidelines,
    Moderation,
}

impl NavLink {
    /// Link target.
    pub fn path(self) -> &'static str {
        match self {
            Self::Feed => routes::FEED,
            Self::Directory => routes::DIRECTORY,
            Self::Connections => routes::CONNECTIONS,
            Self::Profile => routes::PROFILE,
            Self::Guidelines => routes::GUIDELINES,
            Self::Moderation => routes::MODERATION,
        }
    }

    /// Link text.
    pub fn label(self) -> &'static str {
        match self {
            Self::Feed => "Feed",
            Self::Directory => "Directory",
            Self::Connections => "Connections",
            Self::Profile => "Profile",
            Self::Guidelines => "Guidelines",
            Self::Moderation => "Moderation",
        }
    }
}

/// The navigation bar. Always carries a sign-out action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavChrome {
    links: Vec<NavLink>,
}

impl NavChrome {
    /// Build the bar; the moderation link is admin-only.
    pub fn new(is_admin: bool) -> Self {
        let mut links = vec![
            NavLink::Feed,
            NavLink::Directory,
            NavLink::Connections,
            NavLink::Profile,
            NavLink::Guidelines,
        ];
        if is_admin {
            links.push(NavLink::Moderation);
        }
        Self { links }
    }

    /// Visible links, in order.
    pub fn links(&self) -> &[NavLink] {
        &self.links
    }

    /// Whether `link` is visible.
    pub fn shows(&self, link: NavLink) -> bool {
        self.links.contains(&link)
    }

    /// The link active for `path`, if any.
    pub fn active(&self, path: &str) -> Option<NavLink> {
        let path = routes::normalize(path);
        self.links
            .iter()
            .copied()
            .find(|link| path == link.path() || path.starts_with(&format!("{}/", link.path())))
    }
}
