//! Protected shell.
//!
//! The single choke point for every authenticated page. Nothing inside the
//! shell renders until the caller's ban status resolves, and a banned caller
//! only ever gets the banned view with a sign-out action.

mod nav;
mod screen;

pub use nav::{NavChrome, NavLink};
pub use screen::{Access, BannedView, Page, Screen};

use crate::cache::QueryState;
use crate::security::BanStatus;

/// Screen for an entry page that sits outside the shell.
///
/// A ban still wins. A failed lookup falls through to `screen`, which
/// carries no community content.
pub fn entry(ban: &QueryState<BanStatus>, screen: Screen) -> Screen {
    match ban {
        QueryState::Idle | QueryState::Loading => Screen::Loading,
        QueryState::Ready(BanStatus::Banned { reason }) => Screen::Banned(BannedView {
            reason: reason.clone(),
        }),
        QueryState::Ready(BanStatus::Active) | QueryState::Failed(_) => screen,
    }
}

/// Wrap `page` in the shell.
pub fn protect(ban: &QueryState<BanStatus>, nav: NavChrome, page: Page) -> Screen {
    match ban {
        QueryState::Idle | QueryState::Loading => Screen::Loading,
        QueryState::Ready(BanStatus::Banned { reason }) => Screen::Banned(BannedView {
            reason: reason.clone(),
        }),
        QueryState::Failed(err) => Screen::Unavailable {
            message: err.to_string(),
        },
        QueryState::Ready(BanStatus::Active) => Screen::Protected { nav, page },
    }
}
