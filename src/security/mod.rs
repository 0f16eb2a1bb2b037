//! Security module for the client core.
//!
//! Provides the ban-detection adapter: the one place that turns the
//! backend's overloaded role-query failure into a typed [`BanStatus`].

pub mod ban;

pub use ban::{BanStatus, ban_status_from, detect_ban};
