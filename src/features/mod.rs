//! Community feature services.
//!
//! Each service owns its identity-scoped query caches and the invalidation
//! rules of its mutations. Every call takes the caller's principal; queries
//! given `None` stay disabled.

pub mod age_gate;
pub mod directory;
pub mod forum;
pub mod hello_corner;
pub mod media;
pub mod moderation;
pub mod profile;

pub use age_gate::{AgeGate, AgeGateForm};
pub use directory::Directory;
pub use forum::{Forum, ReplyDraft, ThreadDraft, normalize_forum_error};
pub use hello_corner::{HelloCorner, MessageComposer};
pub use moderation::{Moderation, UserActionForm};
pub use profile::Profiles;
