//! # butterfly-api
//!
//! The remote contract of the Butterfly Connections backend, as seen from a
//! client.
//!
//! ## Contents
//!
//! - [`Principal`]: textual principal handles with format validation
//! - [`UserRole`]: the role assigned to a principal
//! - Community data types carried by calls (profiles, forum threads,
//!   Hello Corner messages, reactions, reports)
//! - [`Backend`]: the async trait every remote call goes through
//! - [`RemoteError`]: how a call fails
//!
//! The backend owns all business logic. Nothing in this crate decides
//! anything beyond whether a string is a well-formed principal.

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod backend;
pub mod error;
pub mod principal;
pub mod role;
pub mod types;

pub use self::backend::Backend;
pub use self::error::{RemoteError, RemoteResult};
pub use self::principal::{Principal, PrincipalError};
pub use self::role::UserRole;
pub use self::types::{
    BanRecord, CommunityProfile, ConnectionsReply, ConnectionsThread, HelloCornerMessage,
    MediaBlob, MediaKind, MentorFilter, MessageDraft, MessageId, PageRequest, Reaction,
    ReactionCounts, ReplyId, Report, ReportId, ReportKind, ReportReason, ReportStatus, ThreadId,
};
