//! Community data types carried by remote calls.

use crate::principal::Principal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Forum thread identifier.
pub type ThreadId = u64;
/// Forum reply identifier.
pub type ReplyId = u64;
/// Hello Corner message identifier.
pub type MessageId = u64;
/// Moderation report identifier.
pub type ReportId = u64;

// ============================================================================
// Media
// ============================================================================

/// Broad kind of an uploaded media blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// `image/*`
    Image,
    /// `video/*`
    Video,
}

/// An uploaded or downloaded media blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaBlob {
    /// MIME type, e.g. `image/png`.
    pub content_type: String,
    /// Raw content.
    pub bytes: Vec<u8>,
}

impl MediaBlob {
    /// Build a blob from a MIME type and its bytes.
    pub fn new(content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            content_type: content_type.into(),
            bytes,
        }
    }

    /// The media kind implied by the MIME type, if it is image or video.
    pub fn kind(&self) -> Option<MediaKind> {
        if self.content_type.starts_with("image/") {
            Some(MediaKind::Image)
        } else if self.content_type.starts_with("video/") {
            Some(MediaKind::Video)
        } else {
            None
        }
    }

    /// Size in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the blob has no content.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

// ============================================================================
// Profiles & Directory
// ============================================================================

/// A member's community profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityProfile {
    /// Display name.
    pub display_name: String,
    /// Self-described pronouns.
    pub pronouns: String,
    /// Free-form biography.
    pub bio: String,
    /// Interest tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Willing to mentor others.
    pub open_to_mentoring: bool,
    /// Looking for a mentor.
    pub seeking_mentorship: bool,
    /// Supporter (ally) of the community.
    pub supporter_of_community: bool,
    /// Small avatar image.
    #[serde(default)]
    pub avatar: Option<MediaBlob>,
    /// Full profile photo.
    #[serde(default)]
    pub profile_photo: Option<MediaBlob>,
}

/// Directory search filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MentorFilter {
    /// Members open to mentoring.
    pub mentoring: bool,
    /// Members seeking mentorship.
    pub mentorship: bool,
    /// Community supporters.
    pub supporter_of_community: bool,
}

// ============================================================================
// Connections Forum
// ============================================================================

/// A forum thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionsThread {
    /// Thread identifier.
    pub id: ThreadId,
    /// Author principal.
    pub author: Principal,
    /// Title line.
    pub title: String,
    /// Opening post body.
    pub content: String,
    /// Replies known at listing time.
    #[serde(default)]
    pub replies: Vec<ReplyId>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// A reply in a forum thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionsReply {
    /// Reply identifier.
    pub id: ReplyId,
    /// Thread the reply belongs to.
    pub thread_id: ThreadId,
    /// Author principal.
    pub author: Principal,
    /// Reply body.
    pub content: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Hello Corner
// ============================================================================

/// A Hello Corner feed message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelloCornerMessage {
    /// Message identifier.
    pub id: MessageId,
    /// Author principal.
    pub author: Principal,
    /// Message text.
    pub text: String,
    /// Optional photo attachment.
    #[serde(default)]
    pub photo: Option<MediaBlob>,
    /// Optional video attachment.
    #[serde(default)]
    pub video: Option<MediaBlob>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// A new Hello Corner message as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDraft {
    /// Message text (already trimmed).
    pub text: String,
    /// Optional photo.
    pub photo: Option<MediaBlob>,
    /// Optional video.
    pub video: Option<MediaBlob>,
}

/// A reaction to a Hello Corner message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reaction {
    /// Thumbs up.
    Like,
    /// Thumbs down.
    Dislike,
}

/// Reaction tallies for one message, as seen by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionCounts {
    /// Number of likes.
    pub likes: u64,
    /// Number of dislikes.
    pub dislikes: u64,
    /// The caller's own reaction, if any.
    pub user_reaction: Option<Reaction>,
}

// ============================================================================
// Moderation
// ============================================================================

/// What kind of content a report targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    /// A member profile.
    Profile,
    /// A feed or forum message.
    Message,
}

impl ReportKind {
    /// Console label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Profile => "Profile",
            Self::Message => "Message",
        }
    }
}

/// Why content was reported.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReportReason {
    /// Unsolicited lecturing.
    Lecture,
    /// Trolling.
    Troll,
    /// Off topic.
    OffTopic,
    /// Guideline violation.
    Violation,
    /// Insensitive content.
    Insensitive,
    /// Anything else, described by the reporter.
    Other(String),
}

impl ReportReason {
    /// Console label.
    pub fn label(&self) -> String {
        match self {
            Self::Lecture => "Lecture".to_string(),
            Self::Troll => "Troll".to_string(),
            Self::OffTopic => "Off Topic".to_string(),
            Self::Violation => "Violation".to_string(),
            Self::Insensitive => "Insensitive".to_string(),
            Self::Other(text) => format!("Other: {}", text),
        }
    }
}

impl fmt::Display for ReportReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Review state of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    /// Awaiting an admin.
    Pending,
    /// Handled.
    Reviewed,
}

/// A moderation report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Report identifier.
    pub id: ReportId,
    /// Who filed it.
    pub reporter: Principal,
    /// Reported content identifier.
    pub content_id: String,
    /// Kind of reported content.
    pub kind: ReportKind,
    /// Reason category.
    pub reason: ReportReason,
    /// Additional description.
    #[serde(default)]
    pub description: String,
    /// Review state.
    pub status: ReportStatus,
    /// Filing time.
    pub created_at: DateTime<Utc>,
}

impl Report {
    /// Whether the report still awaits review.
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.status == ReportStatus::Pending
    }
}

/// Ban state of another principal, as returned by the admin lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BanRecord {
    /// Whether the principal is banned.
    pub is_banned: bool,
    /// Reason given when banning.
    #[serde(default)]
    pub reason: Option<String>,
}

// ============================================================================
// Pagination
// ============================================================================

/// Offset/limit window for listing calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageRequest {
    /// Items to skip.
    pub offset: u64,
    /// Maximum items to return.
    pub limit: u64,
}

impl PageRequest {
    /// First page of `limit` items.
    pub fn first(limit: u64) -> Self {
        Self { offset: 0, limit }
    }

    /// The page following this one.
    pub fn next(self) -> Self {
        Self {
            offset: self.offset + self.limit,
            limit: self.limit,
        }
    }
}
