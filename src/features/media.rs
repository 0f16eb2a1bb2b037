//! Attachment checks applied before anything is uploaded.

use crate::config::MediaConfig;
use crate::error::{ClientError, ClientResult};
use butterfly_api::{MediaBlob, MediaKind};

/// Check that `blob` is an acceptable attachment of kind `expected`.
pub fn validate(blob: &MediaBlob, expected: MediaKind, limits: &MediaConfig) -> ClientResult<()> {
    match expected {
        MediaKind::Image => {
            if blob.kind() != Some(MediaKind::Image) {
                return Err(ClientError::validation("Please select an image file"));
            }
            if blob.len() > limits.max_image_bytes {
                return Err(ClientError::validation(format!(
                    "Image must be smaller than {}",
                    human_size(limits.max_image_bytes)
                )));
            }
        }
        MediaKind::Video => {
            if blob.kind() != Some(MediaKind::Video) {
                return Err(ClientError::validation("Please select a video file"));
            }
            if blob.len() > limits.max_video_bytes {
                return Err(ClientError::validation(format!(
                    "Video must be smaller than {}",
                    human_size(limits.max_video_bytes)
                )));
            }
        }
    }
    Ok(())
}

fn human_size(bytes: usize) -> String {
    const MB: usize = 1024 * 1024;
    if bytes >= MB && bytes % MB == 0 {
        format!("{}MB", bytes / MB)
    } else {
        format!("{} bytes", bytes)
    }
}
