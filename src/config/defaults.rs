//! Default value functions for configuration.
//!
//! Separated into its own module for clarity and reuse.

// =============================================================================
// Backend Defaults
// =============================================================================

pub fn default_host() -> String {
    "https://icp-api.io".to_string()
}

// =============================================================================
// Pagination Defaults
// =============================================================================

pub fn default_page_size() -> u64 {
    20
}

// =============================================================================
// Media Defaults
// =============================================================================

/// 5 MiB.
pub fn default_max_image_bytes() -> usize {
    5 * 1024 * 1024
}

/// 50 MiB.
pub fn default_max_video_bytes() -> usize {
    50 * 1024 * 1024
}
