//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::ClientConfig;
use butterfly_api::Principal;
use thiserror::Error;

/// Largest page any listing may request.
pub const MAX_PAGE_SIZE: u64 = 100;

/// Validation errors for configuration.
#[derive(Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("backend.host is required")]
    MissingHost,
    #[error("backend.host must start with http:// or https://, got '{0}'")]
    InvalidHostScheme(String),
    #[error("backend.service_id is not a valid principal: '{0}'")]
    InvalidServiceId(String),
    #[error("pagination.{0} must be between 1 and 100, got {1}")]
    InvalidPageSize(&'static str, u64),
    #[error("media.{0} must be greater than zero")]
    ZeroMediaLimit(&'static str),
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    // Backend
    let host = config.backend.host.trim();
    if host.is_empty() {
        errors.push(ValidationError::MissingHost);
    } else if !(host.starts_with("http://") || host.starts_with("https://")) {
        errors.push(ValidationError::InvalidHostScheme(host.to_string()));
    }
    if let Some(ref id) = config.backend.service_id
        && Principal::from_text(id).is_err()
    {
        errors.push(ValidationError::InvalidServiceId(id.clone()));
    }

    // Pagination
    let pages = [
        ("threads_page_size", config.pagination.threads_page_size),
        ("messages_page_size", config.pagination.messages_page_size),
        ("reports_page_size", config.pagination.reports_page_size),
    ];
    for (name, size) in pages {
        if size == 0 || size > MAX_PAGE_SIZE {
            errors.push(ValidationError::InvalidPageSize(name, size));
        }
    }

    // Media
    if config.media.max_image_bytes == 0 {
        errors.push(ValidationError::ZeroMediaLimit("max_image_bytes"));
    }
    if config.media.max_video_bytes == 0 {
        errors.push(ValidationError::ZeroMediaLimit("max_video_bytes"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
