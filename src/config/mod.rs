//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Config struct definitions (ClientConfig, BackendConfig, PaginationConfig, MediaConfig)
//! - [`defaults`]: serde default value functions
//! - [`validation`]: startup validation collecting every problem at once

mod defaults;
mod types;
pub mod validation;

pub use types::{BackendConfig, ClientConfig, ConfigError, MediaConfig, PaginationConfig};
pub use validation::{ValidationError, validate};
