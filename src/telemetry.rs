//! Logging setup and span constructors.

use tracing_subscriber::EnvFilter;

/// Install a fmt subscriber.
///
/// `RUST_LOG` takes precedence over `default_filter`. Returns `false` if a
/// global subscriber was already installed.
pub fn init(default_filter: &str) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(true)
        .try_init()
        .is_ok()
}

/// Install a JSON subscriber for log shipping.
pub fn init_json(default_filter: &str) -> bool {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .try_init()
        .is_ok()
}

/// Standardized span constructors for client observability.
pub mod spans {
    use tracing::{Span, info_span};

    /// Span covering everything done under one identity.
    pub fn session(principal: Option<&str>) -> Span {
        match principal {
            Some(p) => info_span!("session", principal = %p),
            None => info_span!("session", principal = "anonymous"),
        }
    }

    /// Span for a render/settle pass at `path`.
    pub fn render(path: &str) -> Span {
        info_span!("render", path = %path)
    }

    /// Span for a user action.
    pub fn mutation(name: &'static str) -> Span {
        info_span!("mutation", name = name)
    }
}
