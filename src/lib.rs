//! butterfly-client - Butterfly Connections client core
//!
//! Identity-aware navigation gate, per-identity capability cache and the
//! protected shell every authenticated page renders through, plus the
//! community feature services (forum, Hello Corner feed, directory,
//! profiles, moderation) that sit behind them.
//!
//! The backend is reached only through [`butterfly_api::Backend`].

pub mod app;
pub mod cache;
pub mod config;
pub mod error;
pub mod features;
pub mod gate;
pub mod mutation;
pub mod notify;
pub mod routes;
pub mod security;
pub mod shell;
pub mod state;
pub mod telemetry;

pub use app::App;
pub use cache::{CapabilityCache, QueryCache, QueryState};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use security::BanStatus;
pub use shell::{Access, NavChrome, NavLink, Page, Screen};
pub use state::{Identity, Session};
