//! Session-scoped client state.
//!
//! Contains the identity holder and the browser location.

mod location;
mod session;

pub use location::Location;
pub use session::{Identity, Session};
