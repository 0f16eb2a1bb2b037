//! Integration test common infrastructure.
//!
//! Provides an in-memory backend, well-known principals and helpers for
//! driving an [`App`] through login and settle.

#![allow(dead_code)]

pub mod backend;

pub use backend::{FakeBackend, Hold};

use butterfly_client::config::ClientConfig;
use butterfly_client::{App, Identity, Screen};
use butterfly_api::{Principal, UserRole};
use std::sync::Arc;

pub const ALICE: &str = "aaaaa-aa";
pub const BOB: &str = "2vxsx-fae";
pub const ADMIN: &str = "rrkah-fqaaa-aaaaa-aaaaq-cai";

pub fn principal(text: &str) -> anyhow::Result<Principal> {
    Ok(Principal::from_text(text)?)
}

pub fn alice() -> Principal {
    Principal::from_text(ALICE).expect("valid principal")
}

pub fn bob() -> Principal {
    Principal::from_text(BOB).expect("valid principal")
}

pub fn admin() -> Principal {
    Principal::from_text(ADMIN).expect("valid principal")
}

/// Route client logs to the test harness when `RUST_LOG` is set.
pub fn init_tracing() {
    let _ = butterfly_client::telemetry::init("warn");
}

/// A fresh client over `backend` with default configuration.
pub fn app(backend: &Arc<FakeBackend>) -> App {
    init_tracing();
    App::new(ClientConfig::default(), Arc::clone(backend) as Arc<dyn butterfly_api::Backend>)
}

/// Backend with alice eligible, bob not yet, and an eligible admin.
pub fn community() -> Arc<FakeBackend> {
    let backend = FakeBackend::new();
    backend.set_eligible(&alice(), true);
    backend.set_eligible(&admin(), true);
    backend.set_role(&admin(), UserRole::Admin);
    backend
}

/// Log `who` in, navigate to `path` and settle.
pub async fn visit(app: &App, who: &Principal, path: &str) -> Screen {
    app.login(Identity::new(who.clone()));
    app.navigate(path);
    app.settle().await
}

/// Wait for `hold` to be entered, with a generous timeout.
pub async fn entered(hold: &Hold) -> anyhow::Result<()> {
    tokio::time::timeout(std::time::Duration::from_secs(5), hold.entered()).await?;
    Ok(())
}
