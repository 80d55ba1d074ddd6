pub mod allowlist;
pub mod config;
pub mod error;
pub mod gateway;
pub mod invoker;
pub mod locator;
pub mod models;
pub mod request;
pub mod server;
pub mod state;
pub mod table;
pub mod telemetry;

use crate::{config::AppConfig, server::Server};
use std::path::Path;

/// Loads configuration and serves `/api` until the listener fails.
pub async fn run(config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = AppConfig::load(config_path)?;
    if config.allowlist.is_empty() {
        tracing::warn!("allowed_procs is empty; every request will be rejected as invalid proc");
    }
    Server::new(config).run().await
}
