//! RuntimeComponent Controller
//!
//! Watches `RuntimeComponent` resources, normalizes their specs with the
//! operator configuration and reports the outcome of every reconciliation
//! pass as status conditions.

mod config;
mod controller;
mod error;
mod reconciler;
mod watcher;

use crate::config::Settings;
use crate::error::ControllerError;
use controller::Controller;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), ControllerError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting RuntimeComponent Controller");

    let settings = Settings::from_env();

    info!("Configuration:");
    info!("  Namespace: {}", settings.watch_namespace.as_deref().unwrap_or("all namespaces"));
    info!(
        "  Operator ConfigMap: {}/{}",
        settings.operator_namespace, settings.config_map_name
    );

    let controller = Controller::new(settings).await?;
    controller.run().await?;

    Ok(())
}
