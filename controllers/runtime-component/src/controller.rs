//! Main controller implementation.
//!
//! This module contains the `Controller` struct that orchestrates
//! configuration loading, reconciliation and resource watching for the
//! RuntimeComponent Controller.

use crate::config::{Settings, load_operator_config};
use crate::error::ControllerError;
use crate::reconciler::Reconciler;
use crate::watcher::Watcher;
use crds::RuntimeComponent;
use kube::{Api, Client};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

/// Main controller for RuntimeComponent management.
pub struct Controller {
    runtime_component_watcher: JoinHandle<Result<(), ControllerError>>,
}

impl Controller {
    /// Creates a new controller instance.
    pub async fn new(settings: Settings) -> Result<Self, ControllerError> {
        info!("Initializing RuntimeComponent Controller");

        let kube_client = Client::try_default().await?;

        let operator_config = load_operator_config(kube_client.clone(), &settings).await?;
        info!("Operator configuration: {:?}", operator_config);

        let runtime_component_api: Api<RuntimeComponent> = match settings.watch_namespace.as_deref() {
            Some(ns) => Api::namespaced(kube_client.clone(), ns),
            None => Api::all(kube_client.clone()),
        };

        let reconciler = Arc::new(Reconciler::new(kube_client, operator_config));
        let watcher = Watcher::new(reconciler, runtime_component_api);

        let runtime_component_watcher = tokio::spawn(async move {
            watcher.watch_runtime_components().await
        });

        Ok(Self {
            runtime_component_watcher,
        })
    }

    /// Runs the controller until shutdown.
    pub async fn run(self) -> Result<(), ControllerError> {
        info!("RuntimeComponent Controller running");

        self.runtime_component_watcher
            .await
            .map_err(|e| ControllerError::Watch(format!("RuntimeComponent watcher panicked: {}", e)))?
            .map_err(|e| ControllerError::Watch(format!("RuntimeComponent watcher error: {}", e)))?;

        Ok(())
    }
}
