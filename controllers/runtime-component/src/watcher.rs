//! Kubernetes resource watchers.
//!
//! This module watches RuntimeComponent resources and triggers
//! reconciliation using `kube_runtime::Controller`, which handles
//! reconnection, retries and per-object serialization of reconcile calls.

use crate::error::ControllerError;
use crate::reconciler::Reconciler;
use crds::RuntimeComponent;
use futures::StreamExt;
use kube::Api;
use kube_runtime::controller::{Action, Config as ControllerConfig};
use kube_runtime::{watcher, Controller};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

/// Requeue delay after a failed reconciliation
const ERROR_REQUEUE: Duration = Duration::from_secs(60);

/// Watches Kubernetes resources for changes.
pub struct Watcher {
    reconciler: Arc<Reconciler>,
    runtime_component_api: Api<RuntimeComponent>,
}

impl Watcher {
    /// Creates a new watcher instance.
    pub fn new(reconciler: Arc<Reconciler>, runtime_component_api: Api<RuntimeComponent>) -> Self {
        Self {
            reconciler,
            runtime_component_api,
        }
    }

    /// Starts watching RuntimeComponent resources.
    pub async fn watch_runtime_components(&self) -> Result<(), ControllerError> {
        info!("Starting RuntimeComponent watcher");

        let error_policy = |rc: Arc<RuntimeComponent>, error: &ControllerError, _ctx: Arc<Reconciler>| {
            let name = rc.metadata.name.as_deref().unwrap_or("<unknown>");
            error!("Reconciliation error for RuntimeComponent {}: {}", name, error);
            Action::requeue(ERROR_REQUEUE)
        };

        let reconcile = |rc: Arc<RuntimeComponent>, ctx: Arc<Reconciler>| async move {
            debug!(
                "Reconciling RuntimeComponent {}",
                rc.metadata.name.as_deref().unwrap_or("<unknown>")
            );
            ctx.reconcile_runtime_component(&rc).await
        };

        // Debounce batches bursts of events for the same object
        let controller_config = ControllerConfig::default()
            .debounce(Duration::from_secs(1))
            .concurrency(4);

        Controller::new(self.runtime_component_api.clone(), watcher::Config::default())
            .with_config(controller_config)
            .run(reconcile, error_policy, Arc::clone(&self.reconciler))
            .for_each(|res| async move {
                match res {
                    Ok((obj, _)) => debug!("Reconciled RuntimeComponent {}", obj.name),
                    Err(e) => error!("RuntimeComponent controller error: {}", e),
                }
            })
            .await;

        Ok(())
    }
}
