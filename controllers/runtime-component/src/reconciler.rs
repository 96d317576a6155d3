//! Reconciliation logic for RuntimeComponent CRDs.
//!
//! Each pass normalizes a copy of the spec, checks it, records the outcome as
//! the `Reconciled` condition and patches the status subresource. The
//! normalized spec is not written back; it is recomputed on every pass.

use crate::error::ControllerError;
use chrono::{DateTime, Utc};
use crds::{
    ConditionStatus, OperatorConfig, RuntimeComponent, RuntimeComponentSpec,
    RuntimeComponentStatus, StatusCondition, StatusConditionType,
};
use kube::api::{Patch, PatchParams};
use kube::{Api, Client};
use kube_runtime::controller::Action;
use std::collections::BTreeSet;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Requeue interval after a successful pass
const RESYNC_INTERVAL: Duration = Duration::from_secs(300);

/// Result of checking a normalized spec
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Spec is usable
    Success,
    /// Spec cannot be acted on
    Failed {
        /// Short machine-readable reason
        reason: String,
        /// Human-readable message
        message: String,
    },
}

impl ReconcileOutcome {
    fn failed(reason: &str, message: String) -> Self {
        Self::Failed {
            reason: reason.to_string(),
            message,
        }
    }

    /// `Reconciled` condition reporting this outcome
    pub fn condition(&self) -> StatusCondition {
        match self {
            Self::Success => {
                StatusCondition::new(StatusConditionType::Reconciled, ConditionStatus::True)
            }
            Self::Failed { reason, message } => {
                StatusCondition::new(StatusConditionType::Reconciled, ConditionStatus::False)
                    .with_reason(reason.as_str())
                    .with_message(message.as_str())
            }
        }
    }
}

/// Checks a normalized spec for problems admission does not catch.
pub fn validate_spec(spec: &RuntimeComponentSpec) -> ReconcileOutcome {
    if spec.application_image.trim().is_empty() {
        return ReconcileOutcome::failed(
            "ValidationFailed",
            "spec.applicationImage must not be empty".to_string(),
        );
    }

    if let Some(service) = &spec.service {
        let mut seen = BTreeSet::new();
        for consumes in &service.consumes {
            if !seen.insert(consumes.name.as_str()) {
                return ReconcileOutcome::failed(
                    "ValidationFailed",
                    format!("spec.service.consumes lists {} more than once", consumes.name),
                );
            }
        }
    }

    ReconcileOutcome::Success
}

/// Builds the next status from the previous one.
pub fn build_status(
    previous: Option<&RuntimeComponentStatus>,
    spec: &RuntimeComponentSpec,
    outcome: &ReconcileOutcome,
    now: DateTime<Utc>,
) -> RuntimeComponentStatus {
    let mut status = previous.cloned().unwrap_or_default();
    status.set_condition_at(outcome.condition(), now);
    if *outcome == ReconcileOutcome::Success {
        status.image_reference = Some(spec.application_image.clone());
    }
    status
}

/// Whether recording `outcome` would change anything besides timestamps.
///
/// Skipping no-op patches keeps status writes from retriggering the watch.
pub fn status_needs_update(
    previous: Option<&RuntimeComponentStatus>,
    spec: &RuntimeComponentSpec,
    outcome: &ReconcileOutcome,
) -> bool {
    let Some(previous) = previous else {
        return true;
    };
    let Some(current) = previous.get_condition(StatusConditionType::Reconciled) else {
        return true;
    };

    let wanted = outcome.condition();
    if current.status != wanted.status
        || current.reason != wanted.reason
        || current.message != wanted.message
    {
        return true;
    }

    *outcome == ReconcileOutcome::Success
        && previous.image_reference.as_deref() != Some(spec.application_image.as_str())
}

/// Reconciles RuntimeComponent resources.
pub struct Reconciler {
    client: Client,
    config: OperatorConfig,
}

impl Reconciler {
    /// Creates a new reconciler instance.
    pub fn new(client: Client, config: OperatorConfig) -> Self {
        Self { client, config }
    }

    /// Reconciles a RuntimeComponent resource.
    ///
    /// This method:
    /// 1. Normalizes a copy of the spec with the operator configuration
    /// 2. Checks the normalized spec
    /// 3. Records the outcome in the `Reconciled` condition
    /// 4. Patches the status if anything changed
    pub async fn reconcile_runtime_component(
        &self,
        rc: &RuntimeComponent,
    ) -> Result<Action, ControllerError> {
        let name = rc.metadata.name.as_ref().ok_or_else(|| {
            ControllerError::InvalidConfig("RuntimeComponent missing name".to_string())
        })?;
        let namespace = rc.metadata.namespace.as_deref().unwrap_or("default");

        info!("Reconciling RuntimeComponent {}/{}", namespace, name);

        let mut instance = rc.clone();
        instance.initialize(&self.config);
        debug!("Normalized spec for {}/{}: {:?}", namespace, name, instance.spec);

        let outcome = validate_spec(&instance.spec);
        if let ReconcileOutcome::Failed { reason, message } = &outcome {
            warn!("RuntimeComponent {}/{} failed validation ({}): {}", namespace, name, reason, message);
        }

        if !status_needs_update(rc.status.as_ref(), &instance.spec, &outcome) {
            debug!("RuntimeComponent {}/{} status already up-to-date", namespace, name);
            return Ok(Action::requeue(RESYNC_INTERVAL));
        }

        let status = build_status(rc.status.as_ref(), &instance.spec, &outcome, Utc::now());
        let patch = status_patch(&status)?;

        let api: Api<RuntimeComponent> = Api::namespaced(self.client.clone(), namespace);
        let pp = PatchParams::default();
        match api.patch_status(name, &pp, &Patch::Merge(&patch)).await {
            Ok(_) => {
                info!("Updated RuntimeComponent {}/{} status", namespace, name);
                Ok(Action::requeue(RESYNC_INTERVAL))
            }
            Err(e) => {
                error!("Failed to update RuntimeComponent {}/{} status: {}", namespace, name, e);
                Err(ControllerError::Kube(e))
            }
        }
    }
}

/// Merge patch replacing the status subresource.
pub fn status_patch(status: &RuntimeComponentStatus) -> Result<serde_json::Value, ControllerError> {
    Ok(serde_json::json!({ "status": serde_json::to_value(status)? }))
}
