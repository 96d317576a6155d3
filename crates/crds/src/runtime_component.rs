//! RuntimeComponent CRD
//!
//! Describes an application container image to run, together with how it is
//! scaled, exposed and bound to other services.

use crate::condition::StatusCondition;
use crate::config::OperatorConfig;
use crate::route::RuntimeComponentRoute;
use crate::service::RuntimeComponentService;
use k8s_openapi::api::core::v1::{EnvVar, ResourceRequirements};
use kube::{CustomResource, ResourceExt};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// API group of the RuntimeComponent CRD, also used as label prefix
pub const GROUP_NAME: &str = "app.stacks";

/// Value of `app.kubernetes.io/managed-by` on generated objects
pub const MANAGED_BY: &str = "runtime-component-operator";

/// RuntimeComponentSpec defines the desired state of a RuntimeComponent
#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[kube(
    group = "app.stacks",
    version = "v1beta1",
    kind = "RuntimeComponent",
    namespaced,
    status = "RuntimeComponentStatus",
    shortname = "app",
    shortname = "apps",
    printcolumn = r#"{"name":"Image","type":"string","jsonPath":".spec.applicationImage","priority":0,"description":"Absolute name of the deployed image containing registry and tag"}"#,
    printcolumn = r#"{"name":"Exposed","type":"boolean","jsonPath":".spec.expose","priority":0,"description":"Specifies whether deployment is exposed externally via default Route"}"#,
    printcolumn = r#"{"name":"Reconciled","type":"string","jsonPath":".status.conditions[?(@.type=='Reconciled')].status","priority":0,"description":"Status of the reconcile condition"}"#,
    printcolumn = r#"{"name":"Reason","type":"string","jsonPath":".status.conditions[?(@.type=='Reconciled')].reason","priority":1,"description":"Reason for the failure of reconcile condition"}"#,
    printcolumn = r#"{"name":"Message","type":"string","jsonPath":".status.conditions[?(@.type=='Reconciled')].message","priority":1,"description":"Failure message from reconcile condition"}"#,
    printcolumn = r#"{"name":"DependenciesSatisfied","type":"string","jsonPath":".status.conditions[?(@.type=='DependenciesSatisfied')].status","priority":1,"description":"Status of the application dependencies"}"#,
    printcolumn = r#"{"name":"Age","type":"date","jsonPath":".metadata.creationTimestamp","priority":0,"description":"Age of the resource"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeComponentSpec {
    /// Application version, added as `app.kubernetes.io/version` label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Container image to deploy
    pub application_image: String,

    /// Number of pod replicas
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replicas: Option<i32>,

    /// Horizontal pod autoscaling
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autoscaling: Option<RuntimeComponentAutoScaling>,

    /// Image pull policy (defaults to IfNotPresent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_policy: Option<PullPolicy>,

    /// Secret with registry credentials
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_secret: Option<String>,

    /// Container resource requests and limits (defaults to unconstrained)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_constraints: Option<ResourceRequirements>,

    /// Kubernetes Service and service bindings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<RuntimeComponentService>,

    /// Whether to expose the component externally through a Route
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expose: Option<bool>,

    /// Environment variables for the application container
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<EnvVar>,

    /// Service account the pods run as
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_account_name: Option<String>,

    /// Node architectures the image supports
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub architecture: Vec<String>,

    /// Persistent storage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<RuntimeComponentStorage>,

    /// Deploy as a Knative Service instead of a Deployment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_knative_service: Option<bool>,

    /// Prometheus monitoring
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monitoring: Option<RuntimeComponentMonitoring>,

    /// Create an application definition for kAppNav
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_app_definition: Option<bool>,

    /// External Route
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<RuntimeComponentRoute>,
}

/// Image pull policy
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub enum PullPolicy {
    /// Always pull
    Always,
    /// Never pull
    Never,
    /// Pull only if the image is missing on the node
    IfNotPresent,
}

/// Autoscaling bounds
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeComponentAutoScaling {
    /// Target average CPU utilization
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "targetCPUUtilizationPercentage")]
    pub target_cpu_utilization_percentage: Option<i32>,

    /// Lower replica bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_replicas: Option<i32>,

    /// Upper replica bound
    #[schemars(range(min = 1))]
    pub max_replicas: i32,
}

/// Persistent storage
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeComponentStorage {
    /// Volume size (e.g. "1Gi")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,

    /// Where the volume is mounted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mount_path: Option<String>,
}

/// Prometheus monitoring
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
pub struct RuntimeComponentMonitoring {
    /// Labels added to the ServiceMonitor
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

/// RuntimeComponentStatus defines the observed state of a RuntimeComponent
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeComponentStatus {
    /// Ordered condition ledger, one entry per condition type
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) conditions: Vec<StatusCondition>,

    /// Image reference that was deployed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_reference: Option<String>,

    /// Resolved consumed services, keyed by binding category
    ///
    /// Written by dependency resolution; carried unchanged by this crate.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub consumed_services: BTreeMap<String, Vec<String>>,
}

impl RuntimeComponent {
    /// Normalizes `spec` using this resource's namespace as owner namespace.
    pub fn initialize(&mut self, config: &OperatorConfig) {
        let namespace = self.metadata.namespace.clone().unwrap_or_default();
        self.spec.normalize(&namespace, config);
    }

    /// Group name used as label and annotation prefix
    pub fn group_name(&self) -> &'static str {
        GROUP_NAME
    }

    /// Labels added to every object generated for this component
    pub fn component_labels(&self) -> BTreeMap<String, String> {
        let name = self.name_any();
        let mut labels = BTreeMap::new();
        labels.insert("app.kubernetes.io/instance".to_string(), name.clone());
        labels.insert("app.kubernetes.io/name".to_string(), name.clone());
        labels.insert("app.kubernetes.io/managed-by".to_string(), MANAGED_BY.to_string());
        labels.insert("app.kubernetes.io/component".to_string(), "backend".to_string());
        labels.insert("app.kubernetes.io/part-of".to_string(), name);

        if let Some(version) = self.spec.version.as_deref().filter(|v| !v.is_empty()) {
            labels.insert("app.kubernetes.io/version".to_string(), version.to_string());
        }

        // User labels win, except the instance label which must identify this resource
        for (key, value) in self.labels() {
            if key != "app.kubernetes.io/instance" {
                labels.insert(key.clone(), value.clone());
            }
        }

        if self.spec.service.as_ref().is_some_and(|s| s.provides.is_some()) {
            labels.insert(format!("service.{GROUP_NAME}/bindable"), "true".to_string());
        }

        labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::{ServiceBindingCategory, ServiceBindingProvides};
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

    fn component(name: &str, labels: &[(&str, &str)]) -> RuntimeComponent {
        let mut rc = RuntimeComponent::new(
            name,
            RuntimeComponentSpec {
                application_image: "registry.example.com/app:1.0".to_string(),
                ..Default::default()
            },
        );
        rc.metadata = ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some("ns1".to_string()),
            labels: Some(
                labels
                    .iter()
                    .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                    .collect(),
            ),
            ..Default::default()
        };
        rc
    }

    #[test]
    fn test_component_labels_defaults() {
        let rc = component("orders", &[]);
        let labels = rc.component_labels();
        assert_eq!(labels.get("app.kubernetes.io/instance").map(String::as_str), Some("orders"));
        assert_eq!(labels.get("app.kubernetes.io/name").map(String::as_str), Some("orders"));
        assert_eq!(labels.get("app.kubernetes.io/part-of").map(String::as_str), Some("orders"));
        assert_eq!(
            labels.get("app.kubernetes.io/managed-by").map(String::as_str),
            Some("runtime-component-operator")
        );
        assert_eq!(labels.get("app.kubernetes.io/component").map(String::as_str), Some("backend"));
        assert!(!labels.contains_key("app.kubernetes.io/version"));
        assert!(!labels.contains_key("service.app.stacks/bindable"));
    }

    #[test]
    fn test_component_labels_user_overrides() {
        let mut rc = component(
            "orders",
            &[
                ("app.kubernetes.io/instance", "hijack"),
                ("app.kubernetes.io/part-of", "shop"),
                ("team", "payments"),
            ],
        );
        rc.spec.version = Some("1.2.3".to_string());

        let labels = rc.component_labels();
        assert_eq!(
            labels.get("app.kubernetes.io/instance").map(String::as_str),
            Some("orders"),
            "Instance label cannot be overridden"
        );
        assert_eq!(labels.get("app.kubernetes.io/part-of").map(String::as_str), Some("shop"));
        assert_eq!(labels.get("team").map(String::as_str), Some("payments"));
        assert_eq!(labels.get("app.kubernetes.io/version").map(String::as_str), Some("1.2.3"));
    }

    #[test]
    fn test_component_labels_bindable() {
        let mut rc = component("orders", &[]);
        rc.spec.service = Some(RuntimeComponentService {
            provides: Some(ServiceBindingProvides::new(ServiceBindingCategory::OpenAPI)),
            ..Default::default()
        });
        assert_eq!(
            rc.component_labels().get("service.app.stacks/bindable").map(String::as_str),
            Some("true")
        );
    }

    #[test]
    fn test_initialize_uses_resource_namespace() {
        use crate::service::ServiceBindingConsumes;

        let mut rc = component("orders", &[]);
        rc.spec.service = Some(RuntimeComponentService {
            consumes: vec![ServiceBindingConsumes::new("billing", ServiceBindingCategory::OpenAPI)],
            ..Default::default()
        });
        rc.initialize(&OperatorConfig::default());

        let consumes = &rc.spec.service.as_ref().expect("service should be set").consumes[0];
        assert_eq!(consumes.namespace.stored(), "ns1_");
        assert_eq!(consumes.namespace(), "ns1");
    }

    #[test]
    fn test_spec_round_trips_optional_fields() {
        let json = serde_json::json!({
            "applicationImage": "registry.example.com/app:1.0",
            "service": {"port": 0},
            "autoscaling": {"maxReplicas": 3, "targetCPUUtilizationPercentage": 50},
        });
        let spec: RuntimeComponentSpec =
            serde_json::from_value(json.clone()).expect("Failed to deserialize spec");
        assert_eq!(
            spec.service.as_ref().and_then(|s| s.port),
            Some(0),
            "An explicit zero must stay distinguishable from unset"
        );
        assert!(spec.pull_policy.is_none());
        assert_eq!(serde_json::to_value(&spec).expect("Failed to serialize spec"), json);
    }
}
