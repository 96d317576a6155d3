//! Spec defaulting
//!
//! Fills in every optional field that has a documented default so the rest
//! of a reconciliation pass can rely on a complete spec. Only unset fields
//! are touched, so normalizing an already normalized spec changes nothing.
//!
//! | field                               | default                                 |
//! |-------------------------------------|-----------------------------------------|
//! | `pullPolicy`                        | `IfNotPresent`                          |
//! | `resourceConstraints`               | `{}`                                    |
//! | `service`                           | `{}` (then the service defaults below)  |
//! | `service.type`                      | `ClusterIP`                             |
//! | `service.port` (unset or 0)         | `8080`                                  |
//! | `service.provides.protocol`         | `http`                                  |
//! | `service.consumes[].namespace`      | owner namespace, marked as defaulted    |
//! | `*.certificate.issuerRef.name`      | `defaultIssuer` config key              |
//! | `*.certificate.issuerRef.kind`      | `ClusterIssuer` unless `useClusterIssuer` is `"false"` |

use crate::certificate::{CLUSTER_ISSUER_KIND, Certificate};
use crate::config::OperatorConfig;
use crate::namespace::ConsumesNamespace;
use crate::runtime_component::{PullPolicy, RuntimeComponentSpec};
use k8s_openapi::api::core::v1::ResourceRequirements;
use crate::service::{RuntimeComponentService, ServiceBindingCategory, ServiceType};
use tracing::debug;

/// Service port used when none is given
pub const DEFAULT_SERVICE_PORT: i32 = 8080;

/// Protocol of a provides binding when none is given
pub const DEFAULT_PROVIDES_PROTOCOL: &str = "http";

impl RuntimeComponentSpec {
    /// Fills unset fields with their defaults.
    ///
    /// `owner_namespace` is the namespace of the RuntimeComponent itself;
    /// consumes entries without a namespace inherit it.
    pub fn normalize(&mut self, owner_namespace: &str, config: &OperatorConfig) {
        if self.pull_policy.is_none() {
            self.pull_policy = Some(PullPolicy::IfNotPresent);
        }

        if self.resource_constraints.is_none() {
            self.resource_constraints = Some(ResourceRequirements::default());
        }

        self.service
            .get_or_insert_with(RuntimeComponentService::default)
            .normalize(owner_namespace, config);

        if let Some(certificate) = self.route.as_mut().and_then(|r| r.certificate.as_mut()) {
            certificate.normalize(config);
        }
    }
}

impl RuntimeComponentService {
    /// Fills unset service fields with their defaults.
    pub fn normalize(&mut self, owner_namespace: &str, config: &OperatorConfig) {
        if self.type_.is_none() {
            self.type_ = Some(ServiceType::ClusterIP);
        }

        if matches!(self.port, None | Some(0)) {
            self.port = Some(DEFAULT_SERVICE_PORT);
        }

        if let Some(provides) = self.provides.as_mut() {
            if provides.protocol.as_deref().is_none_or(str::is_empty) {
                provides.protocol = Some(DEFAULT_PROVIDES_PROTOCOL.to_string());
            }
        }

        for consumes in &mut self.consumes {
            if consumes.category == ServiceBindingCategory::OpenAPI && consumes.namespace.is_unset() {
                debug!(
                    "Consumed service {} defaults to namespace {}",
                    consumes.name, owner_namespace
                );
                consumes.namespace = ConsumesNamespace::defaulted_from(owner_namespace);
            }
        }

        if let Some(certificate) = self.certificate.as_mut() {
            certificate.normalize(config);
        }
    }
}

impl Certificate {
    /// Fills the issuer reference from operator configuration.
    pub fn normalize(&mut self, config: &OperatorConfig) {
        if self.issuer_ref.name().is_none() {
            if let Some(issuer) = config.default_issuer() {
                self.issuer_ref.name = Some(issuer.to_string());
            }
        }

        if self.issuer_ref.kind().is_none() && config.use_cluster_issuer() {
            self.issuer_ref.kind = Some(CLUSTER_ISSUER_KIND.to_string());
        }
    }
}
