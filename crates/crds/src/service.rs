//! Service settings of a RuntimeComponent
//!
//! Covers the Kubernetes Service exposed for the component and the service
//! bindings it provides to, or consumes from, other components.

use crate::certificate::Certificate;
use crate::namespace::ConsumesNamespace;
use crate::references::SecretKeySelector;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Kubernetes Service type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
pub enum ServiceType {
    /// Cluster-local virtual IP
    #[default]
    ClusterIP,
    /// Exposed on every node's IP at a static port
    NodePort,
    /// Exposed through a cloud load balancer
    LoadBalancer,
    /// CNAME to an external name
    ExternalName,
}

/// Category of a service binding
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ServiceBindingCategory {
    /// OpenAPI endpoint
    #[serde(rename = "openapi")]
    OpenAPI,
}

impl ServiceBindingCategory {
    /// Wire name of the category
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAPI => "openapi",
        }
    }
}

/// Kubernetes Service configuration
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeComponentService {
    /// Service type (defaults to ClusterIP)
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<ServiceType>,

    /// Service port (defaults to 8080 when unset or zero)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 1, max = 65536))]
    pub port: Option<i32>,

    /// Annotations added to the Service
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,

    /// Services consumed by this component
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub consumes: Vec<ServiceBindingConsumes>,

    /// Binding provided by this component
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provides: Option<ServiceBindingProvides>,

    /// Certificate for the Service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate: Option<Certificate>,
}

/// Binding information this component provides to others
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceBindingProvides {
    /// Binding category
    pub category: ServiceBindingCategory,

    /// Context root of the provided endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    /// Protocol of the provided endpoint (defaults to "http")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,

    /// Credentials required by consumers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<ServiceBindingAuth>,
}

impl ServiceBindingProvides {
    /// Provides binding of `category` with nothing else set
    pub fn new(category: ServiceBindingCategory) -> Self {
        Self {
            category,
            context: None,
            protocol: None,
            auth: None,
        }
    }
}

/// Secrets holding the credentials of a provided binding
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ServiceBindingAuth {
    /// Secret key holding the username
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<SecretKeySelector>,

    /// Secret key holding the password
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<SecretKeySelector>,
}

/// A service consumed by this component
///
/// `name` must be unique among the consumes entries of a component. That is
/// checked by admission, not here.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceBindingConsumes {
    /// Name of the consumed service
    pub name: String,

    /// Namespace of the consumed service
    #[serde(default, skip_serializing_if = "ConsumesNamespace::is_unset")]
    #[schemars(with = "String")]
    pub namespace: ConsumesNamespace,

    /// Binding category
    pub category: ServiceBindingCategory,

    /// Where binding information is mounted in the container
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mount_path: Option<String>,
}

impl ServiceBindingConsumes {
    /// Consumes entry for `name` in `category`, namespace left unset
    pub fn new(name: impl Into<String>, category: ServiceBindingCategory) -> Self {
        Self {
            name: name.into(),
            namespace: ConsumesNamespace::Unset,
            category,
            mount_path: None,
        }
    }

    /// Sets an explicit namespace
    #[must_use]
    pub fn in_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = ConsumesNamespace::explicit(namespace);
        self
    }

    /// Effective namespace of the consumed service
    pub fn namespace(&self) -> &str {
        self.namespace.namespace()
    }

    /// Whether the user named the namespace
    pub fn is_namespace_provided(&self) -> bool {
        self.namespace.is_namespace_provided()
    }
}
