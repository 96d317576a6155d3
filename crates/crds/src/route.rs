//! Route settings of a RuntimeComponent

use crate::certificate::Certificate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Where TLS is terminated for a Route
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TlsTermination {
    /// Terminated at the router
    Edge,
    /// Terminated at the router and re-encrypted to the pod
    Reencrypt,
    /// Passed through to the pod
    Passthrough,
}

/// Handling of plain HTTP requests on an edge-terminated Route
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub enum InsecureEdgeTerminationPolicy {
    /// Serve plain HTTP
    Allow,
    /// Refuse plain HTTP
    Disable,
    /// Redirect plain HTTP to HTTPS
    Redirect,
}

/// External Route configuration
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeComponentRoute {
    /// Annotations added to the Route
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,

    /// TLS termination
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub termination: Option<TlsTermination>,

    /// Plain HTTP policy for edge termination
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insecure_edge_termination_policy: Option<InsecureEdgeTerminationPolicy>,

    /// Certificate for the Route
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate: Option<Certificate>,

    /// Host name of the Route
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// Path of the Route
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}
