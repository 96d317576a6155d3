//! Certificate settings
//!
//! A cert-manager `Certificate` requested for the component's Service or
//! Route. Only the issuer reference takes part in defaulting.

use crate::references::IssuerReference;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Issuer kind used when certificates default to a cluster-wide issuer
pub const CLUSTER_ISSUER_KIND: &str = "ClusterIssuer";

/// Certificate request for a Service or Route
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    /// Issuer that signs the certificate
    #[serde(default)]
    pub issuer_ref: IssuerReference,

    /// Name of the Secret the certificate is stored in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_name: Option<String>,

    /// Requested certificate lifetime (e.g. "2160h")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,

    /// How long before expiry the certificate is renewed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub renew_before: Option<String>,

    /// Organizations placed in the certificate subject
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub organization: Vec<String>,
}

impl Certificate {
    /// Certificate signed by `issuer_ref`
    pub fn issued_by(issuer_ref: IssuerReference) -> Self {
        Self {
            issuer_ref,
            ..Default::default()
        }
    }
}
