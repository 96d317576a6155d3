//! Object references used by RuntimeComponent
//!
//! Provides the cert-manager style issuer reference used by certificates and
//! the secret key selector used by service binding credentials.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// API group of cert-manager issuers
pub const CERT_MANAGER_GROUP: &str = "cert-manager.io";

/// Reference to a cert-manager `Issuer` or `ClusterIssuer`
///
/// Follows the cert-manager `ObjectReference` shape: `name`, `kind` and an
/// optional `group`. Every field is optional in the stored resource; the
/// defaulting pass fills `name` and `kind` from operator configuration.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct IssuerReference {
    /// Name of the issuer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Kind of the issuer ("Issuer" or "ClusterIssuer")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// API group of the issuer (defaults to cert-manager.io on the cert-manager side)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl IssuerReference {
    /// Create a reference with name only (kind left to defaulting)
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            kind: None,
            group: None,
        }
    }

    /// Create a reference with name and kind in the cert-manager group
    pub fn cert_manager(kind: &str, name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            kind: Some(kind.to_string()),
            group: Some(CERT_MANAGER_GROUP.to_string()),
        }
    }

    /// Issuer name, treating an empty string the same as unset
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }

    /// Issuer kind, treating an empty string the same as unset
    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref().filter(|k| !k.is_empty())
    }
}

/// Selects a key of a Secret in the resource's namespace
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SecretKeySelector {
    /// Name of the Secret
    #[serde(default)]
    pub name: String,

    /// Key within the Secret
    pub key: String,

    /// Whether the Secret or its key must be defined
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional: Option<bool>,
}

impl SecretKeySelector {
    /// Create a selector for `key` in secret `name`
    pub fn new(name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key: key.into(),
            optional: None,
        }
    }
}
