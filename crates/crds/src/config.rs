//! Operator configuration
//!
//! Key/value settings that influence spec defaulting. The controller loads
//! them from a ConfigMap and passes the resulting [`OperatorConfig`] into
//! every normalization call.

use k8s_openapi::api::core::v1::ConfigMap;
use std::collections::BTreeMap;

/// Key holding the issuer name used when a certificate names none
pub const DEFAULT_ISSUER_KEY: &str = "defaultIssuer";

/// Key controlling whether certificates default to a `ClusterIssuer`
pub const USE_CLUSTER_ISSUER_KEY: &str = "useClusterIssuer";

const DEFAULT_ISSUER_VALUE: &str = "self-signed";
const USE_CLUSTER_ISSUER_VALUE: &str = "true";

/// Read-only operator settings consulted by the defaulting pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorConfig {
    values: BTreeMap<String, String>,
}

impl Default for OperatorConfig {
    fn default() -> Self {
        Self::empty()
            .with(DEFAULT_ISSUER_KEY, DEFAULT_ISSUER_VALUE)
            .with(USE_CLUSTER_ISSUER_KEY, USE_CLUSTER_ISSUER_VALUE)
    }
}

impl OperatorConfig {
    /// Configuration with no keys at all (no built-in defaults)
    pub fn empty() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Built-in defaults overlaid with `data`
    pub fn from_data(data: BTreeMap<String, String>) -> Self {
        let mut config = Self::default();
        config.values.extend(data);
        config
    }

    /// Built-in defaults overlaid with a ConfigMap's `data` section
    pub fn from_config_map(config_map: &ConfigMap) -> Self {
        Self::from_data(config_map.data.clone().unwrap_or_default())
    }

    /// Returns a copy with `key` set to `value`
    #[must_use]
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }

    /// Raw value for `key`
    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Issuer name for certificates that don't name one
    pub fn default_issuer(&self) -> Option<&str> {
        self.lookup(DEFAULT_ISSUER_KEY)
    }

    /// Only the literal "false" turns the ClusterIssuer default off.
    pub fn use_cluster_issuer(&self) -> bool {
        self.lookup(USE_CLUSTER_ISSUER_KEY) != Some("false")
    }
}
