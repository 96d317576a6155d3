//! Controller configuration.
//!
//! Process settings come from environment variables; the operator settings
//! used during spec defaulting come from a ConfigMap.

use crate::error::ControllerError;
use crds::OperatorConfig;
use k8s_openapi::api::core::v1::ConfigMap;
use kube::{Api, Client};
use tracing::{info, warn};

/// Default name of the operator ConfigMap
pub const DEFAULT_CONFIG_MAP_NAME: &str = "runtime-component-operator";

/// Process settings read at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Namespace to watch (`None` watches all namespaces)
    pub watch_namespace: Option<String>,
    /// Namespace holding the operator ConfigMap
    pub operator_namespace: String,
    /// Name of the operator ConfigMap
    pub config_map_name: String,
}

impl Settings {
    /// Reads settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`.
    ///
    /// - `WATCH_NAMESPACE`: namespace to watch, empty or unset for all
    /// - `OPERATOR_NAMESPACE`: defaults to the watch namespace, else "default"
    /// - `OPERATOR_CONFIGMAP`: defaults to "runtime-component-operator"
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let watch_namespace = non_empty("WATCH_NAMESPACE");
        let operator_namespace = non_empty("OPERATOR_NAMESPACE")
            .or_else(|| watch_namespace.clone())
            .unwrap_or_else(|| "default".to_string());
        let config_map_name = non_empty("OPERATOR_CONFIGMAP")
            .unwrap_or_else(|| DEFAULT_CONFIG_MAP_NAME.to_string());

        Self {
            watch_namespace,
            operator_namespace,
            config_map_name,
        }
    }
}

/// Loads the operator ConfigMap, falling back to built-in defaults when it
/// does not exist.
pub async fn load_operator_config(
    client: Client,
    settings: &Settings,
) -> Result<OperatorConfig, ControllerError> {
    let api: Api<ConfigMap> = Api::namespaced(client, &settings.operator_namespace);

    match api.get_opt(&settings.config_map_name).await? {
        Some(config_map) => {
            info!(
                "Loaded operator configuration from ConfigMap {}/{}",
                settings.operator_namespace, settings.config_map_name
            );
            Ok(OperatorConfig::from_config_map(&config_map))
        }
        None => {
            warn!(
                "ConfigMap {}/{} not found, using default operator configuration",
                settings.operator_namespace, settings.config_map_name
            );
            Ok(OperatorConfig::default())
        }
    }
}
