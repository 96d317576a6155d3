//! Namespace of a consumed service
//!
//! A consumes entry either names the namespace of the service it consumes, or
//! leaves it out and inherits the namespace of the RuntimeComponent that owns
//! it. The two cases are kept apart in memory by [`ConsumesNamespace`].
//!
//! Stored resources carry a single string. An inherited namespace is written
//! with one trailing `_` so readers can tell it was not supplied by the user:
//!
//! | in memory             | stored   |
//! |-----------------------|----------|
//! | `Unset`               | omitted  |
//! | `Explicit("ns2")`     | `"ns2"`  |
//! | `Defaulted("ns1")`    | `"ns1_"` |
//! | `Defaulted("")`       | `"_"`    |

use serde::{Deserialize, Serialize};
use std::fmt;

/// Marks a namespace that was filled in from the owner's namespace
pub const DEFAULTED_NAMESPACE_SUFFIX: char = '_';

/// Namespace of a consumed service
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConsumesNamespace {
    /// Not supplied and not yet defaulted
    #[default]
    Unset,

    /// Supplied by the user
    Explicit(String),

    /// Filled in from the owning resource's namespace
    Defaulted(String),
}

impl ConsumesNamespace {
    /// Namespace supplied by the user
    pub fn explicit(namespace: impl Into<String>) -> Self {
        Self::from(namespace.into())
    }

    /// Namespace inherited from the owning resource
    pub fn defaulted_from(owner_namespace: impl Into<String>) -> Self {
        Self::Defaulted(owner_namespace.into())
    }

    /// True when no namespace has been supplied or defaulted yet
    pub fn is_unset(&self) -> bool {
        match self {
            Self::Unset => true,
            Self::Explicit(namespace) => namespace.is_empty(),
            Self::Defaulted(_) => false,
        }
    }

    /// True only when the user named the namespace.
    ///
    /// An unset namespace counts as not provided.
    pub fn is_namespace_provided(&self) -> bool {
        matches!(self, Self::Explicit(namespace) if !namespace.is_empty())
    }

    /// Effective namespace of the consumed service (empty when unset)
    pub fn namespace(&self) -> &str {
        match self {
            Self::Unset => "",
            Self::Explicit(namespace) | Self::Defaulted(namespace) => namespace,
        }
    }

    /// Stored string form
    pub fn stored(&self) -> String {
        match self {
            Self::Unset => String::new(),
            Self::Explicit(namespace) => namespace.clone(),
            Self::Defaulted(namespace) => format!("{namespace}{DEFAULTED_NAMESPACE_SUFFIX}"),
        }
    }
}

impl From<String> for ConsumesNamespace {
    fn from(stored: String) -> Self {
        if stored.is_empty() {
            return Self::Unset;
        }
        match stored.strip_suffix(DEFAULTED_NAMESPACE_SUFFIX) {
            Some(owner) => Self::Defaulted(owner.to_string()),
            None => Self::Explicit(stored),
        }
    }
}

impl From<&str> for ConsumesNamespace {
    fn from(stored: &str) -> Self {
        Self::from(stored.to_string())
    }
}

impl From<ConsumesNamespace> for String {
    fn from(namespace: ConsumesNamespace) -> Self {
        namespace.stored()
    }
}

impl fmt::Display for ConsumesNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.namespace())
    }
}
