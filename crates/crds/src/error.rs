//! CRD errors

use thiserror::Error;

/// Errors raised when converting external string tags into CRD types
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CrdError {
    /// Condition type tag outside the declared set
    #[error("Unknown status condition type: {0}")]
    UnknownConditionType(String),

    /// Condition status outside True/False/Unknown
    #[error("Unknown condition status: {0}")]
    UnknownConditionStatus(String),
}
