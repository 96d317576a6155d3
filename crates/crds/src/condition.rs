//! Status conditions
//!
//! Ordered ledger of conditions kept on [`RuntimeComponentStatus`]. There is
//! at most one condition per type. New types are appended; known types are
//! updated in place so the ledger never reorders.

use crate::error::CrdError;
use crate::runtime_component::RuntimeComponentStatus;
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Aspect of the resource a condition reports on
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
pub enum StatusConditionType {
    /// Outcome of the last reconciliation pass
    Reconciled,
    /// Whether consumed services are available
    DependenciesSatisfied,
}

impl StatusConditionType {
    /// Every declared condition type
    pub const ALL: [Self; 2] = [Self::Reconciled, Self::DependenciesSatisfied];

    /// Tag used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reconciled => "Reconciled",
            Self::DependenciesSatisfied => "DependenciesSatisfied",
        }
    }
}

impl fmt::Display for StatusConditionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusConditionType {
    type Err = CrdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| CrdError::UnknownConditionType(s.to_string()))
    }
}

impl TryFrom<&str> for StatusConditionType {
    type Error = CrdError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Tri-state condition status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
pub enum ConditionStatus {
    /// Condition holds
    True,
    /// Condition does not hold
    False,
    /// Not determined yet
    #[default]
    Unknown,
}

impl ConditionStatus {
    /// Tag used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::True => "True",
            Self::False => "False",
            Self::Unknown => "Unknown",
        }
    }
}

impl From<bool> for ConditionStatus {
    fn from(value: bool) -> Self {
        if value { Self::True } else { Self::False }
    }
}

impl fmt::Display for ConditionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConditionStatus {
    type Err = CrdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "True" => Ok(Self::True),
            "False" => Ok(Self::False),
            "Unknown" => Ok(Self::Unknown),
            other => Err(CrdError::UnknownConditionStatus(other.to_string())),
        }
    }
}

/// A timestamped assertion about the resource
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StatusCondition {
    /// Condition type
    #[serde(rename = "type")]
    pub type_: StatusConditionType,

    /// Condition status (`Unknown` when absent)
    #[serde(default)]
    pub status: ConditionStatus,

    /// Short machine-readable reason
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reason: String,

    /// Human-readable message
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,

    /// Time of the last write to this condition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update_time: Option<DateTime<Utc>>,

    /// Time the status last changed value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<DateTime<Utc>>,
}

impl StatusCondition {
    /// Condition of `type_` with `status`, no reason or message
    pub fn new(type_: StatusConditionType, status: ConditionStatus) -> Self {
        Self {
            type_,
            status,
            reason: String::new(),
            message: String::new(),
            last_update_time: None,
            last_transition_time: None,
        }
    }

    /// Sets the reason
    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    /// Sets the message
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

impl RuntimeComponentStatus {
    /// Conditions in ledger order
    pub fn conditions(&self) -> &[StatusCondition] {
        &self.conditions
    }

    /// Condition of `type_`, if one has been recorded
    pub fn get_condition(&self, type_: StatusConditionType) -> Option<&StatusCondition> {
        self.conditions.iter().find(|c| c.type_ == type_)
    }

    /// Upserts `condition` using the current time.
    ///
    /// See [`Self::set_condition_at`].
    pub fn set_condition(&mut self, condition: StatusCondition) {
        self.set_condition_at(condition, Utc::now());
    }

    /// Upserts `condition`, stamping it with `now`.
    ///
    /// An existing condition of the same type keeps its position; its
    /// `last_transition_time` moves to `now` only if the status changes. A new
    /// type is appended with `last_transition_time` left unset. Timestamps
    /// carried by `condition` itself are ignored.
    pub fn set_condition_at(&mut self, condition: StatusCondition, now: DateTime<Utc>) {
        match self.conditions.iter_mut().find(|c| c.type_ == condition.type_) {
            Some(existing) => {
                if existing.status != condition.status {
                    debug!(
                        "Condition {} transitioned {} -> {}",
                        condition.type_, existing.status, condition.status
                    );
                    existing.last_transition_time = Some(now);
                }
                existing.last_update_time = Some(now);
                existing.reason = condition.reason;
                existing.message = condition.message;
                existing.status = condition.status;
            }
            None => {
                debug!("Condition {} recorded as {}", condition.type_, condition.status);
                self.conditions.push(StatusCondition {
                    last_update_time: Some(now),
                    last_transition_time: None,
                    ..condition
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).single().expect("Valid timestamp")
    }

    #[test]
    fn test_new_condition_is_appended_without_transition_time() {
        let mut status = RuntimeComponentStatus::default();
        status.set_condition_at(
            StatusCondition::new(StatusConditionType::Reconciled, ConditionStatus::True),
            t0(),
        );

        assert_eq!(status.conditions().len(), 1);
        let condition = status
            .get_condition(StatusConditionType::Reconciled)
            .expect("Reconciled condition should exist");
        assert_eq!(condition.status, ConditionStatus::True);
        assert_eq!(condition.last_update_time, Some(t0()));
        assert_eq!(condition.last_transition_time, None, "No prior status to transition from");
    }

    #[test]
    fn test_status_change_stamps_transition_time() {
        let mut status = RuntimeComponentStatus::default();
        status.set_condition_at(
            StatusCondition::new(StatusConditionType::Reconciled, ConditionStatus::True),
            t0(),
        );
        let later = t0() + Duration::seconds(30);
        status.set_condition_at(
            StatusCondition::new(StatusConditionType::Reconciled, ConditionStatus::False)
                .with_reason("Error")
                .with_message("image pull failed"),
            later,
        );

        let condition = status
            .get_condition(StatusConditionType::Reconciled)
            .expect("Reconciled condition should exist");
        assert_eq!(condition.status, ConditionStatus::False);
        assert_eq!(condition.reason, "Error");
        assert_eq!(condition.message, "image pull failed");
        assert_eq!(condition.last_update_time, Some(later));
        assert_eq!(condition.last_transition_time, Some(later));
        assert!(condition.last_transition_time > Some(t0()));
    }

    #[test]
    fn test_same_status_keeps_transition_time() {
        let mut status = RuntimeComponentStatus::default();
        status.set_condition_at(
            StatusCondition::new(StatusConditionType::Reconciled, ConditionStatus::True),
            t0(),
        );
        let flipped = t0() + Duration::seconds(10);
        status.set_condition_at(
            StatusCondition::new(StatusConditionType::Reconciled, ConditionStatus::False),
            flipped,
        );
        let later = t0() + Duration::seconds(20);
        status.set_condition_at(
            StatusCondition::new(StatusConditionType::Reconciled, ConditionStatus::False)
                .with_message("still failing"),
            later,
        );

        let condition = status
            .get_condition(StatusConditionType::Reconciled)
            .expect("Reconciled condition should exist");
        assert_eq!(condition.message, "still failing");
        assert_eq!(condition.last_update_time, Some(later));
        assert_eq!(condition.last_transition_time, Some(flipped), "Message change is not a transition");
    }

    #[test]
    fn test_update_preserves_ledger_order() {
        let mut status = RuntimeComponentStatus::default();
        status.set_condition_at(
            StatusCondition::new(StatusConditionType::Reconciled, ConditionStatus::True),
            t0(),
        );
        status.set_condition_at(
            StatusCondition::new(StatusConditionType::DependenciesSatisfied, ConditionStatus::Unknown),
            t0(),
        );
        status.set_condition_at(
            StatusCondition::new(StatusConditionType::Reconciled, ConditionStatus::False),
            t0() + Duration::seconds(1),
        );

        let types: Vec<_> = status.conditions().iter().map(|c| c.type_).collect();
        assert_eq!(
            types,
            vec![StatusConditionType::Reconciled, StatusConditionType::DependenciesSatisfied]
        );
    }

    #[test]
    fn test_get_condition_miss_returns_none() {
        let mut status = RuntimeComponentStatus::default();
        assert!(status.get_condition(StatusConditionType::Reconciled).is_none());

        status.set_condition_at(
            StatusCondition::new(StatusConditionType::Reconciled, ConditionStatus::True),
            t0(),
        );
        assert!(
            status.get_condition(StatusConditionType::DependenciesSatisfied).is_none(),
            "Lookup must not fabricate a zero-valued condition"
        );
    }

    #[test]
    fn test_incoming_timestamps_are_ignored() {
        let mut status = RuntimeComponentStatus::default();
        let mut condition =
            StatusCondition::new(StatusConditionType::Reconciled, ConditionStatus::True);
        condition.last_transition_time = Some(t0() - Duration::days(1));
        condition.last_update_time = Some(t0() - Duration::days(1));
        status.set_condition_at(condition, t0());

        let recorded = &status.conditions()[0];
        assert_eq!(recorded.last_update_time, Some(t0()));
        assert_eq!(recorded.last_transition_time, None);
    }

    #[test]
    fn test_set_condition_uses_wall_clock() {
        let before = Utc::now();
        let mut status = RuntimeComponentStatus::default();
        status.set_condition(StatusCondition::new(
            StatusConditionType::Reconciled,
            ConditionStatus::True,
        ));
        let stamped = status.conditions()[0]
            .last_update_time
            .expect("last_update_time should be set");
        assert!(stamped >= before);
    }

    #[test]
    fn test_condition_type_conversion_is_total() {
        for type_ in StatusConditionType::ALL {
            assert_eq!(type_.as_str().parse::<StatusConditionType>(), Ok(type_));
        }
    }

    #[test]
    fn test_unknown_condition_type_is_reported() {
        assert_eq!(
            StatusConditionType::try_from("Ready"),
            Err(CrdError::UnknownConditionType("Ready".to_string()))
        );

        let result: Result<StatusCondition, _> =
            serde_json::from_str(r#"{"type": "Ready", "status": "True"}"#);
        assert!(result.is_err(), "Undeclared condition types are rejected on deserialization");
    }

    #[test]
    fn test_condition_status_parsing() {
        assert_eq!("False".parse::<ConditionStatus>(), Ok(ConditionStatus::False));
        assert_eq!(ConditionStatus::from(true), ConditionStatus::True);
        assert_eq!(
            "maybe".parse::<ConditionStatus>(),
            Err(CrdError::UnknownConditionStatus("maybe".to_string()))
        );
    }

    #[test]
    fn test_condition_without_status_is_unknown() {
        let condition: StatusCondition = serde_json::from_str(r#"{"type": "DependenciesSatisfied"}"#)
            .expect("Status is optional on stored conditions");
        assert_eq!(condition.type_, StatusConditionType::DependenciesSatisfied);
        assert_eq!(condition.status, ConditionStatus::Unknown);

        let status: RuntimeComponentStatus = serde_json::from_value(serde_json::json!({
            "conditions": [{"type": "Reconciled", "reason": "Pending"}]
        }))
        .expect("A condition without status must not fail the whole status");
        let reconciled = status
            .get_condition(StatusConditionType::Reconciled)
            .expect("Reconciled condition should exist");
        assert_eq!(reconciled.status, ConditionStatus::Unknown);
        assert_eq!(reconciled.reason, "Pending");
    }

    #[test]
    fn test_condition_serializes_in_camel_case() {
        let mut status = RuntimeComponentStatus::default();
        status.set_condition_at(
            StatusCondition::new(StatusConditionType::Reconciled, ConditionStatus::True),
            t0(),
        );
        let value = serde_json::to_value(&status.conditions()[0])
            .expect("Failed to serialize condition");
        assert_eq!(
            value,
            serde_json::json!({
                "type": "Reconciled",
                "status": "True",
                "lastUpdateTime": "2024-05-01T12:00:00Z",
            })
        );
    }
}
