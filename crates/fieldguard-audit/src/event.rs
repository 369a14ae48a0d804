//! Audit event model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default source address when the caller's network origin is unknown
pub const UNKNOWN_SOURCE: &str = "127.0.0.1";

/// Outcome of the audited operation.
///
/// Stored as a plain string: `"Success"`, or the failure text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EventStatus {
    #[default]
    Success,
    Failure(String),
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventStatus::Success => f.write_str("Success"),
            EventStatus::Failure(reason) => f.write_str(reason),
        }
    }
}

impl Serialize for EventStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for EventStatus {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(if raw == "Success" {
            EventStatus::Success
        } else {
            EventStatus::Failure(raw)
        })
    }
}

/// A single append-only audit record.
///
/// Events are stamped at construction and never updated; the `details`
/// field carries a canonical JSON text payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Unique event id
    pub id: String,

    /// Time the event was built
    pub timestamp: DateTime<Utc>,

    /// Resolved actor identity
    pub actor: String,

    /// Category label, e.g. "Function Call" or "Permission Check"
    pub action_type: String,

    /// Serialized details payload
    pub details: String,

    /// Outcome, defaults to success
    #[serde(default)]
    pub status: EventStatus,

    /// Caller's network origin
    pub source_address: String,
}

impl AuditEvent {
    /// Create a new event with the given action type
    pub fn new(action_type: impl Into<String>) -> Self {
        Self {
            id: generate_event_id(),
            timestamp: Utc::now(),
            actor: String::new(),
            action_type: action_type.into(),
            details: String::new(),
            status: EventStatus::Success,
            source_address: UNKNOWN_SOURCE.to_string(),
        }
    }

    /// Set the actor identity
    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = actor.into();
        self
    }

    /// Serialize and attach a details payload
    pub fn with_details(mut self, details: impl Serialize) -> Self {
        self.details = serde_json::to_string(&details).unwrap_or_default();
        self
    }

    /// Set the outcome
    pub fn with_status(mut self, status: EventStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the caller's network origin
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source_address = source.into();
        self
    }

    /// Build the canonical details payload for an audited function call:
    /// the calling function's name plus its free-form details, tagged with
    /// the fixed `"Function Call"` event type.
    pub fn function_call(
        function: impl Into<String>,
        details: impl Serialize,
    ) -> serde_json::Value {
        serde_json::json!({
            "function": function.into(),
            "event_type": "Function Call",
            "details": serde_json::to_value(details).unwrap_or(serde_json::Value::Null),
        })
    }
}

/// Generate a unique event id
fn generate_event_id() -> String {
    format!("evt_{}", uuid::Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_defaults() {
        let event = AuditEvent::new("Permission Check");
        assert_eq!(event.action_type, "Permission Check");
        assert_eq!(event.status, EventStatus::Success);
        assert_eq!(event.source_address, UNKNOWN_SOURCE);
        assert!(event.id.starts_with("evt_"));
    }

    #[test]
    fn test_function_call_payload() {
        let payload = AuditEvent::function_call(
            "mask_sensitive_data",
            serde_json::json!({"rules_applied": 3}),
        );

        assert_eq!(payload["event_type"], "Function Call");
        assert_eq!(payload["function"], "mask_sensitive_data");
        assert_eq!(payload["details"]["rules_applied"], 3);
    }

    #[test]
    fn test_status_serialization() {
        let ok = serde_json::to_string(&EventStatus::Success).unwrap();
        assert_eq!(ok, "\"Success\"");

        let failed =
            serde_json::to_string(&EventStatus::Failure("store unavailable".to_string())).unwrap();
        assert_eq!(failed, "\"store unavailable\"");
    }
}
