//! Core types for fieldguard

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Identifier for a record schema (e.g. "Invoice", "Customer").
///
/// Kept as an opaque newtype rather than a free-form string so that scope
/// lists and catalog validation operate on a distinct type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordType(String);

impl RecordType {
    /// Create a new record type identifier
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordType {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Identifier for a field declared on a record type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldName(String);

impl FieldName {
    /// Create a new field name identifier
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Kind of operation an actor performs against a record or field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessOp {
    #[default]
    Read,
    Write,
    Create,
    Delete,
}

impl AccessOp {
    /// The operation name as used in permission grants
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessOp::Read => "read",
            AccessOp::Write => "write",
            AccessOp::Create => "create",
            AccessOp::Delete => "delete",
        }
    }
}

impl fmt::Display for AccessOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared metadata for a single field
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldMeta {
    /// Field is hidden from all access
    #[serde(default)]
    pub hidden: bool,

    /// Field rejects write operations
    #[serde(default)]
    pub read_only: bool,

    /// Permission level; levels above zero require an explicit role grant
    #[serde(default)]
    pub permlevel: u32,
}

impl FieldMeta {
    /// Metadata for an ordinary level-zero field
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the field hidden
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Mark the field read-only
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Set the permission level
    pub fn permlevel(mut self, level: u32) -> Self {
        self.permlevel = level;
        self
    }
}

/// The actor on whose behalf a request executes.
///
/// Identity and roles are resolved by the host application per request;
/// fieldguard never consults global session state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    /// Resolved identity (user name, service account, ...)
    pub identity: String,

    /// Roles held by this actor
    pub roles: Vec<String>,
}

impl Actor {
    /// Create a new actor
    pub fn new(identity: impl Into<String>, roles: Vec<String>) -> Self {
        Self {
            identity: identity.into(),
            roles,
        }
    }

    /// Whether the actor holds the given role
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// A loaded record: an id plus its raw field values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    /// Record identifier within its record type
    pub id: String,

    /// Raw field values as stored
    pub values: BTreeMap<FieldName, serde_json::Value>,
}

impl Record {
    /// Create an empty record
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            values: BTreeMap::new(),
        }
    }

    /// Set a field value
    pub fn with_value(mut self, field: impl Into<FieldName>, value: serde_json::Value) -> Self {
        self.values.insert(field.into(), value);
        self
    }

    /// Get a field value, if present
    pub fn get(&self, field: &FieldName) -> Option<&serde_json::Value> {
        self.values.get(field)
    }
}

impl From<String> for RecordType {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<String> for FieldName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifiers_transparent_serde() {
        let rt = RecordType::new("Invoice");
        assert_eq!(serde_json::to_string(&rt).unwrap(), "\"Invoice\"");

        let back: RecordType = serde_json::from_str("\"Invoice\"").unwrap();
        assert_eq!(back, rt);
    }

    #[test]
    fn test_actor_roles() {
        let actor = Actor::new("jane", vec!["Accounts User".to_string()]);
        assert!(actor.has_role("Accounts User"));
        assert!(!actor.has_role("System Manager"));
    }

    #[test]
    fn test_record_values() {
        let record = Record::new("INV-0001")
            .with_value("total", serde_json::json!(125.5))
            .with_value("customer", serde_json::json!("Acme"));

        assert_eq!(
            record.get(&FieldName::new("customer")),
            Some(&serde_json::json!("Acme"))
        );
        assert!(record.get(&FieldName::new("missing")).is_none());
    }
}
