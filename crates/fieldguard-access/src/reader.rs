//! Safe record reader
//!
//! Loads a record and returns only the fields the actor may read, each
//! value stringified and run through the masking engine scoped to its
//! (record type, field) context. Denied fields are omitted outright so a
//! caller cannot infer their existence from the result shape.

use crate::gate::AccessGate;
use crate::provider::RecordSource;
use fieldguard_core::{AccessOp, Actor, FieldName, RecordType, Result};
use fieldguard_policy::MaskingEngine;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::warn;

/// Result of a safe read: masked field data on success, an error message
/// otherwise. Never partial data.
#[derive(Debug, Clone, Serialize)]
pub struct ReadResult {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<BTreeMap<FieldName, String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ReadResult {
    fn ok(data: BTreeMap<FieldName, String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }

    /// The masked field mapping, when the read succeeded
    pub fn data(&self) -> Option<&BTreeMap<FieldName, String>> {
        self.data.as_ref()
    }
}

/// Permission-checked, masked record reader
#[derive(Clone)]
pub struct SafeReader {
    gate: AccessGate,
    records: Arc<dyn RecordSource>,
    engine: Arc<MaskingEngine>,
}

impl SafeReader {
    /// Create a reader over a gate, a record source, and a masking engine
    pub fn new(gate: AccessGate, records: Arc<dyn RecordSource>, engine: Arc<MaskingEngine>) -> Self {
        Self {
            gate,
            records,
            engine,
        }
    }

    /// Read a record safely.
    ///
    /// The field list is the caller's request, or every declared field when
    /// no list is given. Fields the gate denies are silently omitted; null
    /// and absent values are omitted as well. Any failure returns an error
    /// result with no data.
    pub fn read_safe(
        &self,
        actor: &Actor,
        record_type: &RecordType,
        record_id: &str,
        fields: Option<&[FieldName]>,
    ) -> ReadResult {
        match self.baseline_read(actor, record_type) {
            Ok(true) => {}
            Ok(false) => return ReadResult::failed("Permission denied"),
            Err(e) => {
                warn!(record_type = %record_type, error = %e, "baseline read check failed");
                return ReadResult::failed(e.to_string());
            }
        }

        match self.collect_fields(actor, record_type, record_id, fields) {
            Ok(data) => ReadResult::ok(data),
            Err(e) => {
                warn!(
                    record_type = %record_type,
                    record_id = %record_id,
                    error = %e,
                    "safe read failed"
                );
                ReadResult::failed(e.to_string())
            }
        }
    }

    fn baseline_read(&self, actor: &Actor, record_type: &RecordType) -> Result<bool> {
        self.gate
            .permission_source()
            .has_baseline(actor, record_type, AccessOp::Read)
    }

    fn collect_fields(
        &self,
        actor: &Actor,
        record_type: &RecordType,
        record_id: &str,
        fields: Option<&[FieldName]>,
    ) -> Result<BTreeMap<FieldName, String>> {
        let record = self.records.load(record_type, record_id)?;

        let field_list: Vec<FieldName> = match fields {
            Some(requested) => requested.to_vec(),
            None => self.gate.metadata_provider().declared_fields(record_type)?,
        };

        let mut data = BTreeMap::new();

        for field in field_list {
            if !self.gate.can_access(actor, record_type, &field, AccessOp::Read) {
                continue;
            }

            let Some(value) = record.get(&field) else {
                continue;
            };

            let Some(raw) = stringify(value) else {
                continue;
            };

            let masked = self.engine.mask(&raw, Some(record_type), Some(&field));
            data.insert(field, masked);
        }

        Ok(data)
    }
}

/// Render a raw value as text for masking; `None` for null values
fn stringify(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
