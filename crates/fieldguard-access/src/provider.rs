//! Provider traits over the host record store
//!
//! The gate and reader never touch a concrete schema representation;
//! hosts implement these capability traits over whatever store they use.
//! `MemoryStore` is a complete in-memory implementation for tests and
//! small embedders.

use fieldguard_core::{AccessOp, Actor, Error, FieldMeta, FieldName, Record, RecordType, Result};
use std::collections::{HashMap, HashSet};

/// Field metadata introspection for a record type
pub trait FieldMetadataProvider: Send + Sync {
    /// Declared metadata for a field, or `None` when the field is unknown
    fn field_meta(&self, record_type: &RecordType, field: &FieldName)
        -> Result<Option<FieldMeta>>;

    /// Every field declared on the record type, in declaration order
    fn declared_fields(&self, record_type: &RecordType) -> Result<Vec<FieldName>>;
}

/// Baseline and per-level permission checks
pub trait PermissionSource: Send + Sync {
    /// Whether the actor has baseline access to the record type for the
    /// operation
    fn has_baseline(&self, actor: &Actor, record_type: &RecordType, op: AccessOp) -> Result<bool>;

    /// Whether a role carries an explicit grant for the given permission
    /// level and operation on the record type
    fn role_has_level_grant(
        &self,
        role: &str,
        record_type: &RecordType,
        permlevel: u32,
        op: AccessOp,
    ) -> Result<bool>;
}

/// Record loading by id
pub trait RecordSource: Send + Sync {
    /// Load a record, erroring when it does not exist
    fn load(&self, record_type: &RecordType, id: &str) -> Result<Record>;
}

/// In-memory record store implementing all three provider traits.
///
/// Populated builder-style; baseline access and level grants are keyed by
/// role, so an actor passes a check when any of its roles carries the
/// grant.
#[derive(Debug, Default)]
pub struct MemoryStore {
    schemas: HashMap<RecordType, Vec<(FieldName, FieldMeta)>>,
    records: HashMap<(RecordType, String), Record>,
    baseline: HashSet<(String, RecordType, AccessOp)>,
    level_grants: HashSet<(String, RecordType, u32, AccessOp)>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a record type and its fields
    pub fn with_schema<N, I>(mut self, record_type: impl Into<RecordType>, fields: I) -> Self
    where
        N: Into<FieldName>,
        I: IntoIterator<Item = (N, FieldMeta)>,
    {
        self.schemas.insert(
            record_type.into(),
            fields
                .into_iter()
                .map(|(name, meta)| (name.into(), meta))
                .collect(),
        );
        self
    }

    /// Insert a record
    pub fn with_record(mut self, record_type: impl Into<RecordType>, record: Record) -> Self {
        self.records
            .insert((record_type.into(), record.id.clone()), record);
        self
    }

    /// Grant a role baseline access to a record type for the given operations
    pub fn grant_baseline(
        mut self,
        role: impl Into<String>,
        record_type: impl Into<RecordType>,
        ops: impl IntoIterator<Item = AccessOp>,
    ) -> Self {
        let role = role.into();
        let record_type = record_type.into();
        for op in ops {
            self.baseline.insert((role.clone(), record_type.clone(), op));
        }
        self
    }

    /// Grant a role access at a specific permission level
    pub fn grant_level(
        mut self,
        role: impl Into<String>,
        record_type: impl Into<RecordType>,
        permlevel: u32,
        ops: impl IntoIterator<Item = AccessOp>,
    ) -> Self {
        let role = role.into();
        let record_type = record_type.into();
        for op in ops {
            self.level_grants
                .insert((role.clone(), record_type.clone(), permlevel, op));
        }
        self
    }
}

impl FieldMetadataProvider for MemoryStore {
    fn field_meta(
        &self,
        record_type: &RecordType,
        field: &FieldName,
    ) -> Result<Option<FieldMeta>> {
        let fields = self
            .schemas
            .get(record_type)
            .ok_or_else(|| Error::access(format!("unknown record type '{}'", record_type)))?;

        Ok(fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, meta)| meta.clone()))
    }

    fn declared_fields(&self, record_type: &RecordType) -> Result<Vec<FieldName>> {
        let fields = self
            .schemas
            .get(record_type)
            .ok_or_else(|| Error::access(format!("unknown record type '{}'", record_type)))?;

        Ok(fields.iter().map(|(name, _)| name.clone()).collect())
    }
}

impl PermissionSource for MemoryStore {
    fn has_baseline(&self, actor: &Actor, record_type: &RecordType, op: AccessOp) -> Result<bool> {
        Ok(actor
            .roles
            .iter()
            .any(|role| self.baseline.contains(&(role.clone(), record_type.clone(), op))))
    }

    fn role_has_level_grant(
        &self,
        role: &str,
        record_type: &RecordType,
        permlevel: u32,
        op: AccessOp,
    ) -> Result<bool> {
        Ok(self
            .level_grants
            .contains(&(role.to_string(), record_type.clone(), permlevel, op)))
    }
}

impl RecordSource for MemoryStore {
    fn load(&self, record_type: &RecordType, id: &str) -> Result<Record> {
        self.records
            .get(&(record_type.clone(), id.to_string()))
            .cloned()
            .ok_or_else(|| Error::record(format!("record {}/{} not found", record_type, id)))
    }
}
