//! Field permission gate
//!
//! Decides whether an actor may access a field for a given operation.
//! Every failure mode converts to a denial: the gate never panics and
//! never propagates provider errors.

use crate::provider::{FieldMetadataProvider, PermissionSource};
use fieldguard_core::{AccessOp, Actor, FieldName, RecordType, Result};
use std::sync::Arc;
use tracing::warn;

/// Role that bypasses field-level checks once baseline access holds
pub const DEFAULT_OVERRIDE_ROLE: &str = "System Manager";

/// Fail-closed field permission gate
#[derive(Clone)]
pub struct AccessGate {
    meta: Arc<dyn FieldMetadataProvider>,
    perms: Arc<dyn PermissionSource>,
    override_role: String,
}

impl AccessGate {
    /// Create a gate over the given providers
    pub fn new(meta: Arc<dyn FieldMetadataProvider>, perms: Arc<dyn PermissionSource>) -> Self {
        Self {
            meta,
            perms,
            override_role: DEFAULT_OVERRIDE_ROLE.to_string(),
        }
    }

    /// Use a different administrative override role
    pub fn with_override_role(mut self, role: impl Into<String>) -> Self {
        self.override_role = role.into();
        self
    }

    /// The underlying metadata provider
    pub fn metadata_provider(&self) -> &Arc<dyn FieldMetadataProvider> {
        &self.meta
    }

    /// The underlying permission source
    pub fn permission_source(&self) -> &Arc<dyn PermissionSource> {
        &self.perms
    }

    /// Whether `actor` may perform `op` on the field.
    ///
    /// Evaluation order:
    /// 1. baseline access to the record type, else deny;
    /// 2. the override role, which grants everything;
    /// 3. field metadata: unknown and hidden fields deny, read-only fields
    ///    deny non-read operations;
    /// 4. a permission level above zero requires an explicit role grant
    ///    for that level and operation.
    ///
    /// Provider errors are logged and converted to a denial.
    pub fn can_access(
        &self,
        actor: &Actor,
        record_type: &RecordType,
        field: &FieldName,
        op: AccessOp,
    ) -> bool {
        match self.evaluate(actor, record_type, field, op) {
            Ok(allowed) => allowed,
            Err(e) => {
                warn!(
                    actor = %actor.identity,
                    record_type = %record_type,
                    field = %field,
                    op = %op,
                    error = %e,
                    "field permission evaluation failed, denying access"
                );
                false
            }
        }
    }

    fn evaluate(
        &self,
        actor: &Actor,
        record_type: &RecordType,
        field: &FieldName,
        op: AccessOp,
    ) -> Result<bool> {
        if !self.perms.has_baseline(actor, record_type, op)? {
            return Ok(false);
        }

        if actor.has_role(&self.override_role) {
            return Ok(true);
        }

        let Some(meta) = self.meta.field_meta(record_type, field)? else {
            return Ok(false);
        };

        if meta.hidden {
            return Ok(false);
        }

        if op != AccessOp::Read && meta.read_only {
            return Ok(false);
        }

        if meta.permlevel > 0 {
            for role in &actor.roles {
                if self
                    .perms
                    .role_has_level_grant(role, record_type, meta.permlevel, op)?
                {
                    return Ok(true);
                }
            }
            return Ok(false);
        }

        Ok(true)
    }
}
