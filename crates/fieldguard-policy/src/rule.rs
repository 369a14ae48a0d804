//! Redaction rule and configuration definitions

use fieldguard_core::{Error, FieldName, RecordType, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::warn;

/// A single ordered redaction rule.
///
/// Rules are applied in declared order; later rules see text already
/// rewritten by earlier rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedactionRule {
    /// Rule identifier (used in logs)
    pub name: String,

    /// Regular expression matching sensitive substrings
    pub pattern: String,

    /// Literal substitution text (`$` is not expanded)
    pub replacement: String,

    /// Whether this rule is applied at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Scope restriction; a rule without a scope is global
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<RuleScope>,
}

impl RedactionRule {
    /// Create an enabled global rule
    pub fn global(
        name: impl Into<String>,
        pattern: impl Into<String>,
        replacement: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
            replacement: replacement.into(),
            enabled: true,
            scope: None,
        }
    }

    /// Restrict this rule to a scope
    pub fn with_scope(mut self, scope: RuleScope) -> Self {
        self.scope = Some(scope);
        self
    }

    /// Disable this rule
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Whether this rule applies in the given (record type, field) context.
    ///
    /// Global rules always apply. A scoped rule is skipped when a supplied
    /// context value is absent from the corresponding non-empty scope list;
    /// an empty list places no restriction on that axis.
    pub fn applies_to(&self, record_type: Option<&RecordType>, field: Option<&FieldName>) -> bool {
        self.scope
            .as_ref()
            .map_or(true, |scope| scope.matches(record_type, field))
    }
}

/// Scope restriction for a redaction rule.
///
/// A rule is either global (no `RuleScope` at all) or scoped; the two are
/// mutually exclusive by construction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleScope {
    /// Record types this rule is restricted to (empty = any)
    #[serde(default)]
    pub record_types: Vec<RecordType>,

    /// Field names this rule is restricted to (empty = any)
    #[serde(default)]
    pub fields: Vec<FieldName>,
}

impl RuleScope {
    /// Restrict to a set of record types
    pub fn record_types(types: impl IntoIterator<Item = impl Into<RecordType>>) -> Self {
        Self {
            record_types: types.into_iter().map(Into::into).collect(),
            fields: Vec::new(),
        }
    }

    /// Additionally restrict to a set of field names
    pub fn with_fields(mut self, fields: impl IntoIterator<Item = impl Into<FieldName>>) -> Self {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Whether this scope admits the given context. A supplied context
    /// value must appear in the corresponding non-empty list; an empty
    /// list places no restriction on that axis.
    pub fn matches(&self, record_type: Option<&RecordType>, field: Option<&FieldName>) -> bool {
        if let Some(rt) = record_type {
            if !self.record_types.is_empty() && !self.record_types.contains(rt) {
                return false;
            }
        }

        if let Some(f) = field {
            if !self.fields.is_empty() && !self.fields.contains(f) {
                return false;
            }
        }

        true
    }
}

fn default_true() -> bool {
    true
}

/// Complete masking configuration: the ordered rule list plus the flag
/// controlling the built-in PII detectors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaskingConfig {
    /// Run the built-in email/phone/card/SSN detectors after custom rules
    #[serde(default)]
    pub detect_builtin_pii: bool,

    /// Ordered redaction rules
    #[serde(default)]
    pub rules: Vec<RedactionRule>,
}

impl MaskingConfig {
    /// Load a configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| Error::config(format!("failed to parse masking config: {}", e)))
    }

    /// Load a configuration from a file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Load a configuration from a file, falling back to the empty
    /// configuration (no rules, detectors off) when the file is unreadable
    /// or malformed. The failure is logged, never raised.
    pub fn load_or_default(path: impl AsRef<std::path::Path>) -> Self {
        match Self::from_file(path.as_ref()) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    path = %path.as_ref().display(),
                    error = %e,
                    "failed to load masking config, continuing with empty rule set"
                );
                Self::default()
            }
        }
    }

    /// Validate every rule scope against a catalog of known record types
    /// and field names, turning scope typos into load-time errors.
    pub fn validate(&self, catalog: &ScopeCatalog) -> Result<()> {
        for rule in &self.rules {
            let Some(scope) = &rule.scope else { continue };

            for rt in &scope.record_types {
                if !catalog.record_types.contains(rt) {
                    return Err(Error::config(format!(
                        "rule '{}' is scoped to unknown record type '{}'",
                        rule.name, rt
                    )));
                }
            }

            for field in &scope.fields {
                if !catalog.fields.contains(field) {
                    return Err(Error::config(format!(
                        "rule '{}' is scoped to unknown field '{}'",
                        rule.name, field
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Catalog of known record types and field names for scope validation
#[derive(Debug, Clone, Default)]
pub struct ScopeCatalog {
    record_types: HashSet<RecordType>,
    fields: HashSet<FieldName>,
}

impl ScopeCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a record type and its declared fields
    pub fn with_record_type(
        mut self,
        record_type: impl Into<RecordType>,
        fields: impl IntoIterator<Item = impl Into<FieldName>>,
    ) -> Self {
        self.record_types.insert(record_type.into());
        self.fields.extend(fields.into_iter().map(Into::into));
        self
    }
}
