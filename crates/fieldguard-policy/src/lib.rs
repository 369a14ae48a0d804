//! Fieldguard Policy
//!
//! Rule-driven sensitive-data masking.
//!
//! Redaction rules are declared in YAML, applied in declared order, and
//! optionally scoped to record types and fields. Built-in detectors for
//! common PII shapes (email, phone, credit card, national id) run after
//! the custom rules when enabled in configuration.

pub mod detectors;
pub mod engine;
pub mod rule;

pub use detectors::BuiltinDetectors;
pub use engine::MaskingEngine;
pub use rule::{MaskingConfig, RedactionRule, RuleScope, ScopeCatalog};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::detectors::BuiltinDetectors;
    pub use crate::engine::MaskingEngine;
    pub use crate::rule::{MaskingConfig, RedactionRule, RuleScope, ScopeCatalog};
}
