//! Masking engine
//!
//! Applies the configured redaction rules in declared order, then the
//! built-in PII detectors when enabled. The engine is immutable once
//! constructed; configuration changes are observed by building a new
//! engine, never by mutating a live one.

use crate::detectors::BuiltinDetectors;
use crate::rule::{MaskingConfig, RuleScope};
use fieldguard_core::{FieldName, RecordType, Result};
use regex::{NoExpand, Regex};
use tracing::{debug, trace, warn};

/// A rule whose pattern compiled successfully
struct CompiledRule {
    name: String,
    pattern: Regex,
    replacement: String,
    scope: Option<RuleScope>,
}

impl CompiledRule {
    fn applies_to(&self, record_type: Option<&RecordType>, field: Option<&FieldName>) -> bool {
        self.scope
            .as_ref()
            .map_or(true, |scope| scope.matches(record_type, field))
    }
}

/// Rule-driven text redaction engine.
///
/// Construction compiles every enabled rule; a rule whose pattern fails to
/// compile is logged and dropped so one malformed rule never disables the
/// rest of the set.
pub struct MaskingEngine {
    rules: Vec<CompiledRule>,
    detectors: Option<BuiltinDetectors>,
}

impl MaskingEngine {
    /// Build an engine from a configuration snapshot.
    ///
    /// Rule order in the configuration is application order.
    pub fn new(config: &MaskingConfig) -> Result<Self> {
        let mut rules = Vec::with_capacity(config.rules.len());

        for rule in config.rules.iter().filter(|r| r.enabled) {
            match Regex::new(&rule.pattern) {
                Ok(pattern) => rules.push(CompiledRule {
                    name: rule.name.clone(),
                    pattern,
                    replacement: rule.replacement.clone(),
                    scope: rule.scope.clone(),
                }),
                Err(e) => {
                    warn!(rule = %rule.name, error = %e, "skipping rule with malformed pattern");
                }
            }
        }

        let detectors = if config.detect_builtin_pii {
            Some(BuiltinDetectors::new()?)
        } else {
            None
        };

        debug!(
            rules = rules.len(),
            detectors = config.detect_builtin_pii,
            "masking engine ready"
        );

        Ok(Self { rules, detectors })
    }

    /// An engine with no rules and no detectors: the fallback when
    /// configuration cannot be loaded. Masks nothing.
    pub fn empty() -> Self {
        Self {
            rules: Vec::new(),
            detectors: None,
        }
    }

    /// Number of rules that compiled and are active
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Mask sensitive substrings in `text`, scoped by the optional
    /// (record type, field) context.
    ///
    /// Custom rules run first, in declared order, with literal replacement
    /// text; the built-in detectors run afterwards when enabled. Empty
    /// input passes through unchanged. This method never fails: the worst
    /// case for a misconfigured rule set is text passing through unmasked.
    pub fn mask(
        &self,
        text: &str,
        record_type: Option<&RecordType>,
        field: Option<&FieldName>,
    ) -> String {
        if text.is_empty() {
            return String::new();
        }

        let mut masked = text.to_string();

        for rule in &self.rules {
            if !rule.applies_to(record_type, field) {
                trace!(rule = %rule.name, "rule out of scope, skipping");
                continue;
            }

            masked = rule
                .pattern
                .replace_all(&masked, NoExpand(&rule.replacement))
                .into_owned();
        }

        if let Some(detectors) = &self.detectors {
            masked = detectors.apply(&masked);
        }

        masked
    }

    /// Convenience for contexts without a record type or field
    pub fn mask_text(&self, text: &str) -> String {
        self.mask(text, None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::RedactionRule;

    fn engine_with_rules(rules: Vec<RedactionRule>) -> MaskingEngine {
        MaskingEngine::new(&MaskingConfig {
            detect_builtin_pii: false,
            rules,
        })
        .unwrap()
    }

    #[test]
    fn test_custom_global_rule() {
        let engine = engine_with_rules(vec![RedactionRule::global("foo", "foo", "bar")]);
        assert_eq!(engine.mask_text("foo baz"), "bar baz");
    }

    #[test]
    fn test_custom_rule_independent_of_detector_flag() {
        let engine = MaskingEngine::new(&MaskingConfig {
            detect_builtin_pii: true,
            rules: vec![RedactionRule::global("foo", "foo", "bar")],
        })
        .unwrap();
        assert_eq!(engine.mask_text("foo baz"), "bar baz");
    }

    #[test]
    fn test_rules_apply_in_declared_order() {
        // Rule A rewrites into text that rule B then matches; swapping the
        // order must give a different result.
        let a = RedactionRule::global("a", "alpha", "beta");
        let b = RedactionRule::global("b", "beta", "gamma");

        let ab = engine_with_rules(vec![a.clone(), b.clone()]);
        let ba = engine_with_rules(vec![b, a]);

        assert_eq!(ab.mask_text("alpha"), "gamma");
        assert_eq!(ba.mask_text("alpha"), "beta");
    }

    #[test]
    fn test_scoped_rule_enforcement() {
        let engine = engine_with_rules(vec![RedactionRule::global("inv", "foo", "bar")
            .with_scope(RuleScope::record_types(["Invoice"]))]);

        let invoice = RecordType::new("Invoice");
        let customer = RecordType::new("Customer");

        assert_eq!(engine.mask("foo", Some(&invoice), None), "bar");
        assert_eq!(engine.mask("foo", Some(&customer), None), "foo");
    }

    #[test]
    fn test_malformed_rule_does_not_abort_masking() {
        let engine = engine_with_rules(vec![
            RedactionRule::global("broken", "([unclosed", "x"),
            RedactionRule::global("valid", "secret", "[HIDDEN]"),
        ]);

        assert_eq!(engine.rule_count(), 1);
        assert_eq!(engine.mask_text("a secret thing"), "a [HIDDEN] thing");
    }

    #[test]
    fn test_disabled_rule_skipped() {
        let engine = engine_with_rules(vec![RedactionRule::global("off", "foo", "bar").disabled()]);
        assert_eq!(engine.mask_text("foo"), "foo");
    }

    #[test]
    fn test_replacement_is_literal() {
        let engine = engine_with_rules(vec![RedactionRule::global("amt", r"\d+", "$0.00")]);
        assert_eq!(engine.mask_text("price 123"), "price $0.00");
    }

    #[test]
    fn test_builtin_detectors_run_after_rules() {
        let engine = MaskingEngine::new(&MaskingConfig {
            detect_builtin_pii: true,
            rules: Vec::new(),
        })
        .unwrap();

        assert_eq!(
            engine.mask_text("Contact me at jane@example.com"),
            "Contact me at [EMAIL REDACTED]"
        );
        assert_eq!(
            engine.mask_text("Card: 4111 1111 1111 1111"),
            "Card: [CREDIT CARD REDACTED]"
        );
    }

    #[test]
    fn test_empty_input_unchanged() {
        let engine = MaskingEngine::empty();
        assert_eq!(engine.mask_text(""), "");
        assert_eq!(engine.mask_text("anything"), "anything");
    }
}
