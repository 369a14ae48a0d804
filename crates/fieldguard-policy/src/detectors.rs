//! Built-in PII detectors

use fieldguard_core::{Error, Result};
use regex::Regex;

/// Redaction token for detected email addresses
pub const EMAIL_REDACTED: &str = "[EMAIL REDACTED]";
/// Redaction token for detected phone numbers
pub const PHONE_REDACTED: &str = "[PHONE REDACTED]";
/// Redaction token for detected card numbers
pub const CREDIT_CARD_REDACTED: &str = "[CREDIT CARD REDACTED]";
/// Redaction token for detected national id numbers
pub const SSN_REDACTED: &str = "[SSN REDACTED]";

const EMAIL_PATTERN: &str = r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b";
const PHONE_PATTERN: &str = r"\b(?:\+\d{1,3}[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}\b";
const CREDIT_CARD_PATTERN: &str = r"\b(?:\d{4}[-\s]?){3}\d{4}\b";
const SSN_PATTERN: &str = r"\b\d{3}[-\s]?\d{2}[-\s]?\d{4}\b";

/// Fixed detectors for common PII shapes.
///
/// Detectors are content-type-agnostic and intentionally scope-blind: they
/// run after all custom rules, in a fixed order, each independently of the
/// others. Replacement tokens contain no digits or `@`, so re-running the
/// detectors over already-redacted text is a no-op.
pub struct BuiltinDetectors {
    email: Regex,
    phone: Regex,
    credit_card: Regex,
    ssn: Regex,
}

impl BuiltinDetectors {
    /// Compile the detector set
    pub fn new() -> Result<Self> {
        Ok(Self {
            email: Regex::new(EMAIL_PATTERN)
                .map_err(|e| Error::rule(format!("failed to compile email detector: {}", e)))?,
            phone: Regex::new(PHONE_PATTERN)
                .map_err(|e| Error::rule(format!("failed to compile phone detector: {}", e)))?,
            credit_card: Regex::new(CREDIT_CARD_PATTERN).map_err(|e| {
                Error::rule(format!("failed to compile credit card detector: {}", e))
            })?,
            ssn: Regex::new(SSN_PATTERN)
                .map_err(|e| Error::rule(format!("failed to compile ssn detector: {}", e)))?,
        })
    }

    /// Apply all four detectors in fixed order: email, phone, credit card,
    /// national id. Credit card runs before the national id detector so a
    /// grouped 16-digit sequence is never partially consumed as a 9-digit id.
    pub fn apply(&self, text: &str) -> String {
        let masked = self.email.replace_all(text, EMAIL_REDACTED);
        let masked = self.phone.replace_all(&masked, PHONE_REDACTED);
        let masked = self.credit_card.replace_all(&masked, CREDIT_CARD_REDACTED);
        let masked = self.ssn.replace_all(&masked, SSN_REDACTED);
        masked.into_owned()
    }
}
