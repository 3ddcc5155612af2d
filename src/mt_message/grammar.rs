//! Field grammar registry.
//!
//! Only six tags carry a format rule. Free-text and BIC fields (50K, 52A,
//! 57A, 59, 70) have no entry, and callers must treat a missing grammar as
//! "always valid".

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

use super::field_tag::FieldTag;

/// A format rule bound to a field tag.
#[derive(Debug)]
pub struct Grammar {
    pub tag: FieldTag,
    pub pattern: Regex,
    pub error_message: &'static str,
}

impl Grammar {
    /// Anchored, case-insensitive match of the whole value.
    pub fn matches(&self, value: &str) -> bool {
        self.pattern.is_match(value)
    }
}

const RULES: &[(FieldTag, &str, &str)] = &[
    (
        FieldTag::Reference,
        r"^[a-z0-9]{1,16}$",
        "Reference must be 1–16 alphanumeric characters",
    ),
    (
        FieldTag::OperationCode,
        r"^[a-z]{4}$",
        "Operation code must be 4 letters (e.g. CRED)",
    ),
    (
        FieldTag::ValueDateAmount,
        r"^[0-9]{6}[a-z]{3}[0-9]+$",
        "Format: YYMMDDCCYAmount",
    ),
    (FieldTag::InstructedAmount, r"^[a-z]{3}[0-9]+$", "Format: CCYAmount"),
    (
        FieldTag::ChargeDetails,
        r"^(our|ben|sha)$",
        "Charges must be OUR, BEN, or SHA",
    ),
    (
        FieldTag::SenderCharges,
        r"^[a-z]{3}[0-9]+$",
        "Charges amount format: CCYAmount",
    ),
];

static REGISTRY: LazyLock<Vec<Grammar>> = LazyLock::new(|| {
    RULES
        .iter()
        .map(|&(tag, pattern, error_message)| Grammar {
            tag,
            // ASCII-only classes: `\d` and `[a-z]` stay ASCII like the rule table says.
            pattern: RegexBuilder::new(pattern)
                .case_insensitive(true)
                .unicode(false)
                .build()
                .expect("built-in field grammar must compile"),
            error_message,
        })
        .collect()
});

/// Grammar registered for `tag`, if any.
pub fn lookup(tag: FieldTag) -> Option<&'static Grammar> {
    REGISTRY.iter().find(|g| g.tag == tag)
}

/// Every registered grammar, in canonical tag order.
pub fn registered() -> &'static [Grammar] {
    &REGISTRY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registered_tags() {
        let tags: Vec<FieldTag> = registered().iter().map(|g| g.tag).collect();
        assert_eq!(
            tags,
            vec![
                FieldTag::Reference,
                FieldTag::OperationCode,
                FieldTag::ValueDateAmount,
                FieldTag::InstructedAmount,
                FieldTag::ChargeDetails,
                FieldTag::SenderCharges,
            ]
        );
    }

    #[test]
    fn test_unregistered_tags_have_no_grammar() {
        for tag in [
            FieldTag::OrderingCustomer,
            FieldTag::OrderingInstitution,
            FieldTag::AccountWithInstitution,
            FieldTag::Beneficiary,
            FieldTag::RemittanceInfo,
        ] {
            assert!(lookup(tag).is_none(), "{tag} should be unregistered");
        }
    }

    #[test]
    fn test_reference_length_bounds() {
        let g = lookup(FieldTag::Reference).unwrap();
        assert!(g.matches("A"));
        assert!(g.matches("REF20260121A"));
        assert!(g.matches("abcdefghij123456"));
        assert!(!g.matches("abcdefghij1234567"));
        assert!(!g.matches(""));
        assert!(!g.matches("REF-1"));
    }

    #[test]
    fn test_patterns_are_anchored_and_case_insensitive() {
        let g = lookup(FieldTag::ValueDateAmount).unwrap();
        assert!(g.matches("260121usd12500"));
        assert!(!g.matches("260121USD12500,75"));
        assert!(!g.matches("x260121USD1"));
        assert!(!g.matches("260121USD1x"));

        let charges = lookup(FieldTag::ChargeDetails).unwrap();
        assert!(charges.matches("Sha"));
        assert!(!charges.matches("SHARE"));
    }

    #[test]
    fn test_digits_are_ascii_only() {
        let g = lookup(FieldTag::InstructedAmount).unwrap();
        assert!(!g.matches("USD١٢٣"));
    }
}
