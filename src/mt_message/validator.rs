//! Advisory validation of a [`FieldMap`].
//!
//! The error map is recomputed from scratch on every call and never blocks
//! serialization.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::error::FieldFormatError;
use super::field_map::FieldMap;
use super::field_tag::FieldTag;
use super::grammar;

/// Error message per tag; an empty string means the field is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrorMap {
    messages: [String; FieldTag::COUNT],
}

impl ValidationErrorMap {
    pub fn get(&self, tag: FieldTag) -> &str {
        &self.messages[tag.index()]
    }

    pub fn is_valid(&self) -> bool {
        self.messages.iter().all(String::is_empty)
    }

    /// `(tag, message)` for every tag, in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (FieldTag, &str)> + '_ {
        FieldTag::ALL
            .iter()
            .map(move |&tag| (tag, self.messages[tag.index()].as_str()))
    }

    /// Only the failing fields.
    pub fn errors(&self) -> Vec<FieldFormatError> {
        self.iter()
            .filter(|(_, message)| !message.is_empty())
            .map(|(tag, message)| FieldFormatError {
                tag,
                message: message.to_string(),
            })
            .collect()
    }
}

impl Serialize for ValidationErrorMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut out = serializer.serialize_map(Some(FieldTag::COUNT))?;
        for (tag, message) in self.iter() {
            out.serialize_entry(tag.as_str(), message)?;
        }
        out.end()
    }
}

/// Check one value. Tags without a grammar always pass.
pub fn validate_field(tag: FieldTag, value: &str) -> String {
    match grammar::lookup(tag) {
        Some(g) if !g.matches(value) => g.error_message.to_string(),
        _ => String::new(),
    }
}

pub fn validate_all(fields: &FieldMap) -> ValidationErrorMap {
    let mut errors = ValidationErrorMap::default();
    for (tag, value) in fields.iter() {
        errors.messages[tag.index()] = validate_field(tag, value);
    }
    errors
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    const UNREGISTERED: [FieldTag; 5] = [
        FieldTag::OrderingCustomer,
        FieldTag::OrderingInstitution,
        FieldTag::AccountWithInstitution,
        FieldTag::Beneficiary,
        FieldTag::RemittanceInfo,
    ];

    proptest! {
        #[test]
        fn unregistered_tags_accept_any_value(value in any::<String>()) {
            for tag in UNREGISTERED {
                prop_assert_eq!(validate_field(tag, &value), "");
            }
        }

        #[test]
        fn error_is_empty_iff_grammar_matches(value in any::<String>()) {
            for g in grammar::registered() {
                let message = validate_field(g.tag, &value);
                prop_assert_eq!(message.is_empty(), g.matches(&value));
                if !message.is_empty() {
                    prop_assert_eq!(message.as_str(), g.error_message);
                }
            }
        }

        #[test]
        fn reference_is_one_to_sixteen_alphanumerics(value in "[A-Za-z0-9 _-]{0,24}") {
            let ok = (1..=16).contains(&value.len())
                && value.chars().all(|c| c.is_ascii_alphanumeric());
            prop_assert_eq!(validate_field(FieldTag::Reference, &value).is_empty(), ok);
        }

        #[test]
        fn operation_code_is_four_letters(value in "[A-Za-z0-9]{0,6}") {
            let ok = value.len() == 4 && value.chars().all(|c| c.is_ascii_alphabetic());
            prop_assert_eq!(validate_field(FieldTag::OperationCode, &value).is_empty(), ok);
        }

        #[test]
        fn charge_details_accepts_only_our_ben_sha(value in "[A-Za-z]{0,5}") {
            let ok = ["OUR", "BEN", "SHA"].contains(&value.to_ascii_uppercase().as_str());
            prop_assert_eq!(validate_field(FieldTag::ChargeDetails, &value).is_empty(), ok);
        }

        #[test]
        fn whole_amounts_pass(ccy in "[A-Za-z]{3}", amount in "[0-9]{1,15}", date in "[0-9]{6}") {
            let ccy_amount = format!("{ccy}{amount}");
            prop_assert_eq!(validate_field(FieldTag::InstructedAmount, &ccy_amount), "");
            prop_assert_eq!(validate_field(FieldTag::SenderCharges, &ccy_amount), "");
            prop_assert_eq!(
                validate_field(FieldTag::ValueDateAmount, &format!("{date}{ccy_amount}")),
                ""
            );
        }

        #[test]
        fn decimal_comma_amounts_fail(ccy in "[A-Za-z]{3}", whole in "[0-9]{1,9}", frac in "[0-9]{1,2}") {
            let value = format!("{ccy}{whole},{frac}");
            prop_assert_eq!(validate_field(FieldTag::InstructedAmount, &value), "Format: CCYAmount");
            prop_assert_eq!(
                validate_field(FieldTag::SenderCharges, &value),
                "Charges amount format: CCYAmount"
            );
            prop_assert_eq!(
                validate_field(FieldTag::ValueDateAmount, &format!("260121{value}")),
                "Format: YYMMDDCCYAmount"
            );
        }
    }
}
