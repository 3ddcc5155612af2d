// --- MT103 message engine ---
//
// field map -> derived 32A/33B -> advisory validation -> block serialization.
// Every operation here is a pure function of its arguments.

pub mod derive;
pub mod error;
pub mod field_map;
pub mod field_tag;
pub mod grammar;
pub mod serializer;
pub mod validator;

pub use derive::{derive, AmountComponents, DerivedFields};
pub use error::{FieldFormatError, MessageError};
pub use field_map::FieldMap;
pub use field_tag::FieldTag;
pub use grammar::{lookup, Grammar};
pub use serializer::{serialize, MessageVariant};
pub use validator::{validate_all, validate_field, ValidationErrorMap};

/// Derive, validate and serialize in one step.
///
/// Returns the updated field map alongside the message so callers can keep
/// their form state in sync with what was emitted.
pub fn build_message(
    mut fields: FieldMap,
    amounts: &AmountComponents,
    variant: MessageVariant,
) -> (FieldMap, ValidationErrorMap, String) {
    fields.apply_amounts(amounts);
    let errors = validate_all(&fields);
    let message = serialize(&fields, variant);
    (fields, errors, message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_build_message_applies_amounts_first() {
        let amounts = AmountComponents::new(NaiveDate::from_ymd_opt(2026, 1, 21), "eur", "900");
        let (fields, errors, message) =
            build_message(FieldMap::with_fixed_values(), &amounts, MessageVariant::Rtgs);
        assert_eq!(fields.get(FieldTag::ValueDateAmount), "260121EUR900");
        assert_eq!(errors.get(FieldTag::ValueDateAmount), "");
        assert!(message.contains("\n:32A:260121EUR900\n:33B:EUR900\n"));
        assert!(message.contains("{103:PEG}"));
    }
}
