//! Adapter for the older storage collaborator.
//!
//! That collaborator takes a JSON object with descriptive keys (`ref`,
//! `operation`, `senderBank`, ...) instead of tag strings, and renders its own
//! simpler template: header blocks on separate lines, no `{4:` marker and no
//! 33B/70 lines.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::mt_message::derive::{format_amount, format_date_yymmdd};
use crate::mt_message::error::{MessageError, Result};
use crate::mt_message::serializer::{application_header, user_header, BASIC_HEADER};
use crate::mt_message::{AmountComponents, FieldMap, FieldTag, MessageVariant};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegacyPayload {
    pub block1: String,
    pub block2: String,
    pub block3: String,
    #[serde(rename = "ref")]
    pub reference: String,
    pub operation: String,
    /// `YYMMDD`
    pub date: String,
    pub currency: String,
    pub amount: String,
    pub sender: String,
    pub sender_bank: String,
    pub receiver_bank: String,
    pub receiver: String,
    pub charges: String,
    pub details_of_charges: String,
}

impl LegacyPayload {
    pub fn from_field_map(
        fields: &FieldMap,
        amounts: &AmountComponents,
        variant: MessageVariant,
    ) -> Self {
        Self {
            block1: BASIC_HEADER.to_string(),
            block2: application_header(fields),
            block3: user_header(variant),
            reference: fields.get(FieldTag::Reference).to_string(),
            operation: fields.get(FieldTag::OperationCode).to_string(),
            date: format_date_yymmdd(amounts.date),
            currency: amounts.currency.to_uppercase(),
            amount: format_amount(&amounts.amount),
            sender: fields.get(FieldTag::OrderingCustomer).to_string(),
            sender_bank: fields.get(FieldTag::OrderingInstitution).to_string(),
            receiver_bank: fields.get(FieldTag::AccountWithInstitution).to_string(),
            receiver: fields.get(FieldTag::Beneficiary).to_string(),
            charges: fields.get(FieldTag::ChargeDetails).to_string(),
            details_of_charges: fields.get(FieldTag::SenderCharges).to_string(),
        }
    }

    /// Map back onto the tag-keyed model.
    ///
    /// `operation` and `charges` are ignored: 23B and 71A are system-fixed.
    /// The payload has no 70 field, so it stays empty.
    pub fn to_field_map(&self) -> Result<(FieldMap, AmountComponents)> {
        let date = match self.date.trim() {
            "" => None,
            raw => Some(
                NaiveDate::parse_from_str(raw, "%y%m%d")
                    .map_err(|_| MessageError::InvalidDate(self.date.clone()))?,
            ),
        };
        let amounts = AmountComponents::new(date, &self.currency, &self.amount);

        let mut fields = FieldMap::with_fixed_values();
        fields.set_user_field(FieldTag::Reference, self.reference.as_str())?;
        fields.set_user_field(FieldTag::OrderingCustomer, self.sender.as_str())?;
        fields.set_user_field(FieldTag::OrderingInstitution, self.sender_bank.as_str())?;
        fields.set_user_field(FieldTag::AccountWithInstitution, self.receiver_bank.as_str())?;
        fields.set_user_field(FieldTag::Beneficiary, self.receiver.as_str())?;
        fields.set_user_field(FieldTag::SenderCharges, self.details_of_charges.as_str())?;
        fields.apply_amounts(&amounts);
        Ok((fields, amounts))
    }

    /// The collaborator's own text template.
    pub fn render(&self) -> String {
        [
            format!("{{1:{}}}", self.block1),
            format!("{{2:{}}}", self.block2),
            format!("{{3:{}}}", self.block3),
            format!(":20:{}", self.reference),
            format!(":23B:{}", self.operation),
            format!(":32A:{}{}{}", self.date, self.currency, self.amount),
            format!(":50K:{}", self.sender),
            format!(":52A:{}", self.sender_bank),
            format!(":57A:{}", self.receiver_bank),
            format!(":59:{}", self.receiver),
            format!(":71A:{}", self.charges),
            format!(":71F:{}", self.details_of_charges),
            "-}".to_string(),
        ]
        .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (FieldMap, AmountComponents) {
        let amounts = AmountComponents::new(NaiveDate::from_ymd_opt(2026, 1, 21), "usd", "12500.75");
        let mut fields = FieldMap::with_fixed_values();
        fields.set_user_field(FieldTag::Reference, "REF1").unwrap();
        fields.set_user_field(FieldTag::OrderingCustomer, "JOHN DOE").unwrap();
        fields.set_user_field(FieldTag::OrderingInstitution, "ABDIEGCAXXX").unwrap();
        fields.set_user_field(FieldTag::AccountWithInstitution, "BARCGGB22").unwrap();
        fields.set_user_field(FieldTag::Beneficiary, "JANE SMITH").unwrap();
        fields.set_user_field(FieldTag::SenderCharges, "USD25").unwrap();
        fields.apply_amounts(&amounts);
        (fields, amounts)
    }

    #[test]
    fn test_json_keys_follow_collaborator_naming() {
        let (fields, amounts) = sample();
        let payload = LegacyPayload::from_field_map(&fields, &amounts, MessageVariant::Standard);
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["ref"], "REF1");
        assert_eq!(json["operation"], "CRED");
        assert_eq!(json["date"], "260121");
        assert_eq!(json["currency"], "USD");
        assert_eq!(json["amount"], "12500,75");
        assert_eq!(json["senderBank"], "ABDIEGCAXXX");
        assert_eq!(json["detailsOfCharges"], "USD25");
        assert_eq!(json["block2"], "01030000991231BARCEGCAXXXX00000000009912310000N");
    }

    #[test]
    fn test_render_template() {
        let (fields, amounts) = sample();
        let payload = LegacyPayload::from_field_map(&fields, &amounts, MessageVariant::Rtgs);
        let text = payload.render();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "{1:F01ABDIEGCAXXX00000000000}");
        assert!(lines[2].starts_with("{3:{103:PEG}{108:"));
        assert_eq!(lines[5], ":32A:260121USD12500,75");
        assert_eq!(lines.last(), Some(&"-}"));
        assert!(!text.contains(":33B:"));
        assert!(!text.contains(":70:"));
    }

    #[test]
    fn test_back_to_field_map() {
        let (fields, amounts) = sample();
        let payload = LegacyPayload::from_field_map(&fields, &amounts, MessageVariant::Standard);
        let (restored, restored_amounts) = payload.to_field_map().unwrap();
        assert_eq!(restored, fields);
        assert_eq!(restored_amounts.date, amounts.date);
    }

    #[test]
    fn test_missing_keys_default_and_bad_date() {
        let payload: LegacyPayload = serde_json::from_str(r#"{"ref":"R","date":"2601"}"#).unwrap();
        assert_eq!(payload.sender, "");
        assert_eq!(
            payload.to_field_map().unwrap_err(),
            MessageError::InvalidDate("2601".to_string())
        );
    }
}
