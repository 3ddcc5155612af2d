use std::fmt;
use std::str::FromStr;

use super::error::MessageError;

/// Block 4 field tags of the outbound MT103-style message.
///
/// Declaration order is the serialization order; `ALL` mirrors it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldTag {
    /// `:20:` sender's reference
    Reference,
    /// `:23B:` bank operation code
    OperationCode,
    /// `:32A:` value date, currency, interbank settled amount
    ValueDateAmount,
    /// `:33B:` currency and instructed amount
    InstructedAmount,
    /// `:50K:` ordering customer
    OrderingCustomer,
    /// `:52A:` ordering institution (sender BIC)
    OrderingInstitution,
    /// `:57A:` account with institution (receiver BIC)
    AccountWithInstitution,
    /// `:59:` beneficiary customer
    Beneficiary,
    /// `:70:` remittance information
    RemittanceInfo,
    /// `:71A:` details of charges
    ChargeDetails,
    /// `:71F:` sender's charges
    SenderCharges,
}

impl FieldTag {
    pub const COUNT: usize = 11;

    pub const ALL: [FieldTag; Self::COUNT] = [
        FieldTag::Reference,
        FieldTag::OperationCode,
        FieldTag::ValueDateAmount,
        FieldTag::InstructedAmount,
        FieldTag::OrderingCustomer,
        FieldTag::OrderingInstitution,
        FieldTag::AccountWithInstitution,
        FieldTag::Beneficiary,
        FieldTag::RemittanceInfo,
        FieldTag::ChargeDetails,
        FieldTag::SenderCharges,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FieldTag::Reference => "20",
            FieldTag::OperationCode => "23B",
            FieldTag::ValueDateAmount => "32A",
            FieldTag::InstructedAmount => "33B",
            FieldTag::OrderingCustomer => "50K",
            FieldTag::OrderingInstitution => "52A",
            FieldTag::AccountWithInstitution => "57A",
            FieldTag::Beneficiary => "59",
            FieldTag::RemittanceInfo => "70",
            FieldTag::ChargeDetails => "71A",
            FieldTag::SenderCharges => "71F",
        }
    }

    /// Position in the canonical order.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Input hint shown next to the field on a form.
    pub fn placeholder(self) -> &'static str {
        match self {
            FieldTag::Reference => "Reference No.",
            FieldTag::OperationCode => "CRED",
            FieldTag::ValueDateAmount => "DateCurrencyAmount",
            FieldTag::InstructedAmount => "CurrencyAmount",
            FieldTag::OrderingCustomer => "Creditor IBAN, Name, Address",
            FieldTag::OrderingInstitution => "Sender BIC",
            FieldTag::AccountWithInstitution => "Receiver BIC",
            FieldTag::Beneficiary => "Receiver IBAN",
            FieldTag::RemittanceInfo => "Transaction Purpose",
            FieldTag::ChargeDetails => "BEN",
            FieldTag::SenderCharges => "CurrencyCharge",
        }
    }

    /// Constant value for system-fixed tags, `None` for everything else.
    pub fn fixed_value(self) -> Option<&'static str> {
        match self {
            FieldTag::OperationCode => Some("CRED"),
            FieldTag::ChargeDetails => Some("BEN"),
            _ => None,
        }
    }

    pub fn is_system_fixed(self) -> bool {
        self.fixed_value().is_some()
    }

    /// 32A and 33B are only ever written by the derived-field calculator.
    pub fn is_derived(self) -> bool {
        matches!(self, FieldTag::ValueDateAmount | FieldTag::InstructedAmount)
    }

    pub fn is_user_editable(self) -> bool {
        !self.is_system_fixed() && !self.is_derived()
    }
}

impl fmt::Display for FieldTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldTag {
    type Err = MessageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldTag::ALL
            .iter()
            .copied()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| MessageError::UnknownTag(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_order_matches_wire_tags() {
        let tags: Vec<&str> = FieldTag::ALL.iter().map(|t| t.as_str()).collect();
        assert_eq!(
            tags,
            vec!["20", "23B", "32A", "33B", "50K", "52A", "57A", "59", "70", "71A", "71F"]
        );
    }

    #[test]
    fn test_index_follows_declaration_order() {
        for (i, tag) in FieldTag::ALL.iter().enumerate() {
            assert_eq!(tag.index(), i);
        }
    }

    #[test]
    fn test_parse_known_and_unknown_tags() {
        assert_eq!("23B".parse::<FieldTag>(), Ok(FieldTag::OperationCode));
        assert_eq!("71F".parse::<FieldTag>(), Ok(FieldTag::SenderCharges));
        assert_eq!(
            "23b".parse::<FieldTag>(),
            Err(MessageError::UnknownTag("23b".to_string()))
        );
        assert!("32".parse::<FieldTag>().is_err());
    }

    #[test]
    fn test_editability() {
        assert!(FieldTag::Reference.is_user_editable());
        assert!(!FieldTag::OperationCode.is_user_editable());
        assert!(!FieldTag::ChargeDetails.is_user_editable());
        assert!(!FieldTag::ValueDateAmount.is_user_editable());
        assert!(!FieldTag::InstructedAmount.is_user_editable());
        assert_eq!(FieldTag::ChargeDetails.fixed_value(), Some("BEN"));
    }
}
