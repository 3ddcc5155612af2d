//! Derived-field calculator for `:32A:` and `:33B:`.
//!
//! The value date, currency and amount are entered separately and composed
//! here. Dates are `chrono::NaiveDate` values, so the `YYMMDD` rendering is a
//! pure calendar operation and never shifts with the host timezone.

use chrono::NaiveDate;

use super::error::{MessageError, Result};

/// Raw amount inputs. Not serialized; only feeds 32A/33B.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AmountComponents {
    pub date: Option<NaiveDate>,
    pub currency: String,
    pub amount: String,
}

/// Output of [`derive`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DerivedFields {
    pub field_32a: String,
    pub field_33b: String,
}

impl AmountComponents {
    pub fn new(date: Option<NaiveDate>, currency: &str, amount: &str) -> Self {
        Self {
            date,
            currency: currency.to_string(),
            amount: amount.to_string(),
        }
    }

    /// Parse an ISO `YYYY-MM-DD` date as produced by a date input.
    /// Blank input means "no date yet".
    pub fn parse_date(input: &str) -> Result<Option<NaiveDate>> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| MessageError::InvalidDate(input.to_string()))
    }

    pub fn derive(&self) -> DerivedFields {
        derive(self.date, &self.currency, &self.amount)
    }
}

/// `YYMMDD`, or empty when there is no date.
pub fn format_date_yymmdd(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%y%m%d").to_string())
        .unwrap_or_default()
}

/// Swap the first decimal point for a decimal comma. Nothing else changes.
pub fn format_amount(amount: &str) -> String {
    amount.replacen('.', ",", 1)
}

/// Compose 32A (`YYMMDD` + CCY + amount) and 33B (CCY + amount).
///
/// Each composite is empty unless all of its own components are present.
pub fn derive(date: Option<NaiveDate>, currency: &str, amount: &str) -> DerivedFields {
    let date_part = format_date_yymmdd(date);
    let ccy = currency.to_uppercase();
    let amt = format_amount(amount);

    let field_32a = if !date_part.is_empty() && !ccy.is_empty() && !amt.is_empty() {
        format!("{date_part}{ccy}{amt}")
    } else {
        String::new()
    };
    let field_33b = if !ccy.is_empty() && !amt.is_empty() {
        format!("{ccy}{amt}")
    } else {
        String::new()
    };

    DerivedFields {
        field_32a,
        field_33b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_derive_full_components() {
        let out = derive(date(2026, 1, 21), "usd", "12500.75");
        assert_eq!(out.field_32a, "260121USD12500,75");
        assert_eq!(out.field_33b, "USD12500,75");
    }

    #[test]
    fn test_derive_without_date_keeps_33b() {
        let out = derive(None, "eur", "100");
        assert_eq!(out.field_32a, "");
        assert_eq!(out.field_33b, "EUR100");
    }

    #[test]
    fn test_derive_missing_currency_or_amount() {
        assert_eq!(derive(date(2026, 1, 21), "", "100"), DerivedFields::default());
        assert_eq!(derive(date(2026, 1, 21), "usd", ""), DerivedFields::default());
    }

    #[test]
    fn test_date_is_zero_padded() {
        assert_eq!(format_date_yymmdd(date(2005, 3, 7)), "050307");
        assert_eq!(format_date_yymmdd(date(2026, 12, 31)), "261231");
        assert_eq!(format_date_yymmdd(None), "");
    }

    #[test]
    fn test_amount_only_replaces_first_point() {
        assert_eq!(format_amount("12500.75"), "12500,75");
        assert_eq!(format_amount("1.000.5"), "1,000.5");
        assert_eq!(format_amount("-3"), "-3");
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(AmountComponents::parse_date(""), Ok(None));
        assert_eq!(AmountComponents::parse_date("  "), Ok(None));
        assert_eq!(AmountComponents::parse_date("2026-01-21"), Ok(date(2026, 1, 21)));
        assert_eq!(
            AmountComponents::parse_date("21/01/2026"),
            Err(MessageError::InvalidDate("21/01/2026".to_string()))
        );
    }
}
