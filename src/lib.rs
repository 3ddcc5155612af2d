//! # swift_message_hub
//!
//! Builds SWIFT MT103-style customer transfer messages from form-like input.
//!
//! - [`mt_message`] — field tags, field map, derived 32A/33B, grammar
//!   validation and block serialization (all pure functions)
//! - [`storage`] — file writer for finished messages and the legacy payload adapter
//! - [`batch`] — parallel construction of many messages from a CSV file
//! - [`config`] — environment settings
//!
//! ```rust
//! use chrono::NaiveDate;
//! use swift_message_hub::mt_message::{
//!     serialize, validate_all, AmountComponents, FieldMap, FieldTag, MessageVariant,
//! };
//!
//! let mut fields = FieldMap::with_fixed_values();
//! fields.set_user_field(FieldTag::Reference, "REF20260121A").unwrap();
//! fields.apply_amounts(&AmountComponents::new(
//!     NaiveDate::from_ymd_opt(2026, 1, 21),
//!     "usd",
//!     "12500",
//! ));
//!
//! assert_eq!(validate_all(&fields).get(FieldTag::ValueDateAmount), "");
//! let message = serialize(&fields, MessageVariant::Standard);
//! assert!(message.contains("\n:32A:260121USD12500\n"));
//! assert!(message.ends_with("\n-}"));
//! ```

pub mod batch;
pub mod config;
pub mod mt_message;
pub mod storage;

pub use config::Config;
pub use mt_message::{
    serialize, validate_all, AmountComponents, FieldMap, FieldTag, MessageVariant,
    ValidationErrorMap,
};
pub use storage::{LegacyPayload, MessageWriter};
