use thiserror::Error;

use super::field_tag::FieldTag;

/// Errors raised while assembling a field map at the input boundary.
///
/// The engine operations themselves (derive, validate, serialize) never fail;
/// these only come from converting untrusted input into engine types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MessageError {
    #[error("Unknown field tag: {0}")]
    UnknownTag(String),

    #[error("Field {0} is not user-editable")]
    NotUserEditable(FieldTag),

    #[error("Invalid value date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Unknown message variant: {0}")]
    UnknownVariant(String),
}

/// A field whose value does not match its registered grammar.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error(":{tag}: {message}")]
pub struct FieldFormatError {
    pub tag: FieldTag,
    pub message: String,
}

pub type Result<T> = std::result::Result<T, MessageError>;
