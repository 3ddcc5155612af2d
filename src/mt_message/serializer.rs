//! MT103 block assembly.
//!
//! ## Output Layout
//!
//! ```text
//! {1:F01ABDIEGCAXXX00000000000}
//! {2:01030000991231BARC<52A[4..] or --NULL-->X00000000009912310000N}
//! {3:[{103:PEG}]{108:..}{111:001}{121:..}}
//! {4:\n:20:..\n:23B:..\n ... \n:71F:..\n-}
//! ```
//!
//! The four blocks are concatenated without separators; only block 4 is
//! line-oriented. Field values are emitted verbatim. A value containing `{`,
//! `}` or a newline is not escaped and will corrupt the framing; use
//! [`FieldMap::fields_with_delimiters`] to detect that before saving.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;

use super::error::MessageError;
use super::field_map::FieldMap;
use super::field_tag::FieldTag;

/// Block 1 body: application id, service id, sender LT address, session, sequence.
pub const BASIC_HEADER: &str = "F01ABDIEGCAXXX00000000000";
/// Block 2 text before the receiver remainder.
pub const APPLICATION_HEADER_PREFIX: &str = "01030000991231BARC";
/// Block 2 text after the receiver remainder.
pub const APPLICATION_HEADER_SUFFIX: &str = "X00000000009912310000N";
/// Substituted into block 2 when 52A has nothing past its first four characters.
pub const NULL_RECEIVER: &str = "--NULL--";
/// Block 3 service-identifier sub-tag, RTGS only.
pub const RTGS_SERVICE_TAG: &str = "{103:PEG}";
/// Block 3 banking priority, MUR and end-to-end reference.
pub const USER_HEADER_TRAILER: &str =
    "{108:25C0816470809700}{111:001}{121:b586d8f5-10fe-43f0-ad0d-40cb466486f6}";
/// Last line of block 4, which also closes the block.
pub const TEXT_BLOCK_END: &str = "-}";

/// Settlement rail of the outbound message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ValueEnum)]
pub enum MessageVariant {
    /// Plain SWIFT FIN transfer.
    #[default]
    #[value(alias = "swift")]
    Standard,
    /// Real-time gross settlement; adds `{103:PEG}` to block 3.
    Rtgs,
}

impl MessageVariant {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageVariant::Standard => "standard",
            MessageVariant::Rtgs => "rtgs",
        }
    }
}

impl fmt::Display for MessageVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageVariant {
    type Err = MessageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "standard" | "swift" => Ok(MessageVariant::Standard),
            "rtgs" => Ok(MessageVariant::Rtgs),
            _ => Err(MessageError::UnknownVariant(s.to_string())),
        }
    }
}

/// Block 2 receiver remainder taken from the sender BIC (52A).
///
/// This reuses 52A rather than the receiver field on purpose: downstream
/// consumers expect exactly this text.
pub fn receiver_remainder(field_52a: &str) -> String {
    let rest: String = field_52a.chars().skip(4).collect();
    if rest.is_empty() {
        NULL_RECEIVER.to_string()
    } else {
        rest
    }
}

pub fn application_header(fields: &FieldMap) -> String {
    format!(
        "{APPLICATION_HEADER_PREFIX}{}{APPLICATION_HEADER_SUFFIX}",
        receiver_remainder(fields.get(FieldTag::OrderingInstitution))
    )
}

pub fn user_header(variant: MessageVariant) -> String {
    match variant {
        MessageVariant::Rtgs => format!("{RTGS_SERVICE_TAG}{USER_HEADER_TRAILER}"),
        MessageVariant::Standard => USER_HEADER_TRAILER.to_string(),
    }
}

/// Build the full message text. Total: any field map yields a message.
pub fn serialize(fields: &FieldMap, variant: MessageVariant) -> String {
    let body: Vec<String> = fields
        .iter()
        .map(|(tag, value)| format!(":{tag}:{value}"))
        .collect();

    let mut out = String::with_capacity(256 + body.iter().map(String::len).sum::<usize>());
    out.push_str("{1:");
    out.push_str(BASIC_HEADER);
    out.push('}');
    out.push_str("{2:");
    out.push_str(&application_header(fields));
    out.push('}');
    out.push_str("{3:");
    out.push_str(&user_header(variant));
    out.push('}');
    out.push_str("{4:\n");
    out.push_str(&body.join("\n"));
    out.push('\n');
    out.push_str(TEXT_BLOCK_END);
    out
}
