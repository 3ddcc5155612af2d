use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use super::derive::{AmountComponents, DerivedFields};
use super::error::{MessageError, Result};
use super::field_tag::FieldTag;

/// One value per [`FieldTag`], always the full closed set.
///
/// Values are stored by canonical index, so a tag can be blanked but never
/// removed, and iteration is always in serialization order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "BTreeMap<String, String>")]
pub struct FieldMap {
    values: [String; FieldTag::COUNT],
}

impl FieldMap {
    /// Every tag present, every value empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Initial form state: empty, except the system-fixed 23B and 71A.
    pub fn with_fixed_values() -> Self {
        let mut map = Self::new();
        for tag in FieldTag::ALL {
            if let Some(value) = tag.fixed_value() {
                map.values[tag.index()] = value.to_string();
            }
        }
        map
    }

    pub fn get(&self, tag: FieldTag) -> &str {
        &self.values[tag.index()]
    }

    /// `(tag, value)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (FieldTag, &str)> + '_ {
        FieldTag::ALL
            .iter()
            .map(move |&tag| (tag, self.values[tag.index()].as_str()))
    }

    /// Edit a field the way a user can. Fixed and derived tags are refused.
    pub fn set_user_field(&mut self, tag: FieldTag, value: impl Into<String>) -> Result<()> {
        if !tag.is_user_editable() {
            return Err(MessageError::NotUserEditable(tag));
        }
        self.values[tag.index()] = value.into();
        Ok(())
    }

    /// Clear a user-editable field. The tag stays in the map.
    pub fn blank(&mut self, tag: FieldTag) -> Result<()> {
        self.set_user_field(tag, String::new())
    }

    /// Recompute 32A/33B from the amount inputs, overwriting prior values.
    pub fn apply_amounts(&mut self, components: &AmountComponents) -> DerivedFields {
        let derived = components.derive();
        self.values[FieldTag::ValueDateAmount.index()] = derived.field_32a.clone();
        self.values[FieldTag::InstructedAmount.index()] = derived.field_33b.clone();
        derived
    }

    /// Submission guard: every value non-blank.
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    pub fn missing_fields(&self) -> Vec<FieldTag> {
        self.iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(tag, _)| tag)
            .collect()
    }

    /// Tags whose values would break the block framing if emitted as-is.
    pub fn fields_with_delimiters(&self) -> Vec<FieldTag> {
        self.iter()
            .filter(|(_, value)| value.contains(['{', '}', '\n', '\r']))
            .map(|(tag, _)| tag)
            .collect()
    }
}

impl TryFrom<BTreeMap<String, String>> for FieldMap {
    type Error = MessageError;

    /// Starts from the initial form state, so a missing 23B/71A keeps its
    /// fixed value and any other missing tag stays empty. Keys present in the
    /// input are taken as-is, fixed tags included, so a stored map reads back
    /// unchanged. Unknown keys are rejected.
    fn try_from(raw: BTreeMap<String, String>) -> Result<Self> {
        let mut map = FieldMap::with_fixed_values();
        for (key, value) in raw {
            let tag: FieldTag = key.parse()?;
            map.values[tag.index()] = value;
        }
        Ok(map)
    }
}

impl Serialize for FieldMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut out = serializer.serialize_map(Some(FieldTag::COUNT))?;
        for (tag, value) in self.iter() {
            out.serialize_entry(tag.as_str(), value)?;
        }
        out.end()
    }
}
