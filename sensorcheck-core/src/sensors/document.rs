//! Parser for `sensors -j` output
//!
//! The document is an object of chips, each chip an object of labeled
//! fields. Field values are left untyped here; the flattener decides what
//! counts as a reading.

use std::str::FromStr;

use serde_json::{Map, Value};

use crate::error::ParseError;

/// A parsed sensor document whose chips are all objects.
///
/// Chip and field order follow the remote output.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SensorDocument {
    chips: Map<String, Value>,
}

impl SensorDocument {
    /// Parses the raw command output.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Malformed`] for text that is not JSON (including
    /// empty output) and a shape error when the JSON is not an object of
    /// objects.
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        if raw.trim().is_empty() {
            return Err(ParseError::Malformed("empty output".to_string()));
        }
        let value: Value =
            serde_json::from_str(raw).map_err(|e| ParseError::Malformed(e.to_string()))?;
        Self::from_value(value)
    }

    /// Checks the shape of an already-deserialized value.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::NotAMapping`] when the top level is not an
    /// object, and [`ParseError::ChipNotAMapping`] for the first chip whose
    /// value is not an object.
    pub fn from_value(value: Value) -> Result<Self, ParseError> {
        let chips = match value {
            Value::Object(chips) => chips,
            other => return Err(ParseError::NotAMapping(json_kind(&other))),
        };

        if let Some((chip, fields)) = chips.iter().find(|(_, v)| !v.is_object()) {
            return Err(ParseError::ChipNotAMapping {
                chip: chip.clone(),
                kind: json_kind(fields),
            });
        }

        Ok(Self { chips })
    }

    /// Iterates chips and their fields in document order
    pub fn chips(&self) -> impl Iterator<Item = (&str, &Map<String, Value>)> {
        self.chips
            .iter()
            .filter_map(|(name, fields)| fields.as_object().map(|f| (name.as_str(), f)))
    }

    /// Number of chips
    #[must_use]
    pub fn len(&self) -> usize {
        self.chips.len()
    }

    /// Whether the document has no chips
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chips.is_empty()
    }
}

impl FromStr for SensorDocument {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Human-readable JSON type name, for diagnostics
pub(crate) const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
