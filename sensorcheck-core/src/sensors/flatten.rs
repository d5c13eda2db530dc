//! Flattening of a sensor document into temperature and humidity readings

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::document::SensorDocument;

/// Suffix marking a field as a live reading
const INPUT_SUFFIX: &str = "_input";

/// Raw values are reported in milli-units
const MILLI: f64 = 1000.0;

/// Kind of reading, selected by field-name prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorKind {
    /// `temp*_input`, degrees Celsius
    Temperature,
    /// `humidity*_input`, percent relative humidity
    Humidity,
}

impl SensorKind {
    /// Both kinds, in report order
    pub const ALL: [Self; 2] = [Self::Temperature, Self::Humidity];

    /// Short label used in issue descriptions and JSON output
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Temperature => "temp",
            Self::Humidity => "hum",
        }
    }

    /// Classifies a field label by prefix
    #[must_use]
    pub fn from_field(label: &str) -> Option<Self> {
        if label.starts_with("temp") {
            Some(Self::Temperature)
        } else if label.starts_with("humidity") {
            Some(Self::Humidity)
        } else {
            None
        }
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Converted readings, in document order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Readings {
    /// Temperatures in °C
    pub temp: Vec<f64>,
    /// Relative humidity in %
    pub hum: Vec<f64>,
}

impl Readings {
    /// Readings of one kind
    #[must_use]
    pub fn of(&self, kind: SensorKind) -> &[f64] {
        match kind {
            SensorKind::Temperature => &self.temp,
            SensorKind::Humidity => &self.hum,
        }
    }

    fn push(&mut self, kind: SensorKind, value: f64) {
        match kind {
            SensorKind::Temperature => self.temp.push(value),
            SensorKind::Humidity => self.hum.push(value),
        }
    }

    /// Total number of readings of both kinds
    #[must_use]
    pub fn total(&self) -> usize {
        self.temp.len() + self.hum.len()
    }
}

/// A field skipped because its value is not a number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataQualityWarning {
    /// Chip the field belongs to
    pub chip: String,
    /// Field label
    pub field: String,
}

impl fmt::Display for DataQualityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sensor value {} ({}) is not numeric, skipping",
            self.field, self.chip
        )
    }
}

/// Result of flattening: readings plus the fields that were dropped
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Flattened {
    /// Extracted readings
    pub readings: Readings,
    /// One entry per non-numeric field
    pub warnings: Vec<DataQualityWarning>,
}

/// Extracts temperature and humidity readings from a document.
///
/// For every field of every chip, in order: non-numeric values are dropped
/// with a warning, labels without the `_input` suffix are ignored, and the
/// value is converted from milli-units and rounded to one decimal before
/// being routed by its `temp` / `humidity` prefix. Never fails.
#[must_use]
pub fn flatten(document: &SensorDocument) -> Flattened {
    let mut flattened = Flattened::default();

    for (chip, fields) in document.chips() {
        for (label, value) in fields {
            let Some(raw) = numeric(value) else {
                flattened.warnings.push(DataQualityWarning {
                    chip: chip.to_string(),
                    field: label.clone(),
                });
                continue;
            };

            if !label.ends_with(INPUT_SUFFIX) {
                continue;
            }

            if let Some(kind) = SensorKind::from_field(label) {
                flattened.readings.push(kind, to_display_units(raw));
            }
        }
    }

    flattened
}

/// Numbers only; booleans and numeric-looking strings are not readings
fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

/// Milli-units to display units, rounded to one decimal place
fn to_display_units(raw: f64) -> f64 {
    (raw / MILLI * 10.0).round() / 10.0
}
