//! Fake `sensors -j` document generator
//!
//! Produces one chip with random temperature and humidity inputs in
//! milli-units, for hosts without real sensors.

use rand::Rng;
use serde_json::{Map, Value, json};

/// Temperatures are drawn from this interval (°C)
const TEMP_RANGE: std::ops::Range<f64> = -30.0..30.0;

/// Humidity is drawn from this interval (%)
const HUM_RANGE: std::ops::Range<f64> = 0.0..100.0;

/// Shape of the emulated document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmulatorSettings {
    /// Chip identifier
    pub chip: String,
    /// Number of `temp{i}_input` fields
    pub temps: usize,
    /// Number of `humidity{i}_input` fields
    pub hums: usize,
}

impl Default for EmulatorSettings {
    fn default() -> Self {
        Self {
            chip: "emulator".to_string(),
            temps: 2,
            hums: 2,
        }
    }
}

/// Generates a document with `temps` temperature fields followed by `hums`
/// humidity fields, values rounded to two decimals.
pub fn emulate<R: Rng>(settings: &EmulatorSettings, rng: &mut R) -> Value {
    let mut fields = Map::new();

    for i in 1..=settings.temps {
        let value = milli(rng.random_range(TEMP_RANGE));
        fields.insert(format!("temp{i}_input"), json!(value));
    }
    for i in 1..=settings.hums {
        let value = milli(rng.random_range(HUM_RANGE));
        fields.insert(format!("humidity{i}_input"), json!(value));
    }

    let mut chips = Map::new();
    chips.insert(settings.chip.clone(), Value::Object(fields));
    Value::Object(chips)
}

fn milli(value: f64) -> f64 {
    (value * 1000.0 * 100.0).round() / 100.0
}
