//! Property tests for sensor document flattening

use proptest::prelude::*;
use sensorcheck_core::sensors::{SensorDocument, flatten};
use serde_json::{Map, Value, json};

/// What a generated field looks like
#[derive(Debug, Clone)]
enum FieldSpec {
    Temp(i64),
    Humidity(i64),
    OtherInput(i64),
    Metadata(i64),
    NonNumeric(String),
}

fn arb_field() -> impl Strategy<Value = FieldSpec> {
    prop_oneof![
        (-60_000i64..150_000).prop_map(FieldSpec::Temp),
        (0i64..110_000).prop_map(FieldSpec::Humidity),
        (0i64..5_000).prop_map(FieldSpec::OtherInput),
        (0i64..100_000).prop_map(FieldSpec::Metadata),
        "[a-zA-Z ]{0,12}".prop_map(FieldSpec::NonNumeric),
    ]
}

fn arb_chips() -> impl Strategy<Value = Vec<Vec<FieldSpec>>> {
    prop::collection::vec(prop::collection::vec(arb_field(), 0..8), 0..4)
}

/// Builds the document; labels carry the field position so they are unique
fn build(chips: &[Vec<FieldSpec>]) -> Value {
    let mut doc = Map::new();
    for (c, fields) in chips.iter().enumerate() {
        let mut chip = Map::new();
        for (i, field) in fields.iter().enumerate() {
            let (label, value) = match field {
                FieldSpec::Temp(v) => (format!("temp{i}_input"), json!(v)),
                FieldSpec::Humidity(v) => (format!("humidity{i}_input"), json!(v)),
                FieldSpec::OtherInput(v) => (format!("fan{i}_input"), json!(v)),
                FieldSpec::Metadata(v) => (format!("temp{i}_max"), json!(v)),
                FieldSpec::NonNumeric(s) => (format!("temp{i}_input"), json!(s)),
            };
            chip.insert(label, value);
        }
        doc.insert(format!("chip-{c}"), Value::Object(chip));
    }
    Value::Object(doc)
}

proptest! {
    /// Property: output lengths partition the numeric `_input` fields by prefix
    #[test]
    fn lengths_match_numeric_input_fields(chips in arb_chips()) {
        let doc = SensorDocument::from_value(build(&chips)).unwrap();
        let flat = flatten(&doc);

        let all: Vec<&FieldSpec> = chips.iter().flatten().collect();
        let temps = all.iter().filter(|f| matches!(f, FieldSpec::Temp(_))).count();
        let hums = all.iter().filter(|f| matches!(f, FieldSpec::Humidity(_))).count();
        let non_numeric = all.iter().filter(|f| matches!(f, FieldSpec::NonNumeric(_))).count();

        prop_assert_eq!(flat.readings.temp.len(), temps);
        prop_assert_eq!(flat.readings.hum.len(), hums);
        prop_assert_eq!(flat.warnings.len(), non_numeric);
    }

    /// Property: each reading is the milli-unit value scaled and rounded
    #[test]
    fn readings_are_scaled_in_order(chips in arb_chips()) {
        let doc = SensorDocument::from_value(build(&chips)).unwrap();
        let flat = flatten(&doc);

        let expected: Vec<f64> = chips
            .iter()
            .flatten()
            .filter_map(|f| match f {
                FieldSpec::Temp(v) => Some(*v as f64 / 1000.0),
                _ => None,
            })
            .collect();

        prop_assert_eq!(flat.readings.temp.len(), expected.len());
        for (got, want) in flat.readings.temp.iter().zip(&expected) {
            prop_assert!((got - want).abs() <= 0.05 + 1e-9, "{} vs {}", got, want);
        }
    }

    /// Property: a serialized document flattens the same after a text round trip
    #[test]
    fn parse_from_text_matches_value(chips in arb_chips()) {
        let value = build(&chips);
        let from_text = SensorDocument::parse(&value.to_string()).unwrap();
        let from_value = SensorDocument::from_value(value).unwrap();
        prop_assert_eq!(flatten(&from_text), flatten(&from_value));
    }
}
