//! Range validation of flattened readings

use std::fmt;

use super::flatten::{Readings, SensorKind};

/// Inclusive `min..=max` bounds for one kind of reading.
///
/// A range with `min > max` is kept as given and rejects every value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    /// Lower bound (inclusive)
    pub min: f64,
    /// Upper bound (inclusive)
    pub max: f64,
}

impl Range {
    /// Creates a range
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Whether `value` lies inside the closed interval
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        !(value < self.min || value > self.max)
    }

    /// Whether the bounds are inverted
    #[must_use]
    pub fn is_inverted(&self) -> bool {
        self.min > self.max
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.min, self.max)
    }
}

/// Configured range per kind of reading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ranges {
    /// Temperature bounds in °C
    pub temp: Range,
    /// Humidity bounds in %
    pub hum: Range,
}

impl Ranges {
    /// Range for one kind
    #[must_use]
    pub const fn of(&self, kind: SensorKind) -> Range {
        match kind {
            SensorKind::Temperature => self.temp,
            SensorKind::Humidity => self.hum,
        }
    }
}

impl Default for Ranges {
    fn default() -> Self {
        Self {
            temp: Range::new(-20.0, 80.0),
            hum: Range::new(0.0, 100.0),
        }
    }
}

/// One reading outside its configured range.
///
/// Displays as `{kind}{index}: {value} out of {min}..{max}`, e.g.
/// `temp1: -30.0 out of -20..80`.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    /// Kind of the offending reading
    pub kind: SensorKind,
    /// 1-based position within its kind
    pub index: usize,
    /// The reading
    pub value: f64,
    /// Range it violated
    pub range: Range,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Debug keeps the trailing ".0" on whole readings
        write!(
            f,
            "{}{}: {:?} out of {}",
            self.kind, self.index, self.value, self.range
        )
    }
}

/// Checks every reading against the range for its kind.
///
/// Returns one issue per out-of-range value, temperatures first. Empty
/// sequences produce no issues; a missing reading is a count problem, not a
/// range problem.
#[must_use]
pub fn validate(readings: &Readings, ranges: &Ranges) -> Vec<ValidationIssue> {
    SensorKind::ALL
        .into_iter()
        .flat_map(move |kind| {
            let range = ranges.of(kind);
            readings
                .of(kind)
                .iter()
                .enumerate()
                .filter(move |(_, value)| !range.contains(**value))
                .map(move |(i, &value)| ValidationIssue {
                    kind,
                    index: i + 1,
                    value,
                    range,
                })
        })
        .collect()
}
