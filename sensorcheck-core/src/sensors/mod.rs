//! Sensor data handling: parsing, flattening and range validation
//!
//! The pipeline is pure: text in, readings and issues out. Diagnostics are
//! returned as data so callers decide where they go.

mod document;
pub mod emulator;
mod flatten;
mod validate;

pub use document::SensorDocument;
pub use emulator::{EmulatorSettings, emulate};
pub use flatten::{DataQualityWarning, Flattened, Readings, SensorKind, flatten};
pub use validate::{Range, Ranges, ValidationIssue, validate};
