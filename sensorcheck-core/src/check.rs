//! The health-check pipeline
//!
//! Connect, run `sensors -j`, parse, flatten, then decide: raw output, sensor
//! count, range validation. The result is an [`Outcome`] computed once and
//! mapped to an exit status by the caller.

use std::io::Write;

use tracing::Instrument;

use crate::error::{CheckError, CheckResult};
use crate::remote::{RemoteExecutor, SENSORS_COMMAND};
use crate::sensors::{
    Flattened, Ranges, Readings, SensorDocument, SensorKind, ValidationIssue, flatten, validate,
};

/// Exit codes for check outcomes
pub mod exit_codes {
    /// All sensors present and in range, or raw output written
    pub const SUCCESS: i32 = 0;
    /// Unhandled failure (configuration, connection, remote execution)
    pub const FAILURE: i32 = 1;
    /// Fewer sensors than expected
    pub const MISSING_SENSORS: i32 = 1;
    /// At least one reading out of range
    pub const OUT_OF_RANGE: i32 = 2;
    /// Remote output is not a valid sensor document
    pub const BAD_DATA: i32 = 3;
}

/// Default number of expected sensors (temperature + humidity)
pub const DEFAULT_EXPECTED_SENSORS: usize = 3;

/// Policy for one check run
#[derive(Debug, Clone, PartialEq)]
pub struct CheckConfig {
    /// Minimum total number of readings
    pub expected_sensors: usize,
    /// Accepted range per kind
    pub ranges: Ranges,
    /// Emit the readings as JSON and skip all checks
    pub raw_json_output: bool,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            expected_sensors: DEFAULT_EXPECTED_SENSORS,
            ranges: Ranges::default(),
            raw_json_output: false,
        }
    }
}

/// How a check run ended
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Enough sensors, all in range
    Success,
    /// Raw JSON written, no checks applied
    RawOutput,
    /// Fewer readings than expected
    MissingSensors {
        /// Configured minimum
        expected: usize,
        /// Readings found
        found: usize,
    },
    /// Readings outside their configured range
    OutOfRange(Vec<ValidationIssue>),
    /// Remote output could not be parsed
    BadData(String),
    /// Any other fatal error
    Failure(String),
}

impl Outcome {
    /// Returns the process exit code for this outcome
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Success | Self::RawOutput => exit_codes::SUCCESS,
            Self::MissingSensors { .. } => exit_codes::MISSING_SENSORS,
            Self::OutOfRange(_) => exit_codes::OUT_OF_RANGE,
            Self::BadData(_) => exit_codes::BAD_DATA,
            Self::Failure(_) => exit_codes::FAILURE,
        }
    }

    /// One-line diagnostic for fatal outcomes, meant for stderr
    #[must_use]
    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            Self::BadData(msg) | Self::Failure(msg) => Some(msg),
            _ => None,
        }
    }
}

impl From<CheckError> for Outcome {
    fn from(err: CheckError) -> Self {
        match err {
            CheckError::Parse(e) => Self::BadData(e.to_string()),
            other => Self::Failure(format!("Failed to get sensor data: {other}")),
        }
    }
}

/// Runs the sensors command and flattens its output.
///
/// # Errors
///
/// Returns [`CheckError::Exec`] when the remote command could not be run and
/// [`CheckError::Parse`] when its output is not a sensor document.
pub async fn acquire_readings(executor: &dyn RemoteExecutor) -> CheckResult<Flattened> {
    let output = executor.exec(SENSORS_COMMAND).await?;
    let document = SensorDocument::parse(&output.stdout)?;
    tracing::debug!(chips = document.len(), "Parsed sensor document");
    Ok(flatten(&document))
}

/// Applies the decision order to acquired readings and writes the report.
///
/// # Errors
///
/// Returns an error only if writing to `out` fails.
pub fn report<W: Write>(
    readings: &Readings,
    config: &CheckConfig,
    out: &mut W,
) -> std::io::Result<Outcome> {
    if config.raw_json_output {
        let json = serde_json::to_string(readings)?;
        writeln!(out, "{json}")?;
        return Ok(Outcome::RawOutput);
    }

    let total = readings.total();
    writeln!(
        out,
        "Found {} temp sensors and {} humidity sensors (total {total})",
        readings.temp.len(),
        readings.hum.len()
    )?;
    writeln!(out, "Temperature values: {:?}", readings.temp)?;
    writeln!(out, "Humidity values:    {:?}", readings.hum)?;

    if total < config.expected_sensors {
        writeln!(
            out,
            "Missing sensors: expected {}, found {total}",
            config.expected_sensors
        )?;
        return Ok(Outcome::MissingSensors {
            expected: config.expected_sensors,
            found: total,
        });
    }

    for kind in SensorKind::ALL {
        let range = config.ranges.of(kind);
        if range.is_inverted() {
            tracing::warn!(%range, "{kind} range is inverted; every {kind} reading will fail");
        }
    }

    let issues = validate(readings, &config.ranges);
    if !issues.is_empty() {
        writeln!(out, "ISSUES:")?;
        for issue in &issues {
            writeln!(out, "- {issue}")?;
        }
        return Ok(Outcome::OutOfRange(issues));
    }

    writeln!(out, "All sensors within range")?;
    Ok(Outcome::Success)
}

/// Runs the whole check against `executor`, writing the report to `out`.
///
/// Never fails: errors become [`Outcome::BadData`] or [`Outcome::Failure`].
pub async fn run_check<W: Write>(
    executor: &dyn RemoteExecutor,
    config: &CheckConfig,
    out: &mut W,
) -> Outcome {
    let span = tracing::info_span!("check.run", expected = config.expected_sensors);

    let flattened = match acquire_readings(executor).instrument(span.clone()).await {
        Ok(flattened) => flattened,
        Err(e) => {
            tracing::debug!(error = %e, "Check aborted");
            return Outcome::from(e);
        }
    };

    let _enter = span.enter();
    for warning in &flattened.warnings {
        tracing::warn!("{warning}");
    }

    let outcome = report(&flattened.readings, config, out)
        .unwrap_or_else(|e| Outcome::Failure(format!("Failed to write report: {e}")));
    tracing::info!(exit_code = outcome.exit_code(), "Check finished");
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExecError;
    use crate::remote::RemoteOutput;
    use crate::sensors::Range;
    use async_trait::async_trait;

    const SAMPLE_JSON: &str = r#"{"coretemp-isa-0000": {"temp1_input": 25000, "temp2_input": 26000, "humidity1_input": 45000}}"#;

    /// Returns canned output, or fails like an unreachable host
    struct FakeExecutor {
        stdout: Option<&'static str>,
    }

    impl FakeExecutor {
        const fn returning(stdout: &'static str) -> Self {
            Self {
                stdout: Some(stdout),
            }
        }

        const fn unreachable() -> Self {
            Self { stdout: None }
        }
    }

    #[async_trait]
    impl RemoteExecutor for FakeExecutor {
        async fn exec(&self, command: &str) -> Result<RemoteOutput, ExecError> {
            assert_eq!(command, SENSORS_COMMAND);
            self.stdout.map(RemoteOutput::stdout_only).ok_or_else(|| {
                ExecError::Connection("ssh: connect to host: Connection refused".into())
            })
        }
    }

    async fn run(executor: &FakeExecutor, config: &CheckConfig) -> (Outcome, String) {
        let mut out = Vec::new();
        let outcome = run_check(executor, config, &mut out).await;
        (outcome, String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn test_success() {
        let executor = FakeExecutor::returning(SAMPLE_JSON);
        let (outcome, out) = run(&executor, &CheckConfig::default()).await;
        assert_eq!(outcome, Outcome::Success);
        assert_eq!(outcome.exit_code(), 0);
        assert!(out.contains("Found 2 temp sensors and 1 humidity sensors (total 3)"));
        assert!(out.contains("Temperature values: [25.0, 26.0]"));
        assert!(out.contains("Humidity values:    [45.0]"));
        assert!(out.ends_with("All sensors within range\n"));
    }

    #[tokio::test]
    async fn test_missing_sensors() {
        let config = CheckConfig {
            expected_sensors: 4,
            ..CheckConfig::default()
        };
        let (outcome, out) = run(&FakeExecutor::returning(SAMPLE_JSON), &config).await;
        assert_eq!(
            outcome,
            Outcome::MissingSensors {
                expected: 4,
                found: 3
            }
        );
        assert_eq!(outcome.exit_code(), 1);
        assert!(out.contains("Missing sensors: expected 4, found 3"));
    }

    #[tokio::test]
    async fn test_out_of_range() {
        let executor = FakeExecutor::returning(
            r#"{"chip0": {"temp1_input": -30000, "humidity1_input": 150000}}"#,
        );
        let config = CheckConfig {
            expected_sensors: 2,
            ..CheckConfig::default()
        };
        let (outcome, out) = run(&executor, &config).await;
        assert_eq!(outcome.exit_code(), 2);
        assert!(out.contains("ISSUES:\n"));
        assert!(out.contains("- temp1: -30.0 out of -20..80\n"));
        assert!(out.contains("- hum1: 150.0 out of 0..100\n"));
    }

    #[tokio::test]
    async fn test_missing_sensors_takes_priority_over_range() {
        let executor = FakeExecutor::returning(r#"{"chip0": {"temp1_input": -30000}}"#);
        let (outcome, out) = run(&executor, &CheckConfig::default()).await;
        assert_eq!(outcome.exit_code(), 1);
        assert!(!out.contains("ISSUES"));
    }

    #[tokio::test]
    async fn test_bad_data() {
        let executor = FakeExecutor::returning("{invalid}");
        let (outcome, out) = run(&executor, &CheckConfig::default()).await;
        assert!(matches!(outcome, Outcome::BadData(_)));
        assert_eq!(outcome.exit_code(), 3);
        assert!(outcome.diagnostic().is_some());
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_wrong_shape_is_bad_data() {
        let executor = FakeExecutor::returning(r#"{"chip": 5}"#);
        let (outcome, _) = run(&executor, &CheckConfig::default()).await;
        assert_eq!(outcome.exit_code(), 3);

        let (outcome, _) = run(&FakeExecutor::returning(""), &CheckConfig::default()).await;
        assert_eq!(outcome.exit_code(), 3);
    }

    #[tokio::test]
    async fn test_connection_failure() {
        let (outcome, out) = run(&FakeExecutor::unreachable(), &CheckConfig::default()).await;
        assert!(matches!(outcome, Outcome::Failure(_)));
        assert_eq!(outcome.exit_code(), 1);
        assert!(outcome.diagnostic().unwrap().contains("Connection refused"));
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_raw_json_output() {
        let config = CheckConfig {
            raw_json_output: true,
            // Ignored in raw mode
            expected_sensors: 10,
            ..CheckConfig::default()
        };
        let (outcome, out) = run(&FakeExecutor::returning(SAMPLE_JSON), &config).await;
        assert_eq!(outcome, Outcome::RawOutput);
        assert_eq!(outcome.exit_code(), 0);

        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"temp": [25.0, 26.0], "hum": [45.0]})
        );
        assert_eq!(out.lines().count(), 1);
    }

    #[tokio::test]
    async fn test_inverted_range_fails_every_reading() {
        let config = CheckConfig {
            ranges: Ranges {
                temp: Range::new(80.0, -20.0),
                ..Ranges::default()
            },
            ..CheckConfig::default()
        };
        let (outcome, _) = run(&FakeExecutor::returning(SAMPLE_JSON), &config).await;
        match outcome {
            Outcome::OutOfRange(issues) => {
                assert_eq!(issues.len(), 2);
                assert!(issues.iter().all(|i| i.kind.label() == "temp"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_numeric_fields_are_dropped() {
        let executor = FakeExecutor::returning(
            r#"{"chip1": {"temp1_input": "not_a_number", "humidity1_input": 50000}}"#,
        );
        let config = CheckConfig {
            expected_sensors: 1,
            ..CheckConfig::default()
        };
        let (outcome, out) = run(&executor, &config).await;
        assert_eq!(outcome, Outcome::Success);
        assert!(out.contains("Found 0 temp sensors and 1 humidity sensors (total 1)"));
    }
}
