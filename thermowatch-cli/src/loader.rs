// Thermowatch CLI - Feed loader
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! CSV feed loading.
//!
//! The time column accepts integer epoch milliseconds, RFC 3339, or
//! `YYYY-MM-DD HH:MM:SS[.fff]` read as UTC. An empty or `NaN` value cell is
//! a missing reading.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use std::path::Path;
use thermowatch::{validate_readings, InputError, Reading};
use tracing::{debug, info};

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Column selection.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    pub time_column: String,
    pub value_column: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            time_column: "Time".to_string(),
            value_column: "Temperature".to_string(),
        }
    }
}

/// Load errors.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Invalid timestamp '{value}' at line {line}")]
    InvalidTimestamp { line: u64, value: String },

    #[error("Invalid value '{value}' at line {line}")]
    InvalidValue { line: u64, value: String },

    #[error("Invalid feed: {0}")]
    Input(#[from] InputError),
}

/// Load and validate a feed.
pub fn load_csv(path: &Path, config: &LoaderConfig) -> Result<Vec<Reading>, LoadError> {
    if !path.exists() {
        return Err(LoadError::FileNotFound(path.display().to_string()));
    }

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| LoadError::MissingColumn(name.to_string()))
    };
    let time_idx = column(&config.time_column)?;
    let value_idx = column(&config.value_column)?;

    let mut readings = Vec::new();
    for result in reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();

        let raw_time = record.get(time_idx).unwrap_or_default();
        let timestamp_ms = parse_timestamp(raw_time).ok_or_else(|| LoadError::InvalidTimestamp {
            line,
            value: raw_time.to_string(),
        })?;

        let raw_value = record.get(value_idx).unwrap_or_default();
        let value = parse_value(raw_value).ok_or_else(|| LoadError::InvalidValue {
            line,
            value: raw_value.to_string(),
        })?;

        readings.push(Reading::from_option(timestamp_ms, value));
    }

    validate_readings(&readings)?;

    let missing = readings.iter().filter(|r| r.sample.is_missing()).count();
    info!(
        "Loaded {} readings ({} missing) from {}",
        readings.len(),
        missing,
        path.display()
    );
    if let (Some(first), Some(last)) = (readings.first(), readings.last()) {
        debug!("Feed spans {} ms", last.timestamp_ms - first.timestamp_ms);
    }

    Ok(readings)
}

/// Epoch milliseconds, RFC 3339, or a naive UTC date-time.
pub fn parse_timestamp(raw: &str) -> Option<u64> {
    if raw.is_empty() {
        return None;
    }
    if raw.bytes().all(|b| b.is_ascii_digit()) {
        return raw.parse().ok();
    }

    let millis = match DateTime::parse_from_rfc3339(raw) {
        Ok(time) => time.timestamp_millis(),
        Err(_) => {
            let naive = NAIVE_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())?;
            Utc.from_utc_datetime(&naive).timestamp_millis()
        }
    };
    u64::try_from(millis).ok()
}

/// `Some(None)` for a missing reading, `None` if unparseable.
pub fn parse_value(raw: &str) -> Option<Option<f64>> {
    if raw.is_empty() || raw.eq_ignore_ascii_case("nan") {
        return Some(None);
    }
    raw.parse::<f64>().ok().map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_csv(lines: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert_eq!(parse_timestamp("1706745600000"), Some(1_706_745_600_000));
        assert_eq!(
            parse_timestamp("2024-02-01T00:00:00Z"),
            Some(1_706_745_600_000)
        );
        assert_eq!(
            parse_timestamp("2024-02-01T01:00:00+01:00"),
            Some(1_706_745_600_000)
        );
        assert_eq!(
            parse_timestamp("2024-02-01 00:05:00"),
            Some(1_706_745_900_000)
        );
        assert_eq!(
            parse_timestamp("2024-02-01 00:05:00.250"),
            Some(1_706_745_900_250)
        );
        assert_eq!(parse_timestamp("1969-12-31 23:59:59"), None);
        assert_eq!(parse_timestamp("soon"), None);
        assert_eq!(parse_timestamp(""), None);
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("21.5"), Some(Some(21.5)));
        assert_eq!(parse_value("0"), Some(Some(0.0)));
        assert_eq!(parse_value(""), Some(None));
        assert_eq!(parse_value("NaN"), Some(None));
        assert_eq!(parse_value("warm"), None);
    }

    #[test]
    fn test_load_csv() {
        let file = create_csv(&[
            "Time,Temperature,Humidity",
            "2024-02-01 00:00:00,21.0,40",
            "2024-02-01 00:05:00,,41",
            "2024-02-01 00:10:00, 21.4 ,42",
        ]);

        let readings = load_csv(file.path(), &LoaderConfig::default()).unwrap();
        assert_eq!(readings.len(), 3);
        assert!(readings[1].sample.is_missing());
        assert_eq!(readings[2].sample.value(), Some(21.4));
        assert_eq!(readings[2].timestamp_ms - readings[0].timestamp_ms, 600_000);
    }

    #[test]
    fn test_custom_columns() {
        let file = create_csv(&["ts,probe", "1000,20.0", "2000,20.5"]);
        let config = LoaderConfig {
            time_column: "ts".to_string(),
            value_column: "probe".to_string(),
        };

        let readings = load_csv(file.path(), &config).unwrap();
        assert_eq!(readings[1].timestamp_ms, 2000);
    }

    #[test]
    fn test_rejects_malformed_input() {
        let config = LoaderConfig::default();

        let missing_column = create_csv(&["Time,Humidity", "1000,40"]);
        assert!(matches!(
            load_csv(missing_column.path(), &config),
            Err(LoadError::MissingColumn(c)) if c == "Temperature"
        ));

        let bad_time = create_csv(&["Time,Temperature", "1000,20.0", "later,20.1"]);
        assert!(matches!(
            load_csv(bad_time.path(), &config),
            Err(LoadError::InvalidTimestamp { line: 3, .. })
        ));

        let bad_value = create_csv(&["Time,Temperature", "1000,hot"]);
        assert!(matches!(
            load_csv(bad_value.path(), &config),
            Err(LoadError::InvalidValue { line: 2, .. })
        ));

        let unordered = create_csv(&["Time,Temperature", "2000,20.0", "1000,20.1"]);
        assert!(matches!(
            load_csv(unordered.path(), &config),
            Err(LoadError::Input(InputError::NonMonotonic { index: 1, .. }))
        ));

        let empty = create_csv(&["Time,Temperature"]);
        assert!(matches!(
            load_csv(empty.path(), &config),
            Err(LoadError::Input(InputError::Empty))
        ));

        assert!(matches!(
            load_csv(Path::new("/nonexistent/feed.csv"), &config),
            Err(LoadError::FileNotFound(_))
        ));
    }
}
