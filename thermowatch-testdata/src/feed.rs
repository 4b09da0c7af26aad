// Thermowatch Testdata - Feed structures
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Generated feeds and their CSV/JSON I/O.
//!
//! The CSV layout is the one the analyzer reads by default: a `Time` column
//! formatted `YYYY-MM-DD HH:MM:SS` (UTC) and a `Temperature` column, empty
//! when the sensor was silent.

use chrono::{NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use thermowatch::{Reading, StateLabel};
use thiserror::Error;

/// Time column header.
pub const TIME_COLUMN: &str = "Time";
/// Value column header.
pub const VALUE_COLUMN: &str = "Temperature";
/// Format of the time column.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Feed error types.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parse error at line {line}: {message}")]
    CsvParse { line: usize, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Timestamp out of range: {0}")]
    TimestampOutOfRange(u64),

    #[error("Unknown scenario: {0}")]
    UnknownScenario(String),

    #[error("Empty feed")]
    Empty,
}

/// One generated sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeedSample {
    pub timestamp_ms: u64,
    /// `None` when the sensor was silent.
    pub value: Option<f64>,
}

/// Where a fault was injected and what it should produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InjectedAnomaly {
    /// Fault name, see [`AnomalyType::name`](crate::AnomalyType::name).
    pub kind: String,
    pub start_index: usize,
    /// Inclusive.
    pub end_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_label: Option<StateLabel>,
    /// The expected label holds on every affected index, not only the onset.
    #[serde(default)]
    pub labels_whole_duration: bool,
}

impl InjectedAnomaly {
    /// Indices that must carry `expected_label`.
    pub fn labelled_indices(&self) -> std::ops::RangeInclusive<usize> {
        if self.labels_whole_duration {
            self.start_index..=self.end_index
        } else {
            self.start_index..=self.start_index
        }
    }
}

/// Feed metadata, written alongside the CSV as a manifest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub sensor_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_interval_ms: Option<u64>,
    #[serde(default)]
    pub anomalies: Vec<InjectedAnomaly>,
}

/// A single-sensor temperature feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feed {
    pub samples: Vec<FeedSample>,
    #[serde(default)]
    pub metadata: FeedMetadata,
}

impl Feed {
    pub fn new(sensor_id: &str) -> Self {
        Self {
            samples: Vec::new(),
            metadata: FeedMetadata {
                sensor_id: sensor_id.to_string(),
                ..Default::default()
            },
        }
    }

    pub fn push(&mut self, timestamp_ms: u64, value: Option<f64>) {
        self.samples.push(FeedSample {
            timestamp_ms,
            value,
        });
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn values(&self) -> Vec<Option<f64>> {
        self.samples.iter().map(|s| s.value).collect()
    }

    pub fn timestamps(&self) -> Vec<u64> {
        self.samples.iter().map(|s| s.timestamp_ms).collect()
    }

    pub fn duration_ms(&self) -> u64 {
        match (self.samples.first(), self.samples.last()) {
            (Some(first), Some(last)) => last.timestamp_ms.saturating_sub(first.timestamp_ms),
            _ => 0,
        }
    }

    /// Set name.
    pub fn with_name(mut self, name: &str) -> Self {
        self.metadata.name = Some(name.to_string());
        self
    }

    /// Readings for the analysis pipeline.
    pub fn to_readings(&self) -> Vec<Reading> {
        self.samples
            .iter()
            .map(|s| Reading::from_option(s.timestamp_ms, s.value))
            .collect()
    }

    /// Export to CSV file.
    pub fn to_csv(&self, path: impl AsRef<Path>) -> Result<(), FeedError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        writeln!(writer, "{},{}", TIME_COLUMN, VALUE_COLUMN)?;

        for sample in &self.samples {
            let time = Utc
                .timestamp_millis_opt(sample.timestamp_ms as i64)
                .single()
                .ok_or(FeedError::TimestampOutOfRange(sample.timestamp_ms))?;
            write!(writer, "{}", time.format(TIME_FORMAT))?;
            match sample.value {
                Some(v) => writeln!(writer, ",{:.6}", v)?,
                None => writeln!(writer, ",")?,
            }
        }

        writer.flush()?;
        Ok(())
    }

    /// Import from CSV file. Sub-second precision is not preserved.
    pub fn from_csv(path: impl AsRef<Path>) -> Result<Self, FeedError> {
        let file = File::open(&path)?;
        let reader = BufReader::new(file);
        let mut lines = reader.lines();

        let header = lines.next().ok_or(FeedError::Empty)??;
        let columns: Vec<&str> = header.split(',').map(str::trim).collect();
        let column = |name: &str| {
            columns
                .iter()
                .position(|c| *c == name)
                .ok_or_else(|| FeedError::MissingColumn(name.to_string()))
        };
        let time_idx = column(TIME_COLUMN)?;
        let value_idx = column(VALUE_COLUMN)?;

        let sensor_id = path
            .as_ref()
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(VALUE_COLUMN);
        let mut feed = Feed::new(sensor_id);

        for (line_num, line_result) in lines.enumerate() {
            let line = line_result?;
            if line.trim().is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            let line = line_num + 2;

            let raw_time = fields.get(time_idx).copied().unwrap_or_default();
            let timestamp_ms = parse_time(raw_time).ok_or_else(|| FeedError::CsvParse {
                line,
                message: format!("Invalid timestamp '{}'", raw_time),
            })?;

            let raw_value = fields.get(value_idx).copied().unwrap_or_default();
            let value = if raw_value.is_empty() || raw_value.eq_ignore_ascii_case("nan") {
                None
            } else {
                Some(raw_value.parse().map_err(|_| FeedError::CsvParse {
                    line,
                    message: format!("Invalid value '{}'", raw_value),
                })?)
            };

            feed.push(timestamp_ms, value);
        }

        if feed.is_empty() {
            return Err(FeedError::Empty);
        }
        Ok(feed)
    }

    /// Write the metadata as a pretty JSON manifest.
    pub fn write_manifest(&self, path: impl AsRef<Path>) -> Result<(), FeedError> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &self.metadata)?;
        Ok(())
    }

    /// Read a manifest written by [`write_manifest`](Self::write_manifest).
    pub fn read_manifest(path: impl AsRef<Path>) -> Result<FeedMetadata, FeedError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}

fn parse_time(raw: &str) -> Option<u64> {
    let naive = NaiveDateTime::parse_from_str(raw, TIME_FORMAT).ok()?;
    u64::try_from(Utc.from_utc_datetime(&naive).timestamp_millis()).ok()
}
