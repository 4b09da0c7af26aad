// Thermowatch - Temperature feed health classification
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Readings as handed over by a feed loader.

use crate::error::InputError;
use serde::{Deserialize, Serialize};

/// A single sensor sample, explicitly tagged when absent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Sample {
    /// The sensor reported a value.
    Present(f64),
    /// The sensor was silent.
    Missing,
}

impl Sample {
    /// Value if present.
    pub fn value(&self) -> Option<f64> {
        match self {
            Sample::Present(v) => Some(*v),
            Sample::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Sample::Missing)
    }
}

impl From<Option<f64>> for Sample {
    fn from(value: Option<f64>) -> Self {
        match value {
            Some(v) => Sample::Present(v),
            None => Sample::Missing,
        }
    }
}

/// A timestamped reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Timestamp in milliseconds (UTC epoch).
    pub timestamp_ms: u64,
    /// Reported sample.
    pub sample: Sample,
}

impl Reading {
    pub fn new(timestamp_ms: u64, value: f64) -> Self {
        Self {
            timestamp_ms,
            sample: Sample::Present(value),
        }
    }

    pub fn missing(timestamp_ms: u64) -> Self {
        Self {
            timestamp_ms,
            sample: Sample::Missing,
        }
    }

    /// Build from an optional value.
    pub fn from_option(timestamp_ms: u64, value: Option<f64>) -> Self {
        Self {
            timestamp_ms,
            sample: value.into(),
        }
    }

    /// Build from a UTC datetime.
    #[cfg(feature = "timestamps")]
    pub fn at(time: chrono::DateTime<chrono::Utc>, value: Option<f64>) -> Self {
        Self::from_option(time.timestamp_millis().max(0) as u64, value)
    }

    /// Timestamp as a UTC datetime.
    #[cfg(feature = "timestamps")]
    pub fn datetime(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        chrono::DateTime::from_timestamp_millis(self.timestamp_ms as i64)
    }
}

/// Build readings from bare values, using the index as timestamp.
pub fn readings_from_values(values: &[Option<f64>]) -> Vec<Reading> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| Reading::from_option(i as u64, *v))
        .collect()
}

/// Check that a feed is non-empty, strictly increasing in time and finite.
///
/// The pipeline assumes a well-formed feed; loaders call this before
/// handing readings over.
pub fn validate_readings(readings: &[Reading]) -> Result<(), InputError> {
    if readings.is_empty() {
        return Err(InputError::Empty);
    }

    for (index, reading) in readings.iter().enumerate() {
        if let Sample::Present(v) = reading.sample {
            if !v.is_finite() {
                return Err(InputError::NonFinite { index });
            }
        }

        if index > 0 {
            let previous_ms = readings[index - 1].timestamp_ms;
            if reading.timestamp_ms <= previous_ms {
                return Err(InputError::NonMonotonic {
                    index,
                    previous_ms,
                    current_ms: reading.timestamp_ms,
                });
            }
        }
    }

    Ok(())
}
