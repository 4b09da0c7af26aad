// Thermowatch Testdata - Fault injection
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Sensor faults injected into generated feeds.
//!
//! Each fault names the health state the classifier is expected to report
//! at its onset, so generated feeds double as labelled fixtures.

use serde::{Deserialize, Serialize};
use thermowatch::StateLabel;

/// Fault injection configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyConfig {
    /// Type of fault to inject.
    pub anomaly_type: AnomalyType,
    /// Sample index when the fault starts.
    pub start_sample: usize,
    /// Duration in samples (None = until end).
    pub duration_samples: Option<usize>,
}

impl AnomalyConfig {
    pub fn new(anomaly_type: AnomalyType, start_sample: usize) -> Self {
        Self {
            anomaly_type,
            start_sample,
            duration_samples: None,
        }
    }

    /// Set duration in samples.
    pub fn with_duration(mut self, samples: usize) -> Self {
        self.duration_samples = Some(samples);
        self
    }

    /// Check if the fault is active at a sample index.
    pub fn is_active(&self, sample_idx: usize) -> bool {
        if sample_idx < self.start_sample {
            return false;
        }
        match self.duration_samples {
            Some(duration) => sample_idx < self.start_sample + duration,
            None => true,
        }
    }

    pub fn samples_since_start(&self, sample_idx: usize) -> usize {
        sample_idx.saturating_sub(self.start_sample)
    }

    /// Last affected index (inclusive) in a feed of `num_samples`.
    pub fn end_sample(&self, num_samples: usize) -> usize {
        let end = match self.duration_samples {
            Some(duration) => self.start_sample + duration.max(1),
            None => num_samples,
        };
        end.min(num_samples).saturating_sub(1)
    }
}

/// Type of sensor fault.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AnomalyType {
    /// Single-sample jump, back to normal afterwards.
    Spike { magnitude: f64 },

    /// Constant offset added for the whole duration.
    BiasShift { offset: f64 },

    /// Offset growing by `rate_per_sample` each sample.
    Drift { rate_per_sample: f64 },

    /// Sensor silent; no value recorded.
    Dropout,

    /// Sensor repeats the value it had at onset.
    Stuck,

    /// Sensor reports exactly zero.
    ZeroReading,
}

impl AnomalyType {
    pub fn spike(magnitude: f64) -> Self {
        AnomalyType::Spike { magnitude }
    }

    pub fn bias_shift(offset: f64) -> Self {
        AnomalyType::BiasShift { offset }
    }

    pub fn drift(rate_per_sample: f64) -> Self {
        AnomalyType::Drift { rate_per_sample }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AnomalyType::Spike { .. } => "spike",
            AnomalyType::BiasShift { .. } => "bias_shift",
            AnomalyType::Drift { .. } => "drift",
            AnomalyType::Dropout => "dropout",
            AnomalyType::Stuck => "stuck",
            AnomalyType::ZeroReading => "zero_reading",
        }
    }

    /// State expected at the onset, given a magnitude that clears the
    /// default classifier constants. Gradual faults have no fixed label.
    pub fn expected_label(&self) -> Option<StateLabel> {
        match self {
            AnomalyType::Spike { .. } | AnomalyType::BiasShift { .. } => Some(StateLabel::Spike),
            AnomalyType::Dropout | AnomalyType::ZeroReading => Some(StateLabel::Invalid),
            AnomalyType::Drift { .. } | AnomalyType::Stuck => None,
        }
    }

    /// Whether every affected sample carries the expected label, not only
    /// the onset.
    pub fn labels_whole_duration(&self) -> bool {
        matches!(self, AnomalyType::Dropout | AnomalyType::ZeroReading)
    }
}

/// Per-fault state while it is active.
#[derive(Debug, Clone, Default)]
pub struct AnomalyState {
    /// Value at onset (for Stuck).
    pub last_value: Option<f64>,
    /// Accumulated drift.
    pub drift_accumulated: f64,
}

impl AnomalyState {
    /// Apply the fault to a value; `None` means no reading.
    pub fn apply(
        &mut self,
        anomaly: &AnomalyType,
        value: f64,
        samples_since_start: usize,
    ) -> Option<f64> {
        match anomaly {
            AnomalyType::Spike { magnitude } => {
                if samples_since_start == 0 {
                    Some(value + magnitude)
                } else {
                    Some(value)
                }
            }

            AnomalyType::BiasShift { offset } => Some(value + offset),

            AnomalyType::Drift { rate_per_sample } => {
                self.drift_accumulated += rate_per_sample;
                Some(value + self.drift_accumulated)
            }

            AnomalyType::Dropout => None,

            AnomalyType::Stuck => {
                if self.last_value.is_none() {
                    self.last_value = Some(value);
                }
                self.last_value
            }

            AnomalyType::ZeroReading => Some(0.0),
        }
    }
}
