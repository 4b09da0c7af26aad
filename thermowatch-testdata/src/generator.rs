// Thermowatch Testdata - Core generator
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Feed generation.

use crate::anomalies::{AnomalyConfig, AnomalyState};
use crate::feed::{Feed, InjectedAnomaly};
use crate::patterns::{gaussian, PatternState, SignalPattern};
use rand::prelude::*;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// Generator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Start timestamp in milliseconds.
    pub start_time_ms: u64,
    /// Interval between samples in milliseconds.
    pub sample_interval_ms: u64,
    /// Number of samples to generate.
    pub num_samples: usize,
    /// Random seed for reproducibility.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            start_time_ms: 1706745600000, // 2024-02-01 00:00:00 UTC
            sample_interval_ms: 300_000,  // 5 minutes
            num_samples: 288,             // 1 day
            seed: None,
        }
    }
}

impl GeneratorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set start timestamp.
    pub fn with_start_time(mut self, timestamp_ms: u64) -> Self {
        self.start_time_ms = timestamp_ms;
        self
    }

    /// Set sample interval in seconds.
    pub fn with_sample_interval_secs(mut self, secs: u64) -> Self {
        self.sample_interval_ms = secs * 1000;
        self
    }

    /// Set number of samples.
    pub fn with_num_samples(mut self, n: usize) -> Self {
        self.num_samples = n;
        self
    }

    /// Set duration in hours (calculates num_samples from interval).
    pub fn with_duration_hours(mut self, hours: f64) -> Self {
        let total_ms = hours * 3_600_000.0;
        self.num_samples = (total_ms / self.sample_interval_ms.max(1) as f64).ceil() as usize;
        self
    }

    /// Set random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Get total duration in milliseconds.
    pub fn duration_ms(&self) -> u64 {
        self.sample_interval_ms * (self.num_samples.saturating_sub(1)) as u64
    }
}

/// A simulated temperature sensor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorConfig {
    /// Sensor identifier.
    pub id: String,
    /// Lower bound of the physical range.
    pub min: f64,
    /// Upper bound of the physical range.
    pub max: f64,
    /// Signal pattern.
    pub pattern: SignalPattern,
    /// Standard deviation of added noise.
    pub noise_std: f64,
    /// Faults, applied in order.
    #[serde(default)]
    pub anomalies: Vec<AnomalyConfig>,
}

impl SensorConfig {
    pub fn new(id: &str, min: f64, max: f64, pattern: SignalPattern) -> Self {
        Self {
            id: id.to_string(),
            min,
            max,
            pattern,
            noise_std: 0.0,
            anomalies: Vec::new(),
        }
    }

    /// Add noise to the sensor.
    pub fn with_noise(mut self, std: f64) -> Self {
        self.noise_std = std;
        self
    }

    /// Add a fault.
    pub fn with_anomaly(mut self, anomaly: AnomalyConfig) -> Self {
        self.anomalies.push(anomaly);
        self
    }
}

/// Generate a single-sensor feed.
///
/// Noise and the pattern are clamped to the sensor range before faults are
/// applied, so injected faults may leave the range.
pub fn generate_feed(config: &GeneratorConfig, sensor: &SensorConfig) -> Feed {
    let mut rng = match config.seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };

    let mut feed = Feed::new(&sensor.id);
    feed.metadata.seed = config.seed;
    feed.metadata.sample_interval_ms = Some(config.sample_interval_ms);
    feed.metadata.anomalies = sensor
        .anomalies
        .iter()
        .filter(|a| a.start_sample < config.num_samples)
        .map(|a| InjectedAnomaly {
            kind: a.anomaly_type.name().to_string(),
            start_index: a.start_sample,
            end_index: a.end_sample(config.num_samples),
            expected_label: a.anomaly_type.expected_label(),
            labels_whole_duration: a.anomaly_type.labels_whole_duration(),
        })
        .collect();

    let mut pattern_state = PatternState::default();
    let mut anomaly_states = vec![AnomalyState::default(); sensor.anomalies.len()];

    for i in 0..config.num_samples {
        let relative_time = i as u64 * config.sample_interval_ms;
        let timestamp = config.start_time_ms + relative_time;

        let mut value = pattern_state.evaluate(&sensor.pattern, relative_time, &mut rng);
        if sensor.noise_std > 0.0 {
            value += gaussian(&mut rng, 0.0, sensor.noise_std);
        }
        let mut value = Some(value.clamp(sensor.min, sensor.max));

        for (anomaly, state) in sensor.anomalies.iter().zip(anomaly_states.iter_mut()) {
            if !anomaly.is_active(i) {
                continue;
            }
            value = value.and_then(|v| {
                state.apply(&anomaly.anomaly_type, v, anomaly.samples_since_start(i))
            });
        }

        feed.push(timestamp, value);
    }

    feed
}
