// Thermowatch Testdata - Fault scenarios
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Ready-made feeds for exercising the classifier.
//!
//! Every scenario uses the same indoor sensor: a 19-23 °C daily cycle with
//! light noise. Faults are placed relative to the feed length and recorded
//! in the feed metadata.

use crate::anomalies::{AnomalyConfig, AnomalyType};
use crate::feed::{Feed, FeedError};
use crate::generator::{generate_feed, GeneratorConfig, SensorConfig};
use crate::patterns::SignalPattern;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named fault scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    /// No faults.
    Nominal,
    /// Single-sample jumps up and down.
    Spike,
    /// Slow drift followed by a bias step.
    Drift,
    /// Silent stretches and zero readings.
    Dropout,
    /// All of the above, spread over the feed.
    Mixed,
}

impl Scenario {
    pub const ALL: [Scenario; 5] = [
        Scenario::Nominal,
        Scenario::Spike,
        Scenario::Drift,
        Scenario::Dropout,
        Scenario::Mixed,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Scenario::Nominal => "nominal",
            Scenario::Spike => "spike",
            Scenario::Drift => "drift",
            Scenario::Dropout => "dropout",
            Scenario::Mixed => "mixed",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Scenario::Nominal => "Healthy sensor following its daily cycle",
            Scenario::Spike => "Isolated jumps of +8 and -7 degrees",
            Scenario::Drift => "Calibration drift, then a +5 degree bias step",
            Scenario::Dropout => "Silent stretches and zero readings",
            Scenario::Mixed => "Spikes, drift, dropouts and a stuck sensor",
        }
    }

    /// Faults for a feed of `num_samples`.
    pub fn anomalies(&self, num_samples: usize) -> Vec<AnomalyConfig> {
        let at = |fraction: f64| (num_samples as f64 * fraction) as usize;

        match self {
            Scenario::Nominal => Vec::new(),
            Scenario::Spike => vec![
                AnomalyConfig::new(AnomalyType::spike(8.0), at(0.4)).with_duration(1),
                AnomalyConfig::new(AnomalyType::spike(-7.0), at(0.7)).with_duration(1),
            ],
            Scenario::Drift => vec![
                AnomalyConfig::new(AnomalyType::drift(0.02), at(0.3)).with_duration(at(0.3)),
                AnomalyConfig::new(AnomalyType::bias_shift(5.0), at(0.75)),
            ],
            Scenario::Dropout => vec![
                AnomalyConfig::new(AnomalyType::Dropout, at(0.25)).with_duration(6),
                AnomalyConfig::new(AnomalyType::ZeroReading, at(0.6)).with_duration(3),
                AnomalyConfig::new(AnomalyType::Dropout, at(0.8)).with_duration(1),
            ],
            Scenario::Mixed => vec![
                AnomalyConfig::new(AnomalyType::spike(9.0), at(0.15)).with_duration(1),
                AnomalyConfig::new(AnomalyType::Dropout, at(0.3)).with_duration(4),
                AnomalyConfig::new(AnomalyType::drift(0.03), at(0.45)).with_duration(at(0.15)),
                AnomalyConfig::new(AnomalyType::Stuck, at(0.65)).with_duration(at(0.1)),
                AnomalyConfig::new(AnomalyType::ZeroReading, at(0.85)).with_duration(2),
            ],
        }
    }

    /// Sensor for a feed of `num_samples`.
    pub fn sensor(&self, num_samples: usize) -> SensorConfig {
        let base = SensorConfig::new(
            self.name(),
            5.0,
            40.0,
            SignalPattern::temperature_diurnal(19.0, 23.0),
        )
        .with_noise(0.05);

        self.anomalies(num_samples)
            .into_iter()
            .fold(base, SensorConfig::with_anomaly)
    }

    /// Generate the scenario feed.
    pub fn generate(&self, config: &GeneratorConfig) -> Feed {
        generate_feed(config, &self.sensor(config.num_samples)).with_name(self.name())
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scenario {
    type Err = FeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|scenario| scenario.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| FeedError::UnknownScenario(s.to_string()))
    }
}
