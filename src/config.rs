// Thermowatch - Temperature feed health classification
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Pipeline configuration.

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};

/// Master configuration for the analysis pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Rolling statistics settings.
    #[serde(default)]
    pub rolling: RollingConfig,

    /// Adaptive threshold settings.
    #[serde(default)]
    pub threshold: ThresholdConfig,

    /// State classifier settings.
    #[serde(default)]
    pub classifier: ClassifierConfig,
}

impl PipelineConfig {
    /// Parse from JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to pretty JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every window and constant.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        self.rolling.validate()?;
        self.threshold.validate()?;
        self.classifier.validate()
    }
}

/// Rolling statistics configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RollingConfig {
    /// Trailing window size in samples (W1).
    pub window: usize,
}

impl Default for RollingConfig {
    fn default() -> Self {
        Self {
            window: 12, // 1 hour at 5-minute sampling
        }
    }
}

impl RollingConfig {
    /// Derive the window from a wall-clock duration and the sampling interval.
    ///
    /// The window is defined in samples, so irregular sampling changes the
    /// duration it actually covers.
    pub fn from_duration(
        window_ms: u64,
        sample_interval_ms: u64,
    ) -> std::result::Result<Self, ConfigError> {
        if sample_interval_ms == 0 || window_ms < sample_interval_ms {
            return Err(ConfigError::InvalidDuration {
                window_ms,
                sample_interval_ms,
            });
        }
        Ok(Self {
            window: (window_ms / sample_interval_ms) as usize,
        })
    }

    fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.window == 0 {
            return Err(ConfigError::ZeroWindow { name: "rolling" });
        }
        Ok(())
    }
}

/// Adaptive threshold configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    /// Trailing window over the deviation series (W2).
    pub window: usize,

    /// Standard deviations added to the windowed mean.
    pub sigma_multiplier: f64,

    /// Threshold used by the classifier where the adaptive one is undefined.
    pub fallback: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            window: 6,
            sigma_multiplier: 2.0,
            fallback: 3.0,
        }
    }
}

impl ThresholdConfig {
    fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.window == 0 {
            return Err(ConfigError::ZeroWindow { name: "threshold" });
        }
        check_constant("sigma_multiplier", self.sigma_multiplier)?;
        check_constant("fallback", self.fallback)
    }
}

/// How an exactly-zero present reading is treated by the classifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroPolicy {
    /// A reading of exactly 0 is flagged Invalid, like a missing one.
    #[default]
    Invalid,
    /// A reading of exactly 0 is a legitimate value and is classified normally.
    Reading,
}

/// State classifier configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// |second difference| must exceed this for a Spike.
    pub spike_second_diff: f64,

    /// |first difference| must exceed this for a Spike or Critical.
    pub rate_of_change: f64,

    /// Inclusive deviation band `[low, high]` flagged as Warning.
    pub warning_band: [f64; 2],

    /// Treatment of true zero readings.
    pub zero_policy: ZeroPolicy,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            spike_second_diff: 0.75,
            rate_of_change: 0.5,
            warning_band: [1.5, 3.0],
            zero_policy: ZeroPolicy::Invalid,
        }
    }
}

impl ClassifierConfig {
    fn validate(&self) -> std::result::Result<(), ConfigError> {
        check_constant("spike_second_diff", self.spike_second_diff)?;
        check_constant("rate_of_change", self.rate_of_change)?;
        let [low, high] = self.warning_band;
        check_constant("warning_band.low", low)?;
        check_constant("warning_band.high", high)?;
        if low > high {
            return Err(ConfigError::InvertedBand { low, high });
        }
        Ok(())
    }
}

fn check_constant(name: &'static str, value: f64) -> std::result::Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::InvalidConstant { name, value });
    }
    Ok(())
}
