// Thermowatch - Temperature feed health classification
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! State classification module
//!
//! This module assigns one of five health states to each reading from the
//! aligned derived series at that index. Rules are evaluated in a fixed
//! priority order and the first match wins:
//!
//! 1. Invalid  - missing reading, or a true zero under [`ZeroPolicy::Invalid`]
//! 2. Spike    - large second and first difference
//! 3. Critical - large first difference with upper deviation above threshold
//! 4. Warning  - either deviation inside the warning band
//! 5. Normal   - everything else
//!
//! An undefined operand fails its comparison; it never matches a rule.

use crate::config::{ClassifierConfig, ThresholdConfig, ZeroPolicy};
use crate::derivative::Derivatives;
use crate::deviation::Deviations;
use crate::normalize::NormalizedSignal;
use crate::threshold::AdaptiveThresholds;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Health state of a single reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StateLabel {
    Normal,
    Warning,
    Critical,
    Spike,
    Invalid,
}

impl StateLabel {
    /// Every label, in report order.
    pub const ALL: [StateLabel; 5] = [
        StateLabel::Normal,
        StateLabel::Warning,
        StateLabel::Critical,
        StateLabel::Spike,
        StateLabel::Invalid,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StateLabel::Normal => "Normal",
            StateLabel::Warning => "Warning",
            StateLabel::Critical => "Critical",
            StateLabel::Spike => "Spike",
            StateLabel::Invalid => "Invalid",
        }
    }

    /// Parse the name produced by [`as_str`](Self::as_str).
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|label| label.as_str() == name)
    }

    /// Anything other than Normal.
    pub fn is_alert(&self) -> bool {
        !matches!(self, StateLabel::Normal)
    }
}

impl fmt::Display for StateLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Which deviation fell inside the warning band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviationSide {
    Upper,
    Lower,
}

/// Reason for a classification decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ClassificationReason {
    /// Sensor was silent at this instant
    MissingReading,
    /// Sensor reported exactly zero
    ZeroReading,
    /// Abrupt change in rate
    Spike { first_diff: f64, second_diff: f64 },
    /// Fast change with upper deviation above its threshold
    Critical {
        first_diff: f64,
        delta_upper: f64,
        threshold: f64,
        fallback_used: bool,
    },
    /// Deviation inside the warning band
    WarningBand { side: DeviationSide, deviation: f64 },
    /// No rule matched
    Nominal,
}

/// Classification result for a reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub label: StateLabel,
    pub reason: ClassificationReason,
}

impl Classification {
    pub fn new(label: StateLabel, reason: ClassificationReason) -> Self {
        Self { label, reason }
    }

    fn nominal() -> Self {
        Self::new(StateLabel::Normal, ClassificationReason::Nominal)
    }
}

/// Everything the classifier reads at one index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifierInputs {
    pub missing: bool,
    pub value: f64,
    pub first_diff: Option<f64>,
    pub second_diff: Option<f64>,
    pub delta_upper: Option<f64>,
    pub delta_lower: Option<f64>,
    /// Raw adaptive thresholds; the classifier applies its fallback.
    pub upper_threshold: Option<f64>,
    pub lower_threshold: Option<f64>,
}

impl ClassifierInputs {
    /// Gather the aligned slice at `index`.
    pub fn at(
        index: usize,
        signal: &NormalizedSignal,
        derivatives: &Derivatives,
        deviations: &Deviations,
        thresholds: &AdaptiveThresholds,
    ) -> Self {
        Self {
            missing: signal.is_missing(index),
            value: signal.values.get(index).copied().unwrap_or_default(),
            first_diff: derivatives.first.get(index),
            second_diff: derivatives.second.get(index),
            delta_upper: deviations.upper.get(index),
            delta_lower: deviations.lower.get(index),
            upper_threshold: thresholds.upper.get(index),
            lower_threshold: thresholds.lower.get(index),
        }
    }
}

/// Priority-ordered state classifier
#[derive(Debug, Clone)]
pub struct Classifier {
    config: ClassifierConfig,
    fallback_threshold: f64,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(ClassifierConfig::default(), ThresholdConfig::default().fallback)
    }
}

impl Classifier {
    /// Create a classifier; `fallback_threshold` replaces undefined thresholds.
    pub fn new(config: ClassifierConfig, fallback_threshold: f64) -> Self {
        Self {
            config,
            fallback_threshold,
        }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn fallback_threshold(&self) -> f64 {
        self.fallback_threshold
    }

    /// Classify one index.
    pub fn classify(&self, inputs: &ClassifierInputs) -> Classification {
        if let Some(invalid) = self.check_invalid(inputs) {
            return invalid;
        }

        if let Some(spike) = self.check_spike(inputs) {
            return spike;
        }

        if let Some(critical) = self.check_critical(inputs) {
            return critical;
        }

        if let Some(warning) = self.check_warning(inputs) {
            return warning;
        }

        Classification::nominal()
    }

    fn check_invalid(&self, inputs: &ClassifierInputs) -> Option<Classification> {
        if inputs.missing {
            return Some(Classification::new(
                StateLabel::Invalid,
                ClassificationReason::MissingReading,
            ));
        }

        if inputs.value == 0.0 && self.config.zero_policy == ZeroPolicy::Invalid {
            return Some(Classification::new(
                StateLabel::Invalid,
                ClassificationReason::ZeroReading,
            ));
        }

        None
    }

    fn check_spike(&self, inputs: &ClassifierInputs) -> Option<Classification> {
        let (first_diff, second_diff) = (inputs.first_diff?, inputs.second_diff?);

        if second_diff.abs() > self.config.spike_second_diff
            && first_diff.abs() > self.config.rate_of_change
        {
            return Some(Classification::new(
                StateLabel::Spike,
                ClassificationReason::Spike {
                    first_diff,
                    second_diff,
                },
            ));
        }

        None
    }

    fn check_critical(&self, inputs: &ClassifierInputs) -> Option<Classification> {
        let (first_diff, delta_upper) = (inputs.first_diff?, inputs.delta_upper?);
        let threshold = inputs.upper_threshold.unwrap_or(self.fallback_threshold);

        if first_diff.abs() > self.config.rate_of_change && delta_upper > threshold {
            return Some(Classification::new(
                StateLabel::Critical,
                ClassificationReason::Critical {
                    first_diff,
                    delta_upper,
                    threshold,
                    fallback_used: inputs.upper_threshold.is_none(),
                },
            ));
        }

        None
    }

    fn check_warning(&self, inputs: &ClassifierInputs) -> Option<Classification> {
        let [low, high] = self.config.warning_band;
        let in_band = |deviation: Option<f64>| deviation.filter(|d| (low..=high).contains(d));

        let (side, deviation) = match (in_band(inputs.delta_upper), in_band(inputs.delta_lower)) {
            (Some(d), _) => (DeviationSide::Upper, d),
            (None, Some(d)) => (DeviationSide::Lower, d),
            (None, None) => return None,
        };

        Some(Classification::new(
            StateLabel::Warning,
            ClassificationReason::WarningBand { side, deviation },
        ))
    }
}
