// Thermowatch Testdata - Signal patterns
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Underlying temperature shapes, before noise and faults.

use rand::prelude::*;
use rand_distr::Normal;
use serde::{Deserialize, Serialize};

const HOUR_MS: f64 = 3_600_000.0;

/// Base signal of a generated feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SignalPattern {
    /// Fixed temperature.
    Constant { value: f64 },

    /// Linear trend.
    ///
    /// `value = start + slope_per_hour * hours`
    Linear { start: f64, slope_per_hour: f64 },

    /// Daily cycle, peaking at `peak_hour` UTC with a Gaussian-like shape.
    Diurnal {
        min: f64,
        max: f64,
        peak_hour: f64,
        spread: f64,
    },

    /// Random walk; each sample adds a normal step.
    RandomWalk { start: f64, step_std: f64 },

    /// Sum of several patterns.
    Composite(Vec<SignalPattern>),
}

impl SignalPattern {
    /// Evaluate at `timestamp_ms` relative to the feed start.
    ///
    /// Stateless: a random walk yields its start value here. Use
    /// [`PatternState::evaluate`] to advance it.
    pub fn evaluate(&self, timestamp_ms: u64) -> f64 {
        match self {
            SignalPattern::Constant { value } => *value,

            SignalPattern::Linear {
                start,
                slope_per_hour,
            } => start + slope_per_hour * (timestamp_ms as f64 / HOUR_MS),

            SignalPattern::Diurnal {
                min,
                max,
                peak_hour,
                spread,
            } => {
                let hour = (timestamp_ms as f64 / HOUR_MS) % 24.0;
                let diff = (hour - peak_hour).abs();
                let diff = if diff > 12.0 { 24.0 - diff } else { diff };
                let factor = (-diff * diff / (2.0 * spread * spread)).exp();
                min + (max - min) * factor
            }

            SignalPattern::RandomWalk { start, .. } => *start,

            SignalPattern::Composite(patterns) => {
                patterns.iter().map(|p| p.evaluate(timestamp_ms)).sum()
            }
        }
    }

    /// Indoor or process temperature: 14:00 peak, four hour spread.
    pub fn temperature_diurnal(min: f64, max: f64) -> Self {
        SignalPattern::Diurnal {
            min,
            max,
            peak_hour: 14.0,
            spread: 4.0,
        }
    }
}

/// Sample from N(mean, std); degenerate deviations collapse to the mean.
pub(crate) fn gaussian(rng: &mut (impl Rng + ?Sized), mean: f64, std: f64) -> f64 {
    match Normal::new(mean, std) {
        Ok(dist) if std > 0.0 => dist.sample(rng),
        _ => mean,
    }
}

/// State for patterns that need history.
#[derive(Debug, Clone, Default)]
pub struct PatternState {
    /// Accumulated random walk offset from its start.
    pub walk_offset: f64,
}

impl PatternState {
    /// Evaluate with state update. Random walks nested in a composite share
    /// one offset.
    pub fn evaluate(
        &mut self,
        pattern: &SignalPattern,
        timestamp_ms: u64,
        rng: &mut (impl Rng + ?Sized),
    ) -> f64 {
        match pattern {
            SignalPattern::RandomWalk { start, step_std } => {
                if timestamp_ms > 0 {
                    self.walk_offset += gaussian(rng, 0.0, *step_std);
                }
                start + self.walk_offset
            }
            SignalPattern::Composite(patterns) => patterns
                .iter()
                .map(|p| self.evaluate(p, timestamp_ms, rng))
                .sum(),
            _ => pattern.evaluate(timestamp_ms),
        }
    }
}
