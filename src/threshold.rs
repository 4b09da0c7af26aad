// Thermowatch - Temperature feed health classification
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Adaptive thresholds over the deviation series.
//!
//! Each threshold is `mean + k * std` over the trailing window of a
//! deviation series, with the sample (n-1) standard deviation. A window
//! holding any undefined deviation yields an undefined threshold; the
//! classifier substitutes the configured fallback there.

use crate::config::ThresholdConfig;
use crate::deviation::Deviations;
use crate::series::Series;
use crate::window::TrailingWindow;
use serde::{Deserialize, Serialize};

/// Threshold series derived from the upper and lower deviations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdaptiveThresholds {
    pub upper: Series,
    pub lower: Series,
}

impl AdaptiveThresholds {
    pub fn compute(deviations: &Deviations, config: &ThresholdConfig) -> Self {
        Self {
            upper: adaptive_series(&deviations.upper, config.window, config.sigma_multiplier),
            lower: adaptive_series(&deviations.lower, config.window, config.sigma_multiplier),
        }
    }

    /// Upper threshold at `index`, or `fallback` where undefined.
    pub fn upper_or(&self, index: usize, fallback: f64) -> f64 {
        self.upper.get(index).unwrap_or(fallback)
    }

    /// Lower threshold at `index`, or `fallback` where undefined.
    pub fn lower_or(&self, index: usize, fallback: f64) -> f64 {
        self.lower.get(index).unwrap_or(fallback)
    }
}

/// `mean + sigma_multiplier * std` over each full trailing window.
pub fn adaptive_series(source: &Series, window: usize, sigma_multiplier: f64) -> Series {
    let mut trailing = TrailingWindow::new(window);

    source
        .iter()
        .map(|value| {
            trailing.push(value);
            trailing
                .stats()
                .and_then(|stats| stats.std.map(|std| stats.mean + sigma_multiplier * std))
        })
        .collect()
}
