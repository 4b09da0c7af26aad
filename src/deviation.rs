// Thermowatch - Temperature feed health classification
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Deviation of the rolling extrema from the rolling mean.

use crate::rolling::RollingStats;
use crate::series::Series;
use serde::{Deserialize, Serialize};

/// Upper and lower deviation series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Deviations {
    /// rolling max - rolling mean
    pub upper: Series,
    /// rolling mean - rolling min
    pub lower: Series,
}

impl Deviations {
    /// Derive from rolling statistics; undefined wherever an input is.
    pub fn compute(rolling: &RollingStats) -> Self {
        Self {
            upper: rolling.max.zip_with(&rolling.mean, |max, mean| (max - mean).max(0.0)),
            lower: rolling.mean.zip_with(&rolling.min, |mean, min| (mean - min).max(0.0)),
        }
    }

    /// Largest deviation on either side at `index`.
    pub fn max_abs(&self, index: usize) -> Option<f64> {
        match (self.upper.get(index), self.lower.get(index)) {
            (Some(u), Some(l)) => Some(u.max(l)),
            (Some(u), None) => Some(u),
            (None, Some(l)) => Some(l),
            (None, None) => None,
        }
    }
}
