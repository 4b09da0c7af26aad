// Thermowatch - Temperature feed health classification
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Backward differences of the normalized signal.

use crate::series::Series;
use serde::{Deserialize, Serialize};

/// First and second backward differences.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Derivatives {
    /// `x[i] - x[i-1]`, undefined at 0.
    pub first: Series,
    /// `first[i] - first[i-1]`, undefined at 0 and 1.
    pub second: Series,
}

impl Derivatives {
    pub fn compute(signal: &[f64]) -> Self {
        let first = difference(&Series::new(signal.iter().copied().map(Some).collect()));
        let second = difference(&first);
        Self { first, second }
    }
}

/// Backward difference; undefined at 0 and wherever either operand is.
pub fn difference(series: &Series) -> Series {
    (0..series.len())
        .map(|i| {
            if i == 0 {
                return None;
            }
            match (series.get(i), series.get(i - 1)) {
                (Some(current), Some(previous)) => Some(current - previous),
                _ => None,
            }
        })
        .collect()
}
