// Thermowatch - Temperature feed health classification
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Rolling mean / max / min over the normalized signal.

use crate::series::Series;
use crate::window::TrailingWindow;
use serde::{Deserialize, Serialize};

/// Trailing-window statistics aligned with the signal.
///
/// Every series is undefined for `i < window - 1`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RollingStats {
    pub window: usize,
    pub mean: Series,
    pub max: Series,
    pub min: Series,
}

impl RollingStats {
    /// Compute over the full signal.
    pub fn compute(signal: &[f64], window: usize) -> Self {
        let mut trailing = TrailingWindow::new(window);
        let mut mean = Vec::with_capacity(signal.len());
        let mut max = Vec::with_capacity(signal.len());
        let mut min = Vec::with_capacity(signal.len());

        for value in signal {
            trailing.push(Some(*value));
            let stats = trailing.stats();
            mean.push(stats.map(|s| s.mean));
            max.push(stats.map(|s| s.max));
            min.push(stats.map(|s| s.min));
        }

        Self {
            window,
            mean: mean.into(),
            max: max.into(),
            min: min.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.mean.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mean.is_empty()
    }
}
