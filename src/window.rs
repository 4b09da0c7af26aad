// Thermowatch - Temperature feed health classification
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Fixed-size trailing windows and their statistics.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Summary statistics over one full window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowStats {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// Sample standard deviation (n-1); `None` for a single value.
    pub std: Option<f64>,
}

impl WindowStats {
    /// Compute over a slice; `None` if empty.
    pub fn from_slice(values: &[f64]) -> Option<Self> {
        Self::from_iter_values(values.iter().copied())
    }

    fn from_iter_values<I>(values: I) -> Option<Self>
    where
        I: Iterator<Item = f64> + Clone,
    {
        let mut count = 0usize;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;

        for v in values.clone() {
            count += 1;
            sum += v;
            min = min.min(v);
            max = max.max(v);
        }

        if count == 0 {
            return None;
        }

        let n = count as f64;
        // Rounding can push the mean past an extremum when all values are equal.
        let mean = (sum / n).clamp(min, max);

        let std = if count > 1 {
            let sum_sq: f64 = values.map(|v| (v - mean).powi(2)).sum();
            Some((sum_sq / (n - 1.0)).max(0.0).sqrt())
        } else {
            None
        };

        Some(Self {
            count,
            mean,
            min,
            max,
            std,
        })
    }
}

/// Trailing window of the last `capacity` entries, oldest first.
///
/// Entries may be undefined; statistics are only produced once every slot
/// holds a defined value.
#[derive(Debug, Clone)]
pub struct TrailingWindow {
    samples: VecDeque<Option<f64>>,
    capacity: usize,
    defined: usize,
}

impl TrailingWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
            defined: 0,
        }
    }

    /// Push the newest entry, evicting the oldest once at capacity.
    pub fn push(&mut self, value: Option<f64>) {
        if self.capacity == 0 {
            return;
        }

        if self.samples.len() == self.capacity {
            if let Some(Some(_)) = self.samples.pop_front() {
                self.defined -= 1;
            }
        }

        if value.is_some() {
            self.defined += 1;
        }
        self.samples.push_back(value);
    }

    /// True when the window holds `capacity` defined entries.
    pub fn is_full(&self) -> bool {
        self.capacity > 0 && self.defined == self.capacity
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Statistics over the window, only when it is full.
    pub fn stats(&self) -> Option<WindowStats> {
        if !self.is_full() {
            return None;
        }
        WindowStats::from_iter_values(self.samples.iter().flatten().copied())
    }

    pub fn clear(&mut self) {
        self.samples.clear();
        self.defined = 0;
    }
}
