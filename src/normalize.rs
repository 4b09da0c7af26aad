// Thermowatch - Temperature feed health classification
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Missing-value normalization.
//!
//! Statistics run over a dense `f64` signal where missing samples read as
//! [`MISSING_SENTINEL`]. The missing flag is kept alongside so the classifier
//! can tell a silent sensor from a true zero reading. A non-finite value is
//! treated as missing.

use crate::reading::{Reading, Sample};
use serde::{Deserialize, Serialize};

/// Placeholder substituted for missing samples.
pub const MISSING_SENTINEL: f64 = 0.0;

/// Dense signal aligned index-for-index with the input readings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedSignal {
    pub values: Vec<f64>,
    pub missing: Vec<bool>,
}

impl NormalizedSignal {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_missing(&self, index: usize) -> bool {
        self.missing.get(index).copied().unwrap_or(false)
    }

    pub fn missing_count(&self) -> usize {
        self.missing.iter().filter(|m| **m).count()
    }
}

/// Replace every missing sample with the sentinel.
pub fn normalize(readings: &[Reading]) -> NormalizedSignal {
    let mut values = Vec::with_capacity(readings.len());
    let mut missing = Vec::with_capacity(readings.len());

    for reading in readings {
        match reading.sample {
            Sample::Present(v) if v.is_finite() => {
                values.push(v);
                missing.push(false);
            }
            // NaN and infinities carry no reading
            Sample::Present(_) | Sample::Missing => {
                values.push(MISSING_SENTINEL);
                missing.push(true);
            }
        }
    }

    NormalizedSignal { values, missing }
}
