// Thermowatch - Temperature feed health classification
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Analysis - complete output of one pipeline run.

use crate::classifier::{Classification, ClassificationReason, StateLabel};
use crate::config::PipelineConfig;
use crate::derivative::Derivatives;
use crate::deviation::Deviations;
use crate::error::Result;
use crate::normalize::NormalizedSignal;
use crate::rolling::RollingStats;
use crate::series::Series;
use crate::threshold::AdaptiveThresholds;
use serde::{Deserialize, Serialize};
use xxhash_rust::xxh64::xxh64;

/// Version of the analysis export format.
pub const ANALYSIS_VERSION: &str = "0.3.0";

/// Every series produced by one run, index-aligned with the input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    /// Format version.
    pub version: String,
    /// Configuration the run used.
    pub config: PipelineConfig,
    /// Input timestamps.
    pub timestamps_ms: Vec<u64>,
    /// Normalized signal and missing flags.
    pub signal: NormalizedSignal,
    pub rolling: RollingStats,
    pub deviations: Deviations,
    pub thresholds: AdaptiveThresholds,
    pub derivatives: Derivatives,
    /// One classification per input index.
    pub classifications: Vec<Classification>,
}

/// The per-index payload handed to reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRow {
    pub index: usize,
    pub timestamp_ms: u64,
    /// Reported value; `None` when the reading was missing.
    pub value: Option<f64>,
    pub rolling_mean: Option<f64>,
    pub rolling_max: Option<f64>,
    pub rolling_min: Option<f64>,
    pub delta_upper: Option<f64>,
    pub delta_lower: Option<f64>,
    pub upper_threshold: Option<f64>,
    pub lower_threshold: Option<f64>,
    pub first_diff: Option<f64>,
    pub second_diff: Option<f64>,
    pub state: StateLabel,
    pub reason: ClassificationReason,
}

/// Label counts over a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSummary {
    pub total: usize,
    pub missing: usize,
    pub normal: usize,
    pub warning: usize,
    pub critical: usize,
    pub spike: usize,
    pub invalid: usize,
}

impl StateSummary {
    pub fn count(&self, label: StateLabel) -> usize {
        match label {
            StateLabel::Normal => self.normal,
            StateLabel::Warning => self.warning,
            StateLabel::Critical => self.critical,
            StateLabel::Spike => self.spike,
            StateLabel::Invalid => self.invalid,
        }
    }

    fn record(&mut self, label: StateLabel) {
        self.total += 1;
        match label {
            StateLabel::Normal => self.normal += 1,
            StateLabel::Warning => self.warning += 1,
            StateLabel::Critical => self.critical += 1,
            StateLabel::Spike => self.spike += 1,
            StateLabel::Invalid => self.invalid += 1,
        }
    }

    /// Share of readings that are not Normal.
    pub fn alert_ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.total - self.normal) as f64 / self.total as f64
    }
}

/// Maximal run of consecutive readings sharing one non-Normal label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    pub label: StateLabel,
    pub start_index: usize,
    /// Inclusive.
    pub end_index: usize,
    pub start_ms: u64,
    pub end_ms: u64,
}

impl Episode {
    /// Number of readings covered.
    pub fn sample_count(&self) -> usize {
        self.end_index - self.start_index + 1
    }

    pub fn duration_ms(&self) -> u64 {
        self.end_ms.saturating_sub(self.start_ms)
    }
}

impl Analysis {
    pub fn len(&self) -> usize {
        self.classifications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classifications.is_empty()
    }

    /// Labels in input order.
    pub fn labels(&self) -> Vec<StateLabel> {
        self.classifications.iter().map(|c| c.label).collect()
    }

    pub fn label(&self, index: usize) -> Option<StateLabel> {
        self.classifications.get(index).map(|c| c.label)
    }

    /// Full payload at `index`.
    pub fn row(&self, index: usize) -> Option<AnalysisRow> {
        let classification = self.classifications.get(index)?;
        let value = if self.signal.is_missing(index) {
            None
        } else {
            self.signal.values.get(index).copied()
        };

        Some(AnalysisRow {
            index,
            timestamp_ms: self.timestamps_ms.get(index).copied().unwrap_or(index as u64),
            value,
            rolling_mean: self.rolling.mean.get(index),
            rolling_max: self.rolling.max.get(index),
            rolling_min: self.rolling.min.get(index),
            delta_upper: self.deviations.upper.get(index),
            delta_lower: self.deviations.lower.get(index),
            upper_threshold: self.thresholds.upper.get(index),
            lower_threshold: self.thresholds.lower.get(index),
            first_diff: self.derivatives.first.get(index),
            second_diff: self.derivatives.second.get(index),
            state: classification.label,
            reason: classification.reason.clone(),
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = AnalysisRow> + '_ {
        (0..self.len()).filter_map(move |i| self.row(i))
    }

    pub fn summary(&self) -> StateSummary {
        let mut summary = StateSummary {
            missing: self.signal.missing_count(),
            ..Default::default()
        };
        for classification in &self.classifications {
            summary.record(classification.label);
        }
        summary
    }

    /// Contiguous non-Normal runs, in order.
    pub fn episodes(&self) -> Vec<Episode> {
        let mut episodes: Vec<Episode> = Vec::new();

        for (index, classification) in self.classifications.iter().enumerate() {
            let label = classification.label;
            if !label.is_alert() {
                continue;
            }
            let timestamp = self.timestamps_ms.get(index).copied().unwrap_or(index as u64);

            if let Some(last) = episodes.last_mut() {
                if last.label == label && last.end_index + 1 == index {
                    last.end_index = index;
                    last.end_ms = timestamp;
                    continue;
                }
            }

            episodes.push(Episode {
                label,
                start_index: index,
                end_index: index,
                start_ms: timestamp,
                end_ms: timestamp,
            });
        }

        episodes
    }

    /// Deterministic hash over every series and label.
    pub fn fingerprint(&self) -> u64 {
        let mut data = Vec::new();

        for timestamp in &self.timestamps_ms {
            data.extend_from_slice(&timestamp.to_be_bytes());
        }
        for (value, missing) in self.signal.values.iter().zip(&self.signal.missing) {
            data.extend_from_slice(&value.to_bits().to_be_bytes());
            data.push(*missing as u8);
        }

        for series in [
            &self.rolling.mean,
            &self.rolling.max,
            &self.rolling.min,
            &self.deviations.upper,
            &self.deviations.lower,
            &self.thresholds.upper,
            &self.thresholds.lower,
            &self.derivatives.first,
            &self.derivatives.second,
        ] {
            push_series(&mut data, series);
        }

        for classification in &self.classifications {
            data.push(classification.label as u8);
        }

        xxh64(&data, 0)
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

fn push_series(data: &mut Vec<u8>, series: &Series) {
    for value in series.iter() {
        match value {
            Some(v) => {
                data.push(1);
                data.extend_from_slice(&v.to_bits().to_be_bytes());
            }
            None => data.push(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Pipeline;
    use crate::reading::Reading;

    fn analysis_for(values: &[Option<f64>]) -> Analysis {
        let readings: Vec<Reading> = values
            .iter()
            .enumerate()
            .map(|(i, v)| Reading::from_option(i as u64 * 300_000, *v))
            .collect();
        Pipeline::default().run(&readings)
    }

    #[test]
    fn test_rows_align_with_input() {
        let analysis = analysis_for(&[Some(20.0), None, Some(21.0)]);
        let rows: Vec<_> = analysis.rows().collect();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].timestamp_ms, 300_000);
        assert_eq!(rows[1].value, None);
        assert_eq!(rows[1].state, StateLabel::Invalid);
        assert_eq!(rows[2].value, Some(21.0));
        assert!(analysis.row(3).is_none());
    }

    #[test]
    fn test_summary_counts() {
        let analysis = analysis_for(&[Some(20.0), None, Some(0.0), Some(20.0)]);
        let summary = analysis.summary();

        assert_eq!(summary.total, 4);
        assert_eq!(summary.missing, 1);
        assert_eq!(summary.invalid, 2);
        assert_eq!(summary.count(StateLabel::Invalid), 2);
        // Recovery from the sentinel reads as a jump
        assert_eq!(summary.spike, 1);
        assert!((summary.alert_ratio() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_episodes_merge_consecutive_labels() {
        let analysis = analysis_for(&[Some(20.0), None, None, Some(20.0), None]);
        let episodes = analysis.episodes();

        assert_eq!(episodes.len(), 3);
        assert_eq!(episodes[0].label, StateLabel::Invalid);
        assert_eq!(episodes[0].start_index, 1);
        assert_eq!(episodes[0].end_index, 2);
        assert_eq!(episodes[0].sample_count(), 2);
        assert_eq!(episodes[0].duration_ms(), 300_000);
        assert_eq!(episodes[1].label, StateLabel::Spike);
        assert_eq!(episodes[2].label, StateLabel::Invalid);
        assert_eq!(episodes[2].start_index, 4);
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let a = analysis_for(&[Some(20.0), Some(20.5), Some(21.0)]);
        let b = analysis_for(&[Some(20.0), Some(20.5), Some(21.0)]);
        let c = analysis_for(&[Some(20.0), Some(20.5), Some(21.5)]);

        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
    }

    #[test]
    fn test_json_roundtrip_preserves_fingerprint() {
        let analysis = analysis_for(&[Some(20.0), None, Some(21.0), Some(0.0)]);
        let json = analysis.to_json().unwrap();
        assert!(json.contains("\"version\""));

        let restored = Analysis::from_json(&json).unwrap();
        assert_eq!(restored.fingerprint(), analysis.fingerprint());
    }

    #[test]
    fn test_json_roundtrip_is_exact_for_full_windows() {
        // Long enough to fill both windows, with values that are not short decimals
        let values: Vec<Option<f64>> = (0..400)
            .map(|i| {
                let t = i as f64;
                if i % 97 == 50 {
                    None
                } else {
                    Some(21.0 + 2.5 * (t / 23.0).sin() + 0.1 * (t * 1.7).cos())
                }
            })
            .collect();
        let analysis = analysis_for(&values);
        assert!(analysis.thresholds.upper.defined_count() > 300);

        let restored = Analysis::from_json(&analysis.to_json().unwrap()).unwrap();
        assert_eq!(restored, analysis);
        assert_eq!(restored.fingerprint(), analysis.fingerprint());
    }

    #[test]
    fn test_empty_summary() {
        let analysis = analysis_for(&[]);
        assert!(analysis.is_empty());
        assert_eq!(analysis.summary(), StateSummary::default());
        assert!(analysis.episodes().is_empty());
        assert_eq!(analysis.summary().alert_ratio(), 0.0);
    }
}
