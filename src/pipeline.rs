// Thermowatch - Temperature feed health classification
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Pipeline - orchestration of the analysis stages.
//!
//! Stages run strictly in order, each over the complete output of the one
//! before: normalize, rolling statistics and derivatives, deviations,
//! adaptive thresholds, classification.

use crate::analysis::{Analysis, ANALYSIS_VERSION};
use crate::classifier::{Classification, Classifier, ClassifierInputs};
use crate::config::PipelineConfig;
use crate::derivative::Derivatives;
use crate::deviation::Deviations;
use crate::error::Result;
use crate::normalize::{normalize, NormalizedSignal};
use crate::reading::{readings_from_values, Reading};
use crate::rolling::RollingStats;
use crate::threshold::AdaptiveThresholds;

/// Batch analysis pipeline.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    classifier: Classifier,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::from_valid(PipelineConfig::default())
    }
}

impl Pipeline {
    /// Create a pipeline after validating the configuration.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_valid(config))
    }

    fn from_valid(config: PipelineConfig) -> Self {
        let classifier = Classifier::new(config.classifier.clone(), config.threshold.fallback);
        Self { config, classifier }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Analyze a chronologically ordered feed.
    pub fn run(&self, readings: &[Reading]) -> Analysis {
        #[cfg(feature = "logging")]
        log::debug!(
            "analyzing {} readings (rolling window {}, threshold window {})",
            readings.len(),
            self.config.rolling.window,
            self.config.threshold.window
        );

        let signal = normalize(readings);

        #[cfg(feature = "logging")]
        if signal.missing_count() > 0 {
            log::debug!(
                "substituted {} missing readings with the sentinel",
                signal.missing_count()
            );
        }

        let rolling = RollingStats::compute(&signal.values, self.config.rolling.window);
        let derivatives = Derivatives::compute(&signal.values);
        let deviations = Deviations::compute(&rolling);
        let thresholds = AdaptiveThresholds::compute(&deviations, &self.config.threshold);

        #[cfg(feature = "logging")]
        log::trace!(
            "series ready: {} rolling, {} upper thresholds defined",
            rolling.mean.defined_count(),
            thresholds.upper.defined_count()
        );

        let classifications =
            self.classify_all(&signal, &derivatives, &deviations, &thresholds);

        #[cfg(feature = "logging")]
        log::debug!(
            "classified {} readings, {} alerts",
            classifications.len(),
            classifications.iter().filter(|c| c.label.is_alert()).count()
        );

        Analysis {
            version: ANALYSIS_VERSION.to_string(),
            config: self.config.clone(),
            timestamps_ms: readings.iter().map(|r| r.timestamp_ms).collect(),
            signal,
            rolling,
            deviations,
            thresholds,
            derivatives,
            classifications,
        }
    }

    /// Analyze bare values; the index stands in for the timestamp.
    pub fn run_values(&self, values: &[Option<f64>]) -> Analysis {
        self.run(&readings_from_values(values))
    }

    /// Classify every index of already-derived series.
    pub fn classify_all(
        &self,
        signal: &NormalizedSignal,
        derivatives: &Derivatives,
        deviations: &Deviations,
        thresholds: &AdaptiveThresholds,
    ) -> Vec<Classification> {
        (0..signal.len())
            .map(|i| {
                let inputs = ClassifierInputs::at(i, signal, derivatives, deviations, thresholds);
                self.classifier.classify(&inputs)
            })
            .collect()
    }
}
