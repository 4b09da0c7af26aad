// Thermowatch - Temperature feed health classification
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! # Thermowatch - Temperature feed health classification
//!
//! Batch analysis of periodic temperature readings. Every reading receives
//! one of five health states derived from the short-horizon behavior of the
//! signal around it.
//!
//! ## Key Features
//!
//! - **Explicit gaps**: missing readings are tagged, not guessed
//! - **Trailing windows only**: no derived value ever looks ahead
//! - **Adaptive thresholds**: mean + k·σ of the recent deviations
//! - **Priority classification**: Invalid > Spike > Critical > Warning > Normal
//!
//! ## Quick Start
//!
//! ```rust
//! use thermowatch::{Pipeline, Reading, StateLabel};
//!
//! let mut readings: Vec<Reading> = (0..24)
//!     .map(|i| Reading::new(i * 300_000, 21.0))
//!     .collect();
//! readings[5] = Reading::missing(5 * 300_000);
//!
//! let analysis = Pipeline::default().run(&readings);
//!
//! assert_eq!(analysis.len(), 24);
//! assert_eq!(analysis.label(5), Some(StateLabel::Invalid));
//! assert_eq!(analysis.label(23), Some(StateLabel::Normal));
//! ```
//!
//! ## Modules
//!
//! - [`reading`]: Readings and the tagged sample value
//! - [`normalize`]: Missing-value substitution
//! - [`rolling`]: Trailing mean/max/min
//! - [`deviation`]: Upper and lower deviation from the rolling mean
//! - [`threshold`]: Adaptive thresholds over the deviations
//! - [`derivative`]: First and second backward differences
//! - [`classifier`]: Priority-ordered state classification
//! - [`pipeline`]: Stage orchestration
//! - [`analysis`]: Per-index output, summaries and episodes

// Modules
pub mod analysis;
pub mod classifier;
pub mod config;
pub mod derivative;
pub mod deviation;
pub mod error;
pub mod normalize;
pub mod pipeline;
pub mod reading;
pub mod rolling;
pub mod series;
pub mod threshold;
pub mod window;

// Re-exports for convenient access
pub use analysis::{Analysis, AnalysisRow, Episode, StateSummary, ANALYSIS_VERSION};
pub use classifier::{
    Classification, ClassificationReason, Classifier, ClassifierInputs, DeviationSide, StateLabel,
};
pub use config::{ClassifierConfig, PipelineConfig, RollingConfig, ThresholdConfig, ZeroPolicy};
pub use derivative::Derivatives;
pub use deviation::Deviations;
pub use error::{ConfigError, InputError, Result, ThermoError};
pub use normalize::{normalize, NormalizedSignal, MISSING_SENTINEL};
pub use pipeline::Pipeline;
pub use reading::{readings_from_values, validate_readings, Reading, Sample};
pub use rolling::RollingStats;
pub use series::Series;
pub use threshold::AdaptiveThresholds;
pub use window::{TrailingWindow, WindowStats};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
