// Thermowatch Testdata - Synthetic temperature feeds
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! # Thermowatch Testdata
//!
//! Synthetic single-sensor temperature feeds with injected faults, for
//! tests, benchmarks and demos of the Thermowatch classifier.
//!
//! - **Signal patterns**: constant, linear, diurnal, random walk
//! - **Fault injection**: spikes, bias steps, drift, dropouts, stuck and zero readings
//! - **Scenarios**: named feeds whose fault positions are recorded for validation
//!
//! ## Quick Start
//!
//! ```rust
//! use thermowatch::Pipeline;
//! use thermowatch_testdata::{GeneratorConfig, Scenario};
//!
//! let config = GeneratorConfig::new().with_num_samples(288).with_seed(42);
//! let feed = Scenario::Spike.generate(&config);
//!
//! let analysis = Pipeline::default().run(&feed.to_readings());
//! for anomaly in &feed.metadata.anomalies {
//!     assert_eq!(analysis.label(anomaly.start_index), anomaly.expected_label);
//! }
//! ```
//!
//! ## Fault Injection
//!
//! ```rust
//! use thermowatch_testdata::{AnomalyConfig, AnomalyType};
//!
//! let anomaly = AnomalyConfig {
//!     anomaly_type: AnomalyType::Stuck,
//!     start_sample: 500,
//!     duration_samples: Some(200),
//! };
//! assert!(anomaly.is_active(600));
//! ```

pub mod anomalies;
pub mod feed;
pub mod generator;
pub mod patterns;
pub mod scenario;

// Re-exports for convenience
pub use anomalies::{AnomalyConfig, AnomalyState, AnomalyType};
pub use feed::{Feed, FeedError, FeedMetadata, FeedSample, InjectedAnomaly};
pub use generator::{generate_feed, GeneratorConfig, SensorConfig};
pub use patterns::{PatternState, SignalPattern};
pub use scenario::Scenario;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
