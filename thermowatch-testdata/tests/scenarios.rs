// Thermowatch Testdata - Scenario validation
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Generated scenarios run through the classifier produce the labels their
//! metadata promises.

use tempfile::TempDir;
use thermowatch::{Pipeline, StateLabel};
use thermowatch_testdata::*;

fn config() -> GeneratorConfig {
    GeneratorConfig::new().with_num_samples(288).with_seed(42)
}

#[test]
fn test_recorded_faults_carry_expected_labels() {
    let pipeline = Pipeline::default();

    for scenario in Scenario::ALL {
        let feed = scenario.generate(&config());
        let analysis = pipeline.run(&feed.to_readings());

        for anomaly in &feed.metadata.anomalies {
            let Some(expected) = anomaly.expected_label else {
                continue;
            };
            for index in anomaly.labelled_indices() {
                assert_eq!(
                    analysis.label(index),
                    Some(expected),
                    "{} fault '{}' at index {}",
                    scenario,
                    anomaly.kind,
                    index
                );
            }
        }
    }
}

#[test]
fn test_nominal_feed_has_no_invalid_or_spike() {
    let feed = Scenario::Nominal.generate(&config());
    let summary = Pipeline::default().run(&feed.to_readings()).summary();

    assert_eq!(summary.total, 288);
    assert_eq!(summary.invalid, 0);
    assert_eq!(summary.spike, 0);
    assert_eq!(summary.critical, 0);
}

#[test]
fn test_dropout_counts_match_metadata() {
    let feed = Scenario::Dropout.generate(&config());
    let analysis = Pipeline::default().run(&feed.to_readings());

    let silent: usize = feed
        .metadata
        .anomalies
        .iter()
        .filter(|a| a.kind == "dropout")
        .map(|a| a.end_index - a.start_index + 1)
        .sum();
    assert_eq!(analysis.summary().missing, silent);

    let invalid_episodes = analysis
        .episodes()
        .into_iter()
        .filter(|e| e.label == StateLabel::Invalid)
        .count();
    assert_eq!(invalid_episodes, feed.metadata.anomalies.len());
}

#[test]
fn test_csv_feed_analyzes_like_memory_feed() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mixed.csv");

    let feed = Scenario::Mixed.generate(&config());
    feed.to_csv(&path).unwrap();
    let loaded = Feed::from_csv(&path).unwrap();

    let pipeline = Pipeline::default();
    let original = pipeline.run(&feed.to_readings());
    let reloaded = pipeline.run(&loaded.to_readings());

    // Six decimals in the CSV; labels survive the rounding
    assert_eq!(original.summary().invalid, reloaded.summary().invalid);
    for anomaly in &feed.metadata.anomalies {
        assert_eq!(
            original.label(anomaly.start_index),
            reloaded.label(anomaly.start_index)
        );
    }
}

#[test]
fn test_same_seed_same_fingerprint() {
    let pipeline = Pipeline::default();
    let a = pipeline.run(&Scenario::Mixed.generate(&config()).to_readings());
    let b = pipeline.run(&Scenario::Mixed.generate(&config()).to_readings());
    assert_eq!(a.fingerprint(), b.fingerprint());
}
