// Thermowatch - Temperature feed health classification
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! End-to-end behavior of the analysis pipeline.

use approx::assert_relative_eq;
use thermowatch::*;

const FIVE_MINUTES_MS: u64 = 300_000;

fn feed(values: &[Option<f64>]) -> Vec<Reading> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| Reading::from_option(i as u64 * FIVE_MINUTES_MS, *v))
        .collect()
}

fn present(values: &[f64]) -> Vec<Option<f64>> {
    values.iter().copied().map(Some).collect()
}

#[test]
fn test_step_after_flat_hour_is_spike() {
    let mut values = vec![10.0; 12];
    values.push(20.0);

    let analysis = Pipeline::default().run(&feed(&present(&values)));
    let row = analysis.row(12).unwrap();

    assert_relative_eq!(row.first_diff.unwrap(), 10.0);
    assert_relative_eq!(row.second_diff.unwrap(), 10.0);
    assert_eq!(row.state, StateLabel::Spike);

    // The same index also satisfies the Critical rule
    assert!(row.delta_upper.unwrap() > analysis.config.threshold.fallback);
    assert!(row.first_diff.unwrap().abs() > 0.5);

    for i in 0..12 {
        assert_eq!(analysis.label(i), Some(StateLabel::Normal));
    }
}

#[test]
fn test_zero_and_missing_are_invalid_regardless_of_neighbors() {
    let mut values = present(&[21.0; 20]);
    values[4] = Some(0.0);
    values[9] = None;
    values[15] = Some(0.0);
    values[16] = None;

    let analysis = Pipeline::default().run(&feed(&values));

    for i in [4, 9, 15, 16] {
        assert_eq!(analysis.label(i), Some(StateLabel::Invalid), "index {}", i);
    }
    assert_eq!(
        analysis.classifications[4].reason,
        ClassificationReason::ZeroReading
    );
    assert_eq!(
        analysis.classifications[9].reason,
        ClassificationReason::MissingReading
    );
    assert_eq!(analysis.summary().missing, 2);
}

#[test]
fn test_missing_reading_feeds_sentinel_into_statistics() {
    let mut values = present(&[12.0; 12]);
    values[3] = None;

    let analysis = Pipeline::default().run(&feed(&values));

    assert_eq!(analysis.signal.values[3], MISSING_SENTINEL);
    assert_relative_eq!(analysis.rolling.min.get(11).unwrap(), 0.0);
    assert_relative_eq!(analysis.rolling.mean.get(11).unwrap(), 11.0);
    assert_eq!(analysis.row(3).unwrap().value, None);
}

#[test]
fn test_nan_reading_is_invalid_and_keeps_statistics_defined() {
    let mut values = present(&[20.0; 14]);
    values[13] = Some(f64::NAN);

    let analysis = Pipeline::default().run(&feed(&values));
    let row = analysis.row(13).unwrap();

    assert_eq!(row.state, StateLabel::Invalid);
    assert_eq!(row.reason, ClassificationReason::MissingReading);
    assert_eq!(row.value, None);

    // Window [20 x 11, 0]
    assert_relative_eq!(row.rolling_mean.unwrap(), 220.0 / 12.0);
    assert_relative_eq!(row.delta_upper.unwrap(), 20.0 - 220.0 / 12.0);
    assert_relative_eq!(row.delta_lower.unwrap(), 220.0 / 12.0);
    assert_eq!(analysis.summary().missing, 1);

    let mut missing = values.clone();
    missing[13] = None;
    let reference = Pipeline::default().run(&feed(&missing));
    assert_eq!(analysis.fingerprint(), reference.fingerprint());
}

#[test]
fn test_steady_drift_inside_band_is_warning() {
    // Slope chosen so that max - mean = slope * 5.5 = 2.0 over 12 samples
    let slope = 4.0 / 11.0;
    let values: Vec<f64> = (0..30).map(|i| 20.0 + slope * i as f64).collect();

    let analysis = Pipeline::default().run(&feed(&present(&values)));

    for i in 0..11 {
        assert_eq!(analysis.label(i), Some(StateLabel::Normal));
    }
    for i in 11..30 {
        let row = analysis.row(i).unwrap();
        assert_relative_eq!(row.delta_upper.unwrap(), 2.0, epsilon = 1e-9);
        assert!(row.first_diff.unwrap().abs() <= 0.5);
        assert_eq!(row.state, StateLabel::Warning, "index {}", i);
    }
}

#[test]
fn test_constant_signal_is_normal_throughout() {
    let values = vec![18.5; 30];
    let analysis = Pipeline::default().run(&feed(&present(&values)));

    assert!(analysis.labels().iter().all(|l| *l == StateLabel::Normal));

    for i in 11..30 {
        assert_relative_eq!(analysis.deviations.upper.get(i).unwrap(), 0.0);
        assert_relative_eq!(analysis.deviations.lower.get(i).unwrap(), 0.0);
    }
    for i in 0..30 {
        let threshold = analysis
            .thresholds
            .upper_or(i, analysis.config.threshold.fallback);
        assert!(threshold == 0.0 || threshold == 3.0);
    }
    assert!(analysis.episodes().is_empty());
}

#[test]
fn test_short_feed_has_no_window_statistics() {
    let values = present(&[20.0, 20.2, 20.1, 20.3, 20.2]);
    let analysis = Pipeline::default().run(&feed(&values));

    assert_eq!(analysis.len(), 5);
    assert_eq!(analysis.rolling.mean.defined_count(), 0);
    assert_eq!(analysis.rolling.max.defined_count(), 0);
    assert_eq!(analysis.deviations.upper.defined_count(), 0);
    assert_eq!(analysis.thresholds.upper.defined_count(), 0);
    assert!(analysis.labels().iter().all(|l| *l == StateLabel::Normal));
}

#[test]
fn test_critical_with_configured_fallback() {
    let mut values = vec![10.0; 12];
    values.push(10.6);

    let mut config = PipelineConfig::default();
    config.threshold.fallback = 0.5;
    let analysis = Pipeline::new(config).unwrap().run(&feed(&present(&values)));

    let row = analysis.row(12).unwrap();
    assert_relative_eq!(row.delta_upper.unwrap(), 0.55, epsilon = 1e-9);
    assert_eq!(row.upper_threshold, None);
    assert_eq!(row.state, StateLabel::Critical);
    assert!(matches!(
        row.reason,
        ClassificationReason::Critical {
            fallback_used: true,
            ..
        }
    ));

    // Default fallback of 3 keeps the same step Normal
    let default = Pipeline::default().run(&feed(&present(&values)));
    assert_eq!(default.label(12), Some(StateLabel::Normal));
}

#[test]
fn test_rerun_is_bit_identical() {
    let mut values: Vec<Option<f64>> = (0..200)
        .map(|i| Some(20.0 + (i as f64 * 0.3).sin() * 2.5))
        .collect();
    values[40] = None;
    values[41] = Some(0.0);
    values[120] = Some(35.0);

    let pipeline = Pipeline::default();
    let readings = feed(&values);
    let first = pipeline.run(&readings);
    let second = pipeline.run(&readings);

    assert_eq!(first, second);
    assert_eq!(first.fingerprint(), second.fingerprint());
}

#[test]
fn test_zero_policy_keeps_paths_distinct() {
    let mut values = present(&[5.0; 14]);
    values[13] = Some(0.0);
    values[6] = None;

    let strict = Pipeline::default().run(&feed(&values));
    assert_eq!(
        strict.classifications[13].reason,
        ClassificationReason::ZeroReading
    );

    let mut config = PipelineConfig::default();
    config.classifier.zero_policy = ZeroPolicy::Reading;
    let lenient = Pipeline::new(config).unwrap().run(&feed(&values));

    // A true zero is now a reading; the drop of 5 is a spike
    assert_eq!(lenient.label(13), Some(StateLabel::Spike));
    // An explicit gap is always Invalid
    assert_eq!(
        lenient.classifications[6].reason,
        ClassificationReason::MissingReading
    );
}

#[test]
fn test_timestamps_carried_into_rows_and_episodes() {
    let mut values = present(&[22.0; 16]);
    values[7] = None;
    values[8] = None;

    let analysis = Pipeline::default().run(&feed(&values));
    let episodes = analysis.episodes();

    assert_eq!(episodes[0].label, StateLabel::Invalid);
    assert_eq!(episodes[0].start_ms, 7 * FIVE_MINUTES_MS);
    assert_eq!(episodes[0].end_ms, 8 * FIVE_MINUTES_MS);
    assert_eq!(analysis.row(15).unwrap().timestamp_ms, 15 * FIVE_MINUTES_MS);
}

#[test]
fn test_rolling_window_from_duration() {
    let rolling = RollingConfig::from_duration(3_600_000, FIVE_MINUTES_MS).unwrap();
    assert_eq!(rolling.window, 12);

    let config = PipelineConfig {
        rolling: RollingConfig::from_duration(1_800_000, FIVE_MINUTES_MS).unwrap(),
        ..Default::default()
    };
    let analysis = Pipeline::new(config)
        .unwrap()
        .run(&feed(&present(&[20.0; 10])));
    assert_eq!(analysis.rolling.mean.first_defined(), Some(5));
}

#[test]
fn test_config_json_drives_pipeline() {
    let json = r#"{
        "rolling": { "window": 4 },
        "threshold": { "window": 3 },
        "classifier": { "zero_policy": "reading" }
    }"#;
    let config = PipelineConfig::from_json(json).unwrap();
    assert_eq!(config.threshold.sigma_multiplier, 2.0);

    let analysis = Pipeline::new(config).unwrap().run(&feed(&present(&[20.0; 8])));
    assert_eq!(analysis.rolling.mean.first_defined(), Some(3));
    assert_eq!(analysis.thresholds.upper.first_defined(), Some(5));
}
