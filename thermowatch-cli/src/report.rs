// Thermowatch CLI - Analysis report
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Per-reading CSV report and JSON run summary.

use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use thermowatch::{Analysis, AnalysisRow, Episode, PipelineConfig, StateLabel, StateSummary};
use tracing::info;

/// CSV report columns, in order.
pub const REPORT_COLUMNS: [&str; 12] = [
    "timestamp_ms",
    "value",
    "rolling_mean",
    "rolling_max",
    "rolling_min",
    "delta_upper",
    "delta_lower",
    "upper_threshold",
    "lower_threshold",
    "first_diff",
    "second_diff",
    "state",
];

/// Report errors.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// JSON summary of one run.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    pub config: PipelineConfig,
    pub states: StateSummary,
    pub alert_ratio: f64,
    pub episodes: Vec<Episode>,
    /// xxh64 of every series, hex.
    pub fingerprint: String,
}

impl RunSummary {
    pub fn new(analysis: &Analysis, input: Option<&Path>) -> Self {
        let states = analysis.summary();
        Self {
            version: analysis.version.clone(),
            input: input.map(|p| p.display().to_string()),
            config: analysis.config.clone(),
            alert_ratio: states.alert_ratio(),
            states,
            episodes: analysis.episodes(),
            fingerprint: format!("{:016x}", analysis.fingerprint()),
        }
    }
}

/// Write the per-reading report to any writer.
pub fn write_rows<W: Write>(analysis: &Analysis, writer: W) -> Result<(), ReportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(REPORT_COLUMNS)?;

    for row in analysis.rows() {
        csv_writer.write_record(record(&row))?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Write the per-reading report to a file, or stdout when `path` is `None`.
pub fn write_csv(analysis: &Analysis, path: Option<&Path>) -> Result<(), ReportError> {
    match path {
        Some(path) => {
            write_rows(analysis, BufWriter::new(File::create(path)?))?;
            info!("Wrote {} rows to {}", analysis.len(), path.display());
        }
        None => write_rows(analysis, io::stdout().lock())?,
    }
    Ok(())
}

/// Write the JSON run summary.
pub fn write_summary(summary: &RunSummary, path: &Path) -> Result<(), ReportError> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, summary)?;
    info!("Wrote summary to {}", path.display());
    Ok(())
}

/// Log label counts and episodes.
pub fn log_summary(summary: &RunSummary) {
    let states = &summary.states;
    info!(
        "{} readings, {} missing, alert ratio {:.1}%",
        states.total,
        states.missing,
        summary.alert_ratio * 100.0
    );
    for label in StateLabel::ALL {
        info!("  {:<8} {}", label, states.count(label));
    }
    for episode in summary.episodes.iter().filter(|e| e.label != StateLabel::Invalid) {
        info!(
            "  {} from index {} to {} ({} readings)",
            episode.label,
            episode.start_index,
            episode.end_index,
            episode.sample_count()
        );
    }
    info!("Fingerprint {}", summary.fingerprint);
}

fn record(row: &AnalysisRow) -> [String; 12] {
    [
        row.timestamp_ms.to_string(),
        cell(row.value),
        cell(row.rolling_mean),
        cell(row.rolling_max),
        cell(row.rolling_min),
        cell(row.delta_upper),
        cell(row.delta_lower),
        cell(row.upper_threshold),
        cell(row.lower_threshold),
        cell(row.first_diff),
        cell(row.second_diff),
        row.state.to_string(),
    ]
}

fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
