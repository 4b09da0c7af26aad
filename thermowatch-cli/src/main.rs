// Thermowatch CLI - Temperature feed health analyzer
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! # Thermowatch CLI
//!
//! Classifies every reading of a temperature feed and writes the per-reading
//! report, or generates synthetic feeds to try it on.
//!
//! ## Usage
//!
//! ```bash
//! # Generate a day of readings with injected faults
//! thermowatch generate --output feed.csv --scenario mixed --seed 42
//!
//! # Analyze it
//! thermowatch analyze --input feed.csv --output report.csv --summary summary.json
//! ```

mod loader;
mod report;

use clap::{Args, Parser, Subcommand};
use loader::{load_csv, LoadError, LoaderConfig};
use report::{log_summary, write_csv, write_summary, ReportError, RunSummary};
use std::path::PathBuf;
use std::process::ExitCode;
use thermowatch::{Pipeline, PipelineConfig, ThermoError, ZeroPolicy};
use thermowatch_testdata::{FeedError, GeneratorConfig, Scenario};
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

/// Thermowatch temperature feed analyzer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify every reading of a CSV feed
    Analyze(AnalyzeArgs),
    /// Generate a synthetic feed
    Generate(GenerateArgs),
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// CSV feed to analyze
    #[arg(short, long)]
    input: PathBuf,

    /// JSON pipeline configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Per-reading CSV report (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON run summary
    #[arg(short, long)]
    summary: Option<PathBuf>,

    /// Name of the time column
    #[arg(long, default_value = "Time")]
    time_column: String,

    /// Name of the temperature column
    #[arg(long, default_value = "Temperature")]
    value_column: String,

    /// Rolling window in samples
    #[arg(long)]
    rolling_window: Option<usize>,

    /// Threshold window in samples
    #[arg(long)]
    threshold_window: Option<usize>,

    /// Threshold used while the adaptive one is undefined
    #[arg(long)]
    fallback: Option<f64>,

    /// Treat an exact zero as a reading instead of a sensor fault
    #[arg(long)]
    zero_is_reading: bool,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// CSV file to write
    #[arg(short, long)]
    output: PathBuf,

    /// Number of samples
    #[arg(short = 'n', long, default_value = "288")]
    samples: usize,

    /// Seconds between samples
    #[arg(long, default_value = "300")]
    interval_secs: u64,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Fault scenario (nominal, spike, drift, dropout, mixed)
    #[arg(long, default_value = "nominal")]
    scenario: Scenario,

    /// JSON manifest of the injected faults
    #[arg(long)]
    manifest: Option<PathBuf>,
}

/// Command errors.
#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{0}")]
    Load(#[from] LoadError),

    #[error("{0}")]
    Report(#[from] ReportError),

    #[error("{0}")]
    Pipeline(#[from] ThermoError),

    #[error("{0}")]
    Feed(#[from] FeedError),

    #[error("Cannot read {path}: {source}")]
    Config {
        path: PathBuf,
        source: std::io::Error,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = match cli.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };
        EnvFilter::from_default_env().add_directive(level.into())
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Command::Analyze(args) => analyze(args),
        Command::Generate(args) => generate(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn analyze(args: AnalyzeArgs) -> Result<(), CliError> {
    info!("Thermowatch v{}", thermowatch::VERSION);

    let config = pipeline_config(&args)?;
    let pipeline = Pipeline::new(config)?;

    let loader_config = LoaderConfig {
        time_column: args.time_column,
        value_column: args.value_column,
    };
    let readings = load_csv(&args.input, &loader_config)?;

    let analysis = pipeline.run(&readings);
    let summary = RunSummary::new(&analysis, Some(args.input.as_path()));

    write_csv(&analysis, args.output.as_deref())?;
    if let Some(path) = &args.summary {
        write_summary(&summary, path)?;
    }
    log_summary(&summary);

    Ok(())
}

/// File configuration, then command-line overrides.
fn pipeline_config(args: &AnalyzeArgs) -> Result<PipelineConfig, CliError> {
    let mut config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path).map_err(|source| CliError::Config {
                path: path.clone(),
                source,
            })?;
            PipelineConfig::from_json(&json)?
        }
        None => PipelineConfig::default(),
    };

    if let Some(window) = args.rolling_window {
        config.rolling.window = window;
    }
    if let Some(window) = args.threshold_window {
        config.threshold.window = window;
    }
    if let Some(fallback) = args.fallback {
        config.threshold.fallback = fallback;
    }
    if args.zero_is_reading {
        config.classifier.zero_policy = ZeroPolicy::Reading;
    }

    Ok(config)
}

fn generate(args: GenerateArgs) -> Result<(), CliError> {
    let mut config = GeneratorConfig::new()
        .with_num_samples(args.samples)
        .with_sample_interval_secs(args.interval_secs);
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    let feed = args.scenario.generate(&config);
    feed.to_csv(&args.output)?;
    info!(
        "Generated {} '{}' samples into {} ({} faults)",
        feed.len(),
        args.scenario,
        args.output.display(),
        feed.metadata.anomalies.len()
    );

    if let Some(path) = &args.manifest {
        feed.write_manifest(path)?;
        info!("Wrote manifest to {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn analyze_args(input: PathBuf) -> AnalyzeArgs {
        AnalyzeArgs {
            input,
            config: None,
            output: None,
            summary: None,
            time_column: "Time".to_string(),
            value_column: "Temperature".to_string(),
            rolling_window: None,
            threshold_window: None,
            fallback: None,
            zero_is_reading: false,
        }
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from([
            "thermowatch",
            "analyze",
            "--input",
            "feed.csv",
            "--rolling-window",
            "24",
            "--zero-is-reading",
        ])
        .unwrap();
        match cli.command {
            Command::Analyze(args) => {
                assert_eq!(args.rolling_window, Some(24));
                assert!(args.zero_is_reading);
                assert_eq!(args.time_column, "Time");
            }
            Command::Generate(_) => panic!("expected analyze"),
        }

        let cli = Cli::try_parse_from([
            "thermowatch",
            "generate",
            "-o",
            "feed.csv",
            "--scenario",
            "dropout",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Command::Generate(GenerateArgs {
                scenario: Scenario::Dropout,
                samples: 288,
                ..
            })
        ));

        assert!(
            Cli::try_parse_from(["thermowatch", "generate", "-o", "x", "--scenario", "hail"])
                .is_err()
        );
    }

    #[test]
    fn test_config_overrides() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"rolling": {"window": 6}, "threshold": {"fallback": 2.5}}"#)
            .unwrap();

        let mut args = analyze_args(PathBuf::from("feed.csv"));
        args.config = Some(path);
        args.threshold_window = Some(4);
        args.zero_is_reading = true;

        let config = pipeline_config(&args).unwrap();
        assert_eq!(config.rolling.window, 6);
        assert_eq!(config.threshold.window, 4);
        assert_eq!(config.threshold.fallback, 2.5);
        assert_eq!(config.classifier.zero_policy, ZeroPolicy::Reading);
    }

    #[test]
    fn test_generate_then_analyze() {
        let dir = TempDir::new().unwrap();
        let feed = dir.path().join("feed.csv");
        let manifest = dir.path().join("feed.json");
        let report = dir.path().join("report.csv");
        let summary = dir.path().join("summary.json");

        generate(GenerateArgs {
            output: feed.clone(),
            samples: 144,
            interval_secs: 300,
            seed: Some(42),
            scenario: Scenario::Dropout,
            manifest: Some(manifest.clone()),
        })
        .unwrap();
        assert!(manifest.exists());

        let mut args = analyze_args(feed);
        args.output = Some(report.clone());
        args.summary = Some(summary.clone());
        analyze(args).unwrap();

        let mut reader = csv::Reader::from_path(&report).unwrap();
        assert_eq!(reader.records().count(), 144);

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&summary).unwrap()).unwrap();
        assert_eq!(json["states"]["total"], 144);
        assert!(json["states"]["invalid"].as_u64().unwrap() > 0);
    }

    #[test]
    fn test_invalid_override_rejected() {
        let dir = TempDir::new().unwrap();
        let feed = dir.path().join("feed.csv");
        std::fs::write(&feed, "Time,Temperature\n1000,20.0\n").unwrap();

        let mut args = analyze_args(feed);
        args.rolling_window = Some(0);
        assert!(matches!(analyze(args), Err(CliError::Pipeline(_))));
    }
}
