//! RideLoad - command-line host
//!
//! Reads a workout CSV, resolves FTP from `--ftp` or the saved FTP file, and
//! prints Normalized Power and TSS.
//!
//! # Usage
//!
//! ```bash
//! rideload workout.csv --ftp 250 --save-ftp
//! rideload workout.csv --power-column "Output - Workout" --export
//! RUST_LOG=debug rideload workout.csv --json
//! ```

use anyhow::{bail, Context, Result};
use clap::Parser;
use rideload::analysis::{AnalysisOptions, TimingMode, WorkoutAnalysis};
use rideload::export::{export_analysis_csv, export_summary_csv, generate_csv_filename, write_csv_file};
use rideload::metrics::WindowPolicy;
use rideload::storage::config::{load_config, load_config_from};
use rideload::storage::FtpStore;
use rideload::table::read_csv_file;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "rideload")]
#[command(about = "Normalized Power and Training Stress Score from a workout CSV")]
#[command(version)]
struct CliArgs {
    /// Workout CSV with a header row
    input: PathBuf,

    /// Functional Threshold Power in watts (falls back to the saved FTP file)
    #[arg(long, env = "RIDELOAD_FTP")]
    ftp: Option<f64>,

    /// Persist --ftp to the FTP file for later runs
    #[arg(long, requires = "ftp")]
    save_ftp: bool,

    /// Use this FTP file instead of the one in the data directory
    #[arg(long)]
    ftp_file: Option<PathBuf>,

    /// Use this config file instead of the one in the data directory
    #[arg(long)]
    config: Option<PathBuf>,

    /// Power column name (skips detection)
    #[arg(long)]
    power_column: Option<String>,

    /// Time column name (skips detection)
    #[arg(long, conflicts_with = "synthetic_time")]
    time_column: Option<String>,

    /// Ignore time columns and assume one sample per second
    #[arg(long)]
    synthetic_time: bool,

    /// Average partial windows at the start instead of skipping them
    #[arg(long)]
    lenient: bool,

    /// Rolling window length in samples
    #[arg(long)]
    window: Option<usize>,

    /// Write the table with derived columns (default: <input>_analyzed.csv)
    #[arg(long, num_args = 0..=1)]
    export: Option<Option<PathBuf>>,

    /// Write a one-row summary CSV
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();
    tracing::debug!("Starting RideLoad v{}", env!("CARGO_PKG_VERSION"));

    let config = match &args.config {
        Some(path) => load_config_from(path, rideload::storage::config::get_data_dir()),
        None => load_config(),
    }
    .context("Failed to load configuration")?;

    let store = FtpStore::new(args.ftp_file.clone().unwrap_or_else(|| config.ftp_path()));
    let ftp = match args.ftp {
        Some(ftp) => {
            if args.save_ftp {
                store.save(ftp).context("Failed to save FTP")?;
            }
            Some(ftp)
        }
        None => store
            .load()
            .with_context(|| format!("Failed to read FTP from {}", store.path().display()))?,
    };
    if ftp.is_none() {
        bail!(
            "No FTP given: pass --ftp <watts> (add --save-ftp to remember it in {})",
            store.path().display()
        );
    }

    let mut options: AnalysisOptions = config.analysis_options();
    options.overrides.power = args.power_column.clone();
    options.overrides.time = args.time_column.clone();
    if args.synthetic_time {
        options.timing = TimingMode::Synthetic;
    }
    if args.lenient {
        options.window_policy = WindowPolicy::Lenient;
    }
    if let Some(window) = args.window {
        options.window_size = window;
    }

    let table = read_csv_file(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let analysis = WorkoutAnalysis::run(table, &options, ftp)
        .with_context(|| format!("Failed to analyze {}", args.input.display()))?;

    for notice in &analysis.selection.notices {
        tracing::warn!("{}", notice);
    }

    print_results(&analysis, &args)?;

    if let Some(target) = &args.export {
        let path = target.clone().unwrap_or_else(|| {
            args.input
                .with_file_name(generate_csv_filename(&args.input))
        });
        let csv = export_analysis_csv(&analysis, config.export.float_precision)?;
        write_csv_file(&csv, &path).with_context(|| format!("Failed to write {}", path.display()))?;
    }

    if let Some(path) = &args.summary {
        let ftp = ftp.unwrap_or_default();
        let csv = export_summary_csv(&analysis, ftp)?;
        write_csv_file(&csv, path).with_context(|| format!("Failed to write {}", path.display()))?;
    }

    Ok(())
}

fn print_results(analysis: &WorkoutAnalysis, args: &CliArgs) -> Result<()> {
    let metrics = &analysis.metrics;

    if args.json {
        let report = serde_json::json!({
            "input": args.input,
            "samples": analysis.table.row_count(),
            "columns": &analysis.selection,
            "time_strategy": analysis.time_strategy,
            "metrics": metrics,
            "display": {
                "normalized_power": metrics.display_normalized_power(),
                "tss": metrics.display_tss(),
            },
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Workout Summary");
    println!(
        "  Power column:          {}",
        analysis.selection.power.name
    );
    println!(
        "  Time column:           {} ({})",
        analysis
            .selection
            .time
            .as_ref()
            .map_or("none", |t| t.name.as_str()),
        analysis.time_strategy
    );
    println!("  Duration:              {:.1} min", metrics.duration_hours * 60.0);
    println!("  Average Power:         {:.0} W", metrics.average_power);
    println!(
        "  Normalized Power (NP): {} W",
        metrics.display_normalized_power()
    );
    println!("  Intensity Factor:      {:.2}", metrics.intensity_factor);
    println!("  Training Stress Score: {}", metrics.display_tss());
    Ok(())
}
