//! solar-insights - fleet analytics over daily solar plant telemetry
//!
//! # Usage
//!
//! ```bash
//! # Analyse power output for every plant
//! solar-insights --plants plants.csv --readings readings.csv
//!
//! # Several metrics, gap filling, full JSON result on stdout
//! solar-insights --plants plants.csv --readings readings.csv \
//!     --metric power_output_kwh --metric efficiency_pct --fill-gaps --json
//!
//! # Seed an editable config file from the defaults
//! solar-insights --write-config solar_insights.toml
//!
//! # Generate a synthetic fleet to try it on
//! synthetic-fleet --plants 5 --days 730 --seed 42
//! ```
//!
//! # Environment Variables
//!
//! - `SOLAR_INSIGHTS_CONFIG`: Path to the analytics TOML config
//! - `RUST_LOG`: Logging level (default: info)

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{info, warn};

use solar_insights::pipeline::{CsvPlantSource, CsvReadingSource};
use solar_insights::{AnalyticsConfig, Pipeline, PipelineResult, RunOptions};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "solar-insights")]
#[command(about = "Baselines, anomalies, patterns and insights for solar plant fleets")]
#[command(version)]
struct CliArgs {
    /// Plant registry CSV (plant_id, plant_name, capacity_kw, location,
    /// installation_date, equipment_type)
    #[arg(long, value_name = "CSV", required_unless_present_any = ["print_config", "write_config"])]
    plants: Option<PathBuf>,

    /// Daily readings CSV
    #[arg(long, value_name = "CSV", required_unless_present_any = ["print_config", "write_config"])]
    readings: Option<PathBuf>,

    /// Metric to analyse; repeat for several (default from config)
    #[arg(long = "metric", value_name = "NAME")]
    metrics: Vec<String>,

    /// Skip business-rule validation of readings
    #[arg(long)]
    no_validate: bool,

    /// Fill missing calendar days before analysis
    #[arg(long)]
    fill_gaps: bool,

    /// Analytics config file (overrides SOLAR_INSIGHTS_CONFIG)
    #[arg(long, value_name = "TOML")]
    config: Option<PathBuf>,

    /// Print the full result as JSON instead of a summary
    #[arg(long)]
    json: bool,

    /// Emit logs as JSON lines
    #[arg(long, env = "SOLAR_INSIGHTS_LOG_JSON")]
    log_json: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,

    /// Write the effective configuration to a TOML file and exit
    #[arg(long, value_name = "TOML")]
    write_config: Option<PathBuf>,
}

fn init_logging(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_logging(args.log_json);

    let config = match &args.config {
        Some(path) => AnalyticsConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => AnalyticsConfig::load(),
    };

    if args.print_config {
        print!("{}", config.to_toml().context("Failed to serialize config")?);
        return Ok(());
    }
    if let Some(path) = &args.write_config {
        config
            .save_to_file(path)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        return Ok(());
    }

    let (Some(plants), Some(readings)) = (&args.plants, &args.readings) else {
        bail!("--plants and --readings are required to run an analysis");
    };

    let metrics = if args.metrics.is_empty() {
        config.pipeline.metrics.clone()
    } else {
        args.metrics.clone()
    };

    let mut options = RunOptions::from(&config.pipeline);
    if args.no_validate {
        options.validate = false;
    }
    if args.fill_gaps {
        options.fill_gaps = true;
    }

    info!(
        plants = %plants.display(),
        readings = %readings.display(),
        metrics = ?metrics,
        "Starting analysis"
    );

    let pipeline = Pipeline::new(&config);
    let result = pipeline.execute(
        &CsvPlantSource::new(plants),
        &CsvReadingSource::new(readings),
        &metrics,
        &options,
    );

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&result).context("Failed to serialize result")?
        );
    } else {
        print_summary(&result);
    }

    if !result.success() {
        warn!(errors = result.errors.len(), "Run finished with errors");
        std::process::exit(1);
    }
    Ok(())
}

// ============================================================================
// Summary Output
// ============================================================================

fn print_summary(result: &PipelineResult) {
    let anomalies = result.anomaly_summary();
    let duration_ms = (result.finished_at - result.started_at).num_milliseconds();

    println!("═══════════════════════════════════════════════════════════");
    println!("  SOLAR INSIGHTS RUN {}", result.run_id);
    println!("═══════════════════════════════════════════════════════════");
    println!("  Plants:    {}", result.plants.len());
    println!("  Readings:  {}", result.total_readings());
    println!("  Anomalies: {}", anomalies.total);
    for (severity, count) in &anomalies.by_severity {
        println!("    {severity:<10} {count}");
    }
    println!("  Patterns:  {} ({} fleet-wide)", result.total_patterns(), result.fleet_patterns.len());
    println!("  Insights:  {}", result.total_insights());
    println!("  Duration:  {duration_ms} ms");
    println!();

    if !result.health_scores.is_empty() {
        println!("  PLANT HEALTH");
        for (plant_id, score) in &result.health_scores {
            let name = result.plants.get(plant_id).map_or("", |p| p.plant_name.as_str());
            let count = anomalies.by_plant.get(plant_id).map_or(0, |p| p.count);
            println!(
                "    {plant_id:<12} {name:<24} {:>5.1}  {:<9}  {count} anomalies",
                score.overall_score, score.health_status
            );
        }
        println!();
    }

    for fleet in &result.fleet_patterns {
        println!(
            "  FLEET-WIDE: {} in {} across {}",
            fleet.pattern_type,
            fleet.metric,
            fleet.plants.join(", ")
        );
    }

    if !result.warnings.is_empty() {
        println!("  WARNINGS ({})", result.warnings.len());
        for w in &result.warnings {
            println!("    {w}");
        }
    }
    if !result.errors.is_empty() {
        println!("  ERRORS ({})", result.errors.len());
        for e in &result.errors {
            println!("    {e}");
        }
    }
    println!("  Status: {}", if result.success() { "OK" } else { "FAILED" });
}
