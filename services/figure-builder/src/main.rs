//! Climate dashboard figure builder.
//!
//! Reads the CFS forecast files, aggregates them over the selected forecast
//! span and writes the chart and map documents for every variable.

use anyhow::{Context, Result};
use clap::Parser;
use dashboard_common::{BoundingBox, ForecastSpan};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use figure_builder::{run, ConfigOverrides, FigureConfig};

#[derive(Parser, Debug)]
#[command(name = "figure-builder")]
#[command(about = "Render climate dashboard charts and maps from CFS forecast files")]
struct Args {
    /// YAML configuration file (built-in defaults when omitted)
    #[arg(short, long, env = "FIGURE_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding the input NetCDF files
    #[arg(long, env = "FIGURE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Existing directory for the HTML documents
    #[arg(short, long, env = "FIGURE_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Forecast span: day, week or month
    #[arg(short, long, env = "FIGURE_SPAN")]
    span: Option<ForecastSpan>,

    /// Crop box as "min_lon,min_lat,max_lon,max_lat"
    #[arg(long, env = "FIGURE_BBOX", value_parser = parse_bbox)]
    bbox: Option<BoundingBox>,

    /// Log level
    #[arg(long, default_value = "info", env = "FIGURE_LOG_LEVEL")]
    log_level: String,
}

fn parse_bbox(s: &str) -> Result<BoundingBox, dashboard_common::bbox::BboxParseError> {
    BoundingBox::from_csv(s)
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = match &args.config {
        Some(path) => FigureConfig::from_yaml_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => FigureConfig::default(),
    };
    config.apply_overrides(ConfigOverrides {
        data_dir: args.data_dir,
        output_dir: args.output_dir,
        span: args.span,
        bbox: args.bbox,
    });

    info!(
        data_dir = %config.data_dir.display(),
        output_dir = %config.output_dir.display(),
        span = %config.span,
        variables = config.variables.len(),
        "Starting figure builder"
    );

    let summary = run(&config)?;

    info!(
        artifacts = summary.artifacts.len(),
        window_start = %summary.window.start,
        window_end = %summary.window.end,
        "Figures complete"
    );

    Ok(())
}
