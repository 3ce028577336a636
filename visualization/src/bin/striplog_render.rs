//! Render one drillhole's striplog figure
//!
//! Loads the collar and merged interval tables, replaces the missing-value
//! sentinel, selects the configured hole and writes the composite figure.

use anyhow::{Context, Result};
use clap::{Parser, ValueHint};
use serde::Serialize;
use std::path::PathBuf;
use striplog::logging::{init_logger, LogFormat};
use striplog::{ConfigOverrides, HoleLog, StriplogConfig};
use striplog_visualization::{export_figure, ExportConfig, FigureData, RenderPlan};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "striplog-render", version, about = "Render a drillhole striplog figure")]
struct Cli {
    /// Configuration file (defaults to ./striplog.toml when present)
    #[arg(short, long, env = "STRIPLOG_CONFIG", value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Drillhole to plot
    #[arg(long)]
    hole: Option<String>,

    /// Merged interval table
    #[arg(long, value_hint = ValueHint::FilePath)]
    intervals: Option<PathBuf>,

    /// Collar table
    #[arg(long, value_hint = ValueHint::FilePath)]
    collar: Option<PathBuf>,

    /// Figure path; `.svg` selects vector output
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,

    /// Raster resolution
    #[arg(long)]
    dpi: Option<u32>,

    /// Also write the resolved figure plan as JSON
    #[arg(long, value_hint = ValueHint::FilePath)]
    plan_json: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,

    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    log_format: LogFormat,
}

#[derive(Serialize)]
struct PlanDocument<'a> {
    figure: &'a FigureData,
    layout: RenderPlan,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose, cli.log_format);

    let overrides = ConfigOverrides {
        hole_id: cli.hole,
        collar: cli.collar,
        intervals: cli.intervals,
        output: cli.output,
        dpi: cli.dpi,
    };
    let config = StriplogConfig::load(cli.config.as_deref(), &overrides)
        .context("loading configuration")?;
    let loader = config.loader()?;

    let collars = loader
        .load_table(&config.input.collar)
        .with_context(|| format!("loading collar table {}", config.input.collar.display()))?;
    info!(rows = collars.len(), columns = ?collars.headers(), "collar table loaded");

    let merged = loader
        .load_table(&config.input.intervals)
        .with_context(|| {
            format!("loading interval table {}", config.input.intervals.display())
        })?;
    info!(rows = merged.len(), columns = ?merged.headers(), "interval table loaded");

    let lithologies = merged.unique_values(&config.columns.lithology)?;
    let alterations = merged.unique_values(&config.columns.alteration)?;
    info!(?lithologies, "lithology codes in the dataset");
    info!(?alterations, "alteration codes in the dataset");

    let log = HoleLog::select(
        &merged,
        &config.columns,
        &config.hole_id,
        &config.parameter_names(),
    )?;
    info!(hole_id = %log.hole_id, intervals = log.intervals.len(), "hole selected");

    let figure = FigureData::prepare(&log, &config)
        .with_context(|| format!("preparing figure for hole {}", config.hole_id))?;
    let export = ExportConfig::from_config(&config)?;

    if let Some(path) = &cli.plan_json {
        let document = PlanDocument {
            figure: &figure,
            layout: export.plan(&figure)?,
        };
        std::fs::write(path, serde_json::to_string_pretty(&document)?)
            .with_context(|| format!("writing figure plan {}", path.display()))?;
        info!(path = %path.display(), "figure plan written");
    }

    export_figure(&figure, export, &config.output.path)
        .with_context(|| format!("writing figure {}", config.output.path.display()))?;

    Ok(())
}
