//! Inspect the drillhole tables before plotting
//!
//! Prints the merged table's columns and first rows (before and after the
//! missing-value sentinel is replaced), the distinct lithology and alteration
//! codes, and a summary of the configured hole.

use anyhow::{Context, Result};
use clap::{Parser, ValueHint};
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table as ComfyTable};
use serde::Serialize;
use std::path::PathBuf;
use striplog::logging::{init_logger, LogFormat};
use striplog::{ConfigOverrides, CsvTableLoader, HoleLog, HoleSummary, StriplogConfig, Table};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "striplog-inspect", version, about = "Inspect drillhole tables before plotting")]
struct Cli {
    /// Configuration file (defaults to ./striplog.toml when present)
    #[arg(short, long, env = "STRIPLOG_CONFIG", value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Drillhole to summarize
    #[arg(long)]
    hole: Option<String>,

    /// Merged interval table
    #[arg(long, value_hint = ValueHint::FilePath)]
    intervals: Option<PathBuf>,

    /// Collar table
    #[arg(long, value_hint = ValueHint::FilePath)]
    collar: Option<PathBuf>,

    /// Rows to preview
    #[arg(long, default_value_t = 5)]
    rows: usize,

    /// Emit one JSON document instead of tables
    #[arg(long)]
    json: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,

    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    log_format: LogFormat,
}

#[derive(Debug, Serialize)]
struct InspectReport {
    columns: Vec<String>,
    rows: usize,
    sentinels_replaced: usize,
    missing_per_column: Vec<(String, usize)>,
    lithologies: Vec<Option<String>>,
    alterations: Vec<Option<String>>,
    hole: HoleSummary,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose, cli.log_format);

    let overrides = ConfigOverrides {
        hole_id: cli.hole.clone(),
        collar: cli.collar.clone(),
        intervals: cli.intervals.clone(),
        ..Default::default()
    };
    let config = StriplogConfig::load(cli.config.as_deref(), &overrides)
        .context("loading configuration")?;

    let raw_loader = CsvTableLoader::new().with_delimiter(config.delimiter()?);
    let mut merged = raw_loader
        .load_table(&config.input.intervals)
        .context("loading interval table")?;

    if !cli.json {
        println!("Columns: {:?}", merged.headers());
        print_head(&merged, cli.rows);
    }

    let sentinels_replaced = merged.normalize_sentinels(config.sentinel());
    info!(sentinels_replaced, "replaced missing-value sentinels");

    let collars = config
        .loader()?
        .load_table(&config.input.collar)
        .context("loading collar table")?;

    let lithologies = merged.unique_values(&config.columns.lithology)?;
    let alterations = merged.unique_values(&config.columns.alteration)?;

    let log = HoleLog::select(
        &merged,
        &config.columns,
        &config.hole_id,
        &config.parameter_names(),
    )?;
    let summary = HoleSummary::build(&log, &collars, &config.columns);

    if cli.json {
        let report = InspectReport {
            columns: merged.headers().to_vec(),
            rows: merged.len(),
            sentinels_replaced,
            missing_per_column: merged.missing_counts(),
            lithologies,
            alterations,
            hole: summary,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_head(&merged, cli.rows);
    print_codes("Unique lithologies in the dataset:", &lithologies);
    print_codes("Unique alteration in the dataset:", &alterations);
    print_summary(&summary);

    Ok(())
}

fn print_head(table: &Table, rows: usize) {
    let mut out = ComfyTable::new();
    out.load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(table.headers().to_vec());

    for row in table.head(rows) {
        out.add_row(row.iter().map(|cell| cell.to_string()).collect::<Vec<_>>());
    }
    println!("{out}");
}

fn print_codes(title: &str, codes: &[Option<String>]) {
    println!("{title}");
    for code in codes {
        println!("{}", code.as_deref().unwrap_or("NaN"));
    }
}

fn print_summary(summary: &HoleSummary) {
    let number = |v: Option<f64>| v.map_or("-".to_string(), |d| format!("{:.2}", d));

    let mut out = ComfyTable::new();
    out.load_preset(UTF8_FULL)
        .set_header(vec!["Hole", "Intervals", "Top", "Bottom", "Collar max depth"]);
    out.add_row(vec![
        summary.hole_id.clone(),
        summary.intervals.to_string(),
        number(summary.top),
        number(summary.bottom),
        number(summary.collar_max_depth),
    ]);
    println!("{out}");

    if let Some(overrun) = summary.depth_overrun() {
        println!("Logged intervals extend {:.2} m below the collar max depth", overrun);
    }

    let mut params = ComfyTable::new();
    params
        .load_preset(UTF8_FULL)
        .set_header(vec!["Parameter", "Present", "Missing", "Min", "Max"]);
    for p in &summary.parameters {
        params.add_row(vec![
            p.name.clone(),
            p.present.to_string(),
            p.missing.to_string(),
            number(p.min),
            number(p.max),
        ]);
    }
    println!("{params}");
}
