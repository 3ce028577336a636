//! Data pipeline against on-disk tables
//!
//! Writes collar and merged CSVs to a temporary directory and runs the same
//! steps as the render flow: configuration, loading, sentinel replacement,
//! hole selection, legend and summary.

use std::fs;
use std::path::PathBuf;
use striplog::{
    ConfigOverrides, HoleLog, HoleSummary, Legend, LegendKind, StriplogConfig, StriplogError,
};
use tempfile::TempDir;

const COLLAR: &str = "\
holeid,x,y,max_depth
SPD0412,100.5,200.25,10
SPD0500,101.0,199.0,40
";

const MERGED: &str = "\
holeid,from,to,Litologia,Alteracion,FFEspaciamiento,RqdRQD,CUS,MO,CUFE
SPD0412,0,4,GRAV,A,1.2,75,0.12,0.010,0.30
SPD0412,4,8.5,FP,KB,-99,80,0.25,-99,0.45
SPD0412,8.5,12,ZZZ,,2.4,90,0.31,0.020,-99
SPD0500,0,6,SED,CL,1.0,60,0.05,0.001,0.10
";

struct Fixture {
    _dir: TempDir,
    collar: PathBuf,
    merged: PathBuf,
}

fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let collar = dir.path().join("collar.csv");
    let merged = dir.path().join("merged_data.csv");
    fs::write(&collar, COLLAR).unwrap();
    fs::write(&merged, MERGED).unwrap();
    Fixture {
        _dir: dir,
        collar,
        merged,
    }
}

fn config_for(fixture: &Fixture) -> StriplogConfig {
    let overrides = ConfigOverrides {
        collar: Some(fixture.collar.clone()),
        intervals: Some(fixture.merged.clone()),
        ..Default::default()
    };
    StriplogConfig::from_sources(None, &overrides, false).unwrap()
}

#[test]
fn test_pipeline_selects_configured_hole() {
    let fixture = fixture();
    let config = config_for(&fixture);
    let loader = config.loader().unwrap();

    let merged = loader.load_table(&config.input.intervals).unwrap();
    assert_eq!(merged.len(), 4);

    let log = HoleLog::select(
        &merged,
        &config.columns,
        &config.hole_id,
        &config.parameter_names(),
    )
    .unwrap();

    assert_eq!(log.hole_id, "SPD0412");
    assert_eq!(log.intervals.len(), 3);
    assert_eq!(log.intervals[1].mid_depth(), 6.25);
    // sentinels became missing, other values untouched
    assert_eq!(log.intervals[1].values[0], None);
    assert_eq!(log.intervals[1].values[1], Some(80.0));
    assert_eq!(log.intervals[2].alteration, None);

    let range = log.depth_range().unwrap();
    assert_eq!(range.axis_limits(), (12.0, 0.0));
}

#[test]
fn test_legend_skips_unmapped_codes() {
    let fixture = fixture();
    let config = config_for(&fixture);
    let merged = config
        .loader()
        .unwrap()
        .load_table(&config.input.intervals)
        .unwrap();
    let log = HoleLog::select(
        &merged,
        &config.columns,
        &config.hole_id,
        &config.parameter_names(),
    )
    .unwrap();

    let legend = Legend::assemble(
        &log,
        &config.lithology_map().unwrap(),
        &config.alteration_map().unwrap(),
        &config.parameters,
    )
    .unwrap();

    let labels = |title: &str| -> Vec<String> {
        legend
            .section(title)
            .unwrap()
            .entries
            .iter()
            .map(|e| e.label.clone())
            .collect()
    };
    // legend follows color-map order, not appearance order
    assert_eq!(labels("Lithology"), ["GRAV", "FP"]);
    assert_eq!(labels("Alteration"), ["A", "KB"]);
    assert_eq!(labels("Parameters").len(), 5);
    assert!(legend
        .section("Parameters")
        .unwrap()
        .entries
        .iter()
        .all(|e| e.kind == LegendKind::Line));
}

#[test]
fn test_summary_reports_collar_overrun() {
    let fixture = fixture();
    let config = config_for(&fixture);
    let loader = config.loader().unwrap();
    let merged = loader.load_table(&config.input.intervals).unwrap();
    let collars = loader.load_table(&config.input.collar).unwrap();

    let log = HoleLog::select(
        &merged,
        &config.columns,
        &config.hole_id,
        &config.parameter_names(),
    )
    .unwrap();
    let summary = HoleSummary::build(&log, &collars, &config.columns);

    assert_eq!(summary.collar_max_depth, Some(10.0));
    assert_eq!(summary.depth_overrun(), Some(2.0));
    let cufe = summary.parameters.iter().find(|p| p.name == "CUFE").unwrap();
    assert_eq!((cufe.present, cufe.missing), (2, 1));
}

#[test]
fn test_missing_input_file_is_reported() {
    let fixture = fixture();
    let mut config = config_for(&fixture);
    config.input.intervals = fixture.merged.with_file_name("absent.csv");

    let err = config
        .loader()
        .unwrap()
        .load_table(&config.input.intervals)
        .unwrap_err();
    assert!(matches!(err, StriplogError::FileOpen { .. }));
}

#[test]
fn test_missing_column_is_reported() {
    let fixture = fixture();
    let mut config = config_for(&fixture);
    config.columns.lithology = "Lithology".to_string();
    let merged = config
        .loader()
        .unwrap()
        .load_table(&config.input.intervals)
        .unwrap();

    let err = HoleLog::select(&merged, &config.columns, &config.hole_id, &[]).unwrap_err();
    assert!(matches!(err, StriplogError::MissingColumn { ref column } if column == "Lithology"));
}
