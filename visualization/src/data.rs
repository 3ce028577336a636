//! Figure preparation: turns a selected hole into drawable columns and a legend

use crate::elements::{ParameterColumn, StripColumn, StripKind};
use crate::errors::Result;
use serde::Serialize;
use striplog::{DepthRange, HoleLog, Legend, StriplogConfig};
use tracing::{debug, warn};

/// Everything needed to draw one drillhole, independent of the backend
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FigureData {
    pub hole_id: String,
    pub title: String,
    /// Shared depth axis of every column
    pub depth: DepthRange,
    /// Lithology then alteration
    pub strips: Vec<StripColumn>,
    /// One column per configured parameter, in configuration order
    pub parameters: Vec<ParameterColumn>,
    pub legend: Legend,
}

impl FigureData {
    /// Build the figure for `log` using the color maps and parameters of `config`
    ///
    /// `log` must have been selected with `config.parameter_names()`.
    pub fn prepare(log: &HoleLog, config: &StriplogConfig) -> Result<Self> {
        let depth = log.depth_range()?;
        let lithology = config.lithology_map()?;
        let alteration = config.alteration_map()?;

        let strips = vec![
            StripColumn::build(log, StripKind::Lithology, &lithology),
            StripColumn::build(log, StripKind::Alteration, &alteration),
        ];

        let mut parameters = Vec::with_capacity(config.parameters.len());
        for spec in &config.parameters {
            let Some(index) = log.parameters.iter().position(|p| *p == spec.name) else {
                warn!(parameter = %spec.name, "parameter was not selected for this hole");
                continue;
            };
            let column =
                ParameterColumn::build(log, index, spec.rgb()?, &config.figure.parameter_unit);
            if column.stats.count == 0 {
                warn!(parameter = %spec.name, hole_id = %log.hole_id, "no values to plot");
            }
            parameters.push(column);
        }

        for (kind, codes, map) in [
            ("lithology", log.observed_lithologies(), &lithology),
            ("alteration", log.observed_alterations(), &alteration),
        ] {
            let unmapped: Vec<&str> = codes
                .iter()
                .copied()
                .filter(|code| map.get(code).is_none())
                .collect();
            if !unmapped.is_empty() {
                warn!(kind, ?unmapped, "codes without a color use the fallback fill");
            }
        }

        let legend = Legend::assemble(log, &lithology, &alteration, &config.parameters)?;

        debug!(
            hole_id = %log.hole_id,
            top = depth.top,
            bottom = depth.bottom,
            columns = strips.len() + parameters.len(),
            "figure prepared"
        );

        Ok(Self {
            hole_id: log.hole_id.clone(),
            title: format!("{} {}", config.figure.title_prefix, log.hole_id),
            depth,
            strips,
            parameters,
            legend,
        })
    }

    /// Columns drawn side by side: strips first, then parameters
    pub fn column_count(&self) -> usize {
        self.strips.len() + self.parameters.len()
    }

    /// Y-axis limits in (lower edge, upper edge) order, deepest first
    pub fn y_limits(&self) -> (f64, f64) {
        self.depth.axis_limits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use striplog::{CsvTableLoader, Rgb, Sentinel};

    const MERGED: &str = "\
holeid,from,to,Litologia,Alteracion,FFEspaciamiento,RqdRQD,CUS,MO,CUFE
H1,0,5,GRAV,A,1.5,80,0.1,0.01,-99
H1,5,12,SED,KB,2.0,-99,0.3,0.02,0.5
H2,0,3,GRAV,CL,1.0,70,0.2,0.03,0.4
";

    fn prepare(hole: &str) -> Result<FigureData> {
        let config = StriplogConfig::builtin()?;
        let table = CsvTableLoader::new()
            .with_sentinel(Sentinel::default())
            .read_table(MERGED.as_bytes())?;
        let log = HoleLog::select(&table, &config.columns, hole, &config.parameter_names())?;
        FigureData::prepare(&log, &config)
    }

    #[test]
    fn test_prepare_builds_all_columns() {
        let figure = prepare("H1").unwrap();

        assert_eq!(figure.title, "Drillhole H1");
        assert_eq!(figure.y_limits(), (12.0, 0.0));
        assert_eq!(figure.column_count(), 7);
        assert_eq!(figure.strips[0].rects[0].color, Rgb::parse("tan").unwrap());
        assert_eq!(figure.strips[1].rects[1].color, Rgb::parse("gold").unwrap());

        let names: Vec<&str> = figure.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["FFEspaciamiento", "RqdRQD", "CUS", "MO", "CUFE"]);
        // sentinel in the first CUFE row leaves a single point
        assert_eq!(figure.parameters[4].segments, vec![vec![(0.5, 8.5)]]);
    }

    #[test]
    fn test_legend_lists_observed_codes_only() {
        let figure = prepare("H1").unwrap();
        let lithology = figure.legend.section("Lithology").unwrap();
        let labels: Vec<&str> = lithology.entries.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, ["GRAV", "SED"]);
    }

    #[test]
    fn test_unknown_hole_is_an_error() {
        assert!(prepare("NOPE").is_err());
    }
}
