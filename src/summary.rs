//! Per-hole summary for inspection output

use crate::config::ColumnConfig;
use crate::hole::HoleLog;
use crate::table::Table;
use serde::Serialize;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterCoverage {
    pub name: String,
    pub present: usize,
    pub missing: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoleSummary {
    pub hole_id: String,
    pub intervals: usize,
    pub top: Option<f64>,
    pub bottom: Option<f64>,
    /// Max depth recorded in the collar table, when the collar has one for this hole
    pub collar_max_depth: Option<f64>,
    pub lithologies: Vec<String>,
    pub alterations: Vec<String>,
    pub parameters: Vec<ParameterCoverage>,
}

impl HoleSummary {
    pub fn build(log: &HoleLog, collars: &Table, columns: &ColumnConfig) -> Self {
        let range = log.depth_range().ok();

        let parameters = log
            .parameters
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let values: Vec<f64> = log.intervals.iter().filter_map(|i| i.values[idx]).collect();
                ParameterCoverage {
                    name: name.clone(),
                    present: values.len(),
                    missing: log.intervals.len() - values.len(),
                    min: values.iter().copied().reduce(f64::min),
                    max: values.iter().copied().reduce(f64::max),
                }
            })
            .collect();

        Self {
            hole_id: log.hole_id.clone(),
            intervals: log.intervals.len(),
            top: range.map(|r| r.top),
            bottom: range.map(|r| r.bottom),
            collar_max_depth: collar_max_depth(collars, columns, &log.hole_id),
            lithologies: log.observed_lithologies().into_iter().map(String::from).collect(),
            alterations: log.observed_alterations().into_iter().map(String::from).collect(),
            parameters,
        }
    }

    /// Deepest logged `to` beyond the collar's recorded max depth
    pub fn depth_overrun(&self) -> Option<f64> {
        match (self.bottom, self.collar_max_depth) {
            (Some(bottom), Some(max)) if bottom > max => Some(bottom - max),
            _ => None,
        }
    }
}

/// Collar max depth for a hole; collar columns are optional for inspection
fn collar_max_depth(collars: &Table, columns: &ColumnConfig, hole_id: &str) -> Option<f64> {
    let lookup = || -> crate::Result<Option<f64>> {
        let holes = collars.column(&columns.collar_hole_id)?;
        let depths = collars.column(&columns.collar_max_depth)?;
        match holes
            .iter()
            .position(|h| h.as_text().as_deref() == Some(hole_id))
        {
            Some(row) => depths[row].as_f64(),
            None => Ok(None),
        }
    };

    lookup().unwrap_or_else(|e| {
        warn!(error = %e, "collar max depth unavailable");
        None
    })
}
