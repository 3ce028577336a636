//! Selecting one drillhole's intervals from the merged table

use crate::config::ColumnConfig;
use crate::errors::{Result, StriplogError};
use crate::table::{Cell, Table};
use serde::Serialize;
use tracing::{debug, warn};

/// One depth interval with its categorical codes and parameter values
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Interval {
    pub from: f64,
    pub to: f64,
    pub lithology: Option<String>,
    pub alteration: Option<String>,
    /// Parameter values aligned with [`HoleLog::parameters`]
    pub values: Vec<Option<f64>>,
}

impl Interval {
    /// Midpoint depth, the y-coordinate of parameter traces
    pub fn mid_depth(&self) -> f64 {
        (self.from + self.to) / 2.0
    }

    pub fn thickness(&self) -> f64 {
        self.to - self.from
    }
}

/// Depth extent shared by every column of the figure
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DepthRange {
    /// Shallowest `from`, drawn at the top
    pub top: f64,
    /// Deepest `to`, drawn at the bottom
    pub bottom: f64,
}

impl DepthRange {
    /// Axis limits in (lower edge, upper edge) order: `[max(to), min(from)]`
    pub fn axis_limits(&self) -> (f64, f64) {
        (self.bottom, self.top)
    }

    pub fn span(&self) -> f64 {
        self.bottom - self.top
    }
}

/// Intervals of a single drillhole, in table order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoleLog {
    pub hole_id: String,
    pub parameters: Vec<String>,
    pub intervals: Vec<Interval>,
    /// Indices into `intervals` directly preceded by a skipped row without depth
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub breaks: Vec<usize>,
}

impl HoleLog {
    /// Select the rows of `table` whose hole id equals `hole_id`
    ///
    /// Rows with a missing `from` or `to` cannot be placed on the depth axis and are
    /// skipped; the position of each skip is kept in [`HoleLog::breaks`].
    pub fn select(
        table: &Table,
        columns: &ColumnConfig,
        hole_id: &str,
        parameters: &[String],
    ) -> Result<Self> {
        let holes = table.column(&columns.hole_id)?;
        let froms = table.column(&columns.from)?;
        let tos = table.column(&columns.to)?;
        let lithology = table.column(&columns.lithology)?;
        let alteration = table.column(&columns.alteration)?;
        let parameter_columns = parameters
            .iter()
            .map(|name| table.column(name))
            .collect::<Result<Vec<_>>>()?;

        let mut intervals = Vec::new();
        let mut breaks = Vec::new();
        for row in 0..table.len() {
            if holes[row].as_text().as_deref() != Some(hole_id) {
                continue;
            }

            let depth = |cells: &[Cell], name: &str| {
                cells[row].as_f64().map_err(|e| row_error(row, name, e))
            };
            let (from, to) = match (depth(froms, &columns.from)?, depth(tos, &columns.to)?) {
                (Some(from), Some(to)) => (from, to),
                _ => {
                    warn!(hole_id, row = row + 1, "interval without from/to depth skipped");
                    if breaks.last() != Some(&intervals.len()) {
                        breaks.push(intervals.len());
                    }
                    continue;
                }
            };

            let values = parameter_columns
                .iter()
                .zip(parameters)
                .map(|(cells, name)| cells[row].as_f64().map_err(|e| row_error(row, name, e)))
                .collect::<Result<Vec<_>>>()?;

            intervals.push(Interval {
                from,
                to,
                lithology: lithology[row].as_text(),
                alteration: alteration[row].as_text(),
                values,
            });
        }

        debug!(hole_id, intervals = intervals.len(), "selected hole");

        Ok(Self {
            hole_id: hole_id.to_string(),
            parameters: parameters.to_vec(),
            intervals,
            breaks,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Whether a row without depth was skipped right before `intervals[index]`
    pub fn follows_break(&self, index: usize) -> bool {
        self.breaks.binary_search(&index).is_ok()
    }

    /// Depth extent `[min(from), max(to)]`; fails when no interval was selected
    pub fn depth_range(&self) -> Result<DepthRange> {
        let top = self.intervals.iter().map(|i| i.from).reduce(f64::min);
        let bottom = self.intervals.iter().map(|i| i.to).reduce(f64::max);

        match (top, bottom) {
            (Some(top), Some(bottom)) => Ok(DepthRange { top, bottom }),
            _ => Err(StriplogError::EmptySelection {
                hole_id: self.hole_id.clone(),
            }),
        }
    }

    /// `(mid_depth, value)` pairs for one parameter, `None` where the value is missing
    pub fn parameter_series(&self, name: &str) -> Option<Vec<(f64, Option<f64>)>> {
        let idx = self.parameters.iter().position(|p| p == name)?;
        Some(
            self.intervals
                .iter()
                .map(|i| (i.mid_depth(), i.values[idx]))
                .collect(),
        )
    }

    /// Distinct lithology codes in first-appearance order
    pub fn observed_lithologies(&self) -> Vec<&str> {
        distinct(self.intervals.iter().filter_map(|i| i.lithology.as_deref()))
    }

    /// Distinct alteration codes in first-appearance order
    pub fn observed_alterations(&self) -> Vec<&str> {
        distinct(self.intervals.iter().filter_map(|i| i.alteration.as_deref()))
    }
}

fn distinct<'a>(codes: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen: Vec<&str> = Vec::new();
    for code in codes {
        if !seen.contains(&code) {
            seen.push(code);
        }
    }
    seen
}

fn row_error(row: usize, column: &str, err: StriplogError) -> StriplogError {
    StriplogError::InvalidData {
        message: format!("row {}, column '{}': {}", row + 1, column, err),
    }
}
