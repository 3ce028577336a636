//! Drawable elements of a striplog: strip rectangles and parameter traces

use crate::analysis::ParameterStats;
use serde::Serialize;
use striplog::{ColorMap, HoleLog, Rgb};

/// Which categorical attribute a strip shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StripKind {
    Lithology,
    Alteration,
}

impl StripKind {
    pub fn label(&self) -> &'static str {
        match self {
            StripKind::Lithology => "Lithology",
            StripKind::Alteration => "Alteration",
        }
    }
}

/// One filled band spanning the column width from `top` to `bottom` depth
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StripRect {
    pub top: f64,
    pub bottom: f64,
    pub code: Option<String>,
    pub color: Rgb,
}

/// A categorical column: one rectangle per interval
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StripColumn {
    pub kind: StripKind,
    pub rects: Vec<StripRect>,
}

impl StripColumn {
    pub fn build(log: &HoleLog, kind: StripKind, colors: &ColorMap) -> Self {
        let rects = log
            .intervals
            .iter()
            .map(|interval| {
                let code = match kind {
                    StripKind::Lithology => interval.lithology.clone(),
                    StripKind::Alteration => interval.alteration.clone(),
                };
                StripRect {
                    top: interval.from,
                    bottom: interval.to,
                    color: colors.color_for(code.as_deref()),
                    code,
                }
            })
            .collect();

        Self { kind, rects }
    }

    pub fn label(&self) -> &'static str {
        self.kind.label()
    }
}

/// A numeric column: `(value, mid_depth)` polylines broken at missing values
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterColumn {
    pub name: String,
    pub label: String,
    pub color: Rgb,
    pub segments: Vec<Vec<(f64, f64)>>,
    pub stats: ParameterStats,
}

impl ParameterColumn {
    /// Build the trace for parameter `index` of `log`
    ///
    /// A missing value or a skipped row without depth ends the current segment.
    pub fn build(log: &HoleLog, index: usize, color: Rgb, unit: &str) -> Self {
        let name = log.parameters[index].clone();
        let values: Vec<Option<f64>> = log.intervals.iter().map(|i| i.values[index]).collect();

        let mut segments = Vec::new();
        let mut current: Vec<(f64, f64)> = Vec::new();
        for (i, (interval, value)) in log.intervals.iter().zip(&values).enumerate() {
            if log.follows_break(i) && !current.is_empty() {
                segments.push(std::mem::take(&mut current));
            }
            match value {
                Some(v) => current.push((*v, interval.mid_depth())),
                None if !current.is_empty() => segments.push(std::mem::take(&mut current)),
                None => {}
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }

        let label = if unit.is_empty() {
            name.clone()
        } else {
            format!("{} ({})", name, unit)
        };

        Self {
            name,
            label,
            color,
            segments,
            stats: ParameterStats::from_values(&values),
        }
    }

    /// X-axis limits for this column
    pub fn x_range(&self) -> (f64, f64) {
        self.stats.axis_range()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use striplog::Interval;

    fn log() -> HoleLog {
        let interval = |from: f64, to: f64, lith: &str, value: Option<f64>| Interval {
            from,
            to,
            lithology: Some(lith.to_string()),
            alteration: None,
            values: vec![value],
        };
        HoleLog {
            hole_id: "H1".to_string(),
            parameters: vec!["CUS".to_string()],
            intervals: vec![
                interval(0.0, 2.0, "A", Some(0.1)),
                interval(2.0, 4.0, "Q", Some(0.3)),
                interval(4.0, 6.0, "A", None),
                interval(6.0, 8.0, "A", Some(0.2)),
            ],
            breaks: vec![],
        }
    }

    #[test]
    fn test_strip_rects_follow_intervals() {
        let colors = ColorMap::new(vec![("A".to_string(), Rgb(210, 180, 140))], Rgb::WHITE);
        let column = StripColumn::build(&log(), StripKind::Lithology, &colors);

        assert_eq!(column.rects.len(), 4);
        assert_eq!(column.rects[1].top, 2.0);
        assert_eq!(column.rects[1].bottom, 4.0);
        assert_eq!(column.rects[0].color, Rgb(210, 180, 140));
        // unmapped code falls back
        assert_eq!(column.rects[1].color, Rgb::WHITE);
        assert_eq!(column.label(), "Lithology");
    }

    #[test]
    fn test_missing_alteration_uses_fallback() {
        let colors = ColorMap::new(vec![], Rgb(1, 1, 1));
        let column = StripColumn::build(&log(), StripKind::Alteration, &colors);
        assert!(column.rects.iter().all(|r| r.code.is_none() && r.color == Rgb(1, 1, 1)));
    }

    #[test]
    fn test_trace_breaks_at_missing_values() {
        let column = ParameterColumn::build(&log(), 0, Rgb::BLACK, "%");

        assert_eq!(column.label, "CUS (%)");
        assert_eq!(
            column.segments,
            vec![vec![(0.1, 1.0), (0.3, 3.0)], vec![(0.2, 7.0)]]
        );
        assert_eq!(column.stats.missing, 1);
    }

    #[test]
    fn test_trace_breaks_where_depthless_row_was_skipped() {
        let table = striplog::CsvTableLoader::new()
            .with_sentinel(striplog::Sentinel::default())
            .read_table(
                "holeid,from,to,Litologia,Alteracion,CUS\n\
H1,0,2,A,X,0.4\n\
H1,-99,4,A,X,0.9\n\
H1,4,6,A,X,0.5\n"
                    .as_bytes(),
            )
            .unwrap();
        let columns = striplog::StriplogConfig::builtin().unwrap().columns;
        let log = HoleLog::select(&table, &columns, "H1", &["CUS".to_string()]).unwrap();

        let column = ParameterColumn::build(&log, 0, Rgb::BLACK, "%");
        assert_eq!(column.segments, vec![vec![(0.4, 1.0)], vec![(0.5, 5.0)]]);
    }

    #[test]
    fn test_trace_without_unit() {
        let column = ParameterColumn::build(&log(), 0, Rgb::BLACK, "");
        assert_eq!(column.label, "CUS");
    }
}
