//! Combined legend: lithology, alteration and parameter sections

use crate::colormap::{ColorMap, ParameterSpec};
use crate::colors::Rgb;
use crate::errors::Result;
use crate::hole::HoleLog;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LegendKind {
    /// Filled patch, for strip codes
    Swatch,
    /// Short line, for parameter traces
    Line,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: Rgb,
    pub kind: LegendKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendSection {
    pub title: String,
    pub entries: Vec<LegendEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub sections: Vec<LegendSection>,
}

impl Legend {
    /// Assemble the legend for one hole
    ///
    /// Strip sections list the mapped codes observed in the hole, in color-map
    /// order. Every configured parameter is listed.
    pub fn assemble(
        log: &HoleLog,
        lithology: &ColorMap,
        alteration: &ColorMap,
        parameters: &[ParameterSpec],
    ) -> Result<Self> {
        let parameter_entries = parameters
            .iter()
            .map(|p| {
                Ok(LegendEntry {
                    label: p.name.clone(),
                    color: p.rgb()?,
                    kind: LegendKind::Line,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            sections: vec![
                LegendSection {
                    title: "Lithology".to_string(),
                    entries: observed_swatches(lithology, &log.observed_lithologies()),
                },
                LegendSection {
                    title: "Alteration".to_string(),
                    entries: observed_swatches(alteration, &log.observed_alterations()),
                },
                LegendSection {
                    title: "Parameters".to_string(),
                    entries: parameter_entries,
                },
            ],
        })
    }

    pub fn section(&self, title: &str) -> Option<&LegendSection> {
        self.sections.iter().find(|s| s.title == title)
    }

    /// Rows drawn in the legend box: titles, entries and one blank row between sections
    pub fn row_count(&self) -> usize {
        let entries: usize = self.sections.iter().map(|s| 1 + s.entries.len()).sum();
        entries + self.sections.len().saturating_sub(1)
    }

    /// Longest title or label, in characters
    pub fn longest_label(&self) -> usize {
        self.sections
            .iter()
            .flat_map(|s| {
                std::iter::once(s.title.chars().count())
                    .chain(s.entries.iter().map(|e| e.label.chars().count()))
            })
            .max()
            .unwrap_or(0)
    }
}

fn observed_swatches(map: &ColorMap, observed: &[&str]) -> Vec<LegendEntry> {
    map.entries()
        .iter()
        .filter(|(code, _)| observed.contains(&code.as_str()))
        .map(|(code, color)| LegendEntry {
            label: code.clone(),
            color: *color,
            kind: LegendKind::Swatch,
        })
        .collect()
}
