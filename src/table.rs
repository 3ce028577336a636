//! Column-major in-memory table with per-column type inference
//!
//! Fields are parsed the way a dataframe reader treats a CSV column: a column
//! whose non-missing fields all parse as numbers is numeric, otherwise every
//! non-missing field in it stays text. The usual NA tokens read as missing.

use crate::errors::{Result, StriplogError};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Field values that read as missing regardless of column type
pub const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// One parsed table field
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Missing,
    Number(f64),
    Text(String),
}

impl Cell {
    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    /// Text form of the value; integral numbers print without a decimal point
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Missing => None,
            Cell::Number(v) => Some(format_number(*v)),
            Cell::Text(s) => Some(s.clone()),
        }
    }

    /// Numeric value, parsing text cells on demand
    ///
    /// Returns `Ok(None)` for a missing cell and an error for text that is not a number.
    pub fn as_f64(&self) -> Result<Option<f64>> {
        match self {
            Cell::Missing => Ok(None),
            Cell::Number(v) => Ok(Some(*v)),
            Cell::Text(s) => s.trim().parse::<f64>().map(Some).map_err(|_| {
                StriplogError::InvalidData {
                    message: format!("expected a number, found '{}'", s),
                }
            }),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Missing => write!(f, "NaN"),
            Cell::Number(v) => write!(f, "{}", format_number(*v)),
            Cell::Text(s) => write!(f, "{}", s),
        }
    }
}

fn format_number(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{}", v)
    }
}

/// In-band "no value" marker used by the source tables
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sentinel(pub f64);

impl Default for Sentinel {
    fn default() -> Self {
        Sentinel(-99.0)
    }
}

impl Sentinel {
    /// Matches the numeric sentinel and its exact text spelling (`-99` for the default)
    pub fn matches(&self, cell: &Cell) -> bool {
        match cell {
            Cell::Missing => false,
            Cell::Number(v) => *v == self.0,
            Cell::Text(s) => *s == format_number(self.0),
        }
    }
}

/// Column-oriented table of parsed cells
#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<String>,
    columns: Vec<Vec<Cell>>,
    rows: usize,
}

impl Table {
    /// Build a table from a header row and raw string records
    ///
    /// Every record must have one field per header.
    pub fn from_records(headers: Vec<String>, records: Vec<Vec<String>>) -> Result<Self> {
        let width = headers.len();
        let mut raw_columns: Vec<Vec<String>> = vec![Vec::with_capacity(records.len()); width];

        for (row, record) in records.into_iter().enumerate() {
            if record.len() != width {
                return Err(StriplogError::InvalidData {
                    message: format!(
                        "row {} has {} fields, expected {}",
                        row + 1,
                        record.len(),
                        width
                    ),
                });
            }
            for (column, field) in raw_columns.iter_mut().zip(record) {
                column.push(field);
            }
        }

        let rows = raw_columns.first().map_or(0, Vec::len);
        let columns = raw_columns.into_iter().map(infer_column).collect();

        Ok(Self {
            headers: dedupe_headers(headers),
            columns,
            rows,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Look up a column by exact header name
    pub fn column(&self, name: &str) -> Result<&[Cell]> {
        self.headers
            .iter()
            .position(|h| h == name)
            .map(|idx| self.columns[idx].as_slice())
            .ok_or_else(|| StriplogError::MissingColumn {
                column: name.to_string(),
            })
    }

    /// One row as cells in header order
    pub fn row(&self, index: usize) -> Option<Vec<&Cell>> {
        if index >= self.rows {
            return None;
        }
        Some(self.columns.iter().map(|c| &c[index]).collect())
    }

    /// The first `n` rows
    pub fn head(&self, n: usize) -> Vec<Vec<&Cell>> {
        (0..n.min(self.rows)).filter_map(|i| self.row(i)).collect()
    }

    /// Replace every sentinel cell with `Cell::Missing`, returning how many were replaced
    pub fn normalize_sentinels(&mut self, sentinel: Sentinel) -> usize {
        let mut replaced = 0;
        for cell in self.columns.iter_mut().flatten() {
            if sentinel.matches(cell) {
                *cell = Cell::Missing;
                replaced += 1;
            }
        }
        replaced
    }

    /// Distinct values of a column in first-appearance order, missing included once as `None`
    pub fn unique_values(&self, name: &str) -> Result<Vec<Option<String>>> {
        let mut seen = Vec::new();
        for cell in self.column(name)? {
            let value = cell.as_text();
            if !seen.contains(&value) {
                seen.push(value);
            }
        }
        Ok(seen)
    }

    /// Count of missing cells per column, in header order
    pub fn missing_counts(&self) -> Vec<(String, usize)> {
        self.headers
            .iter()
            .zip(&self.columns)
            .map(|(h, c)| (h.clone(), c.iter().filter(|cell| cell.is_missing()).count()))
            .collect()
    }
}

fn infer_column(raw: Vec<String>) -> Vec<Cell> {
    let numeric = raw
        .iter()
        .filter(|f| !NA_TOKENS.contains(&f.as_str()))
        .all(|f| f.trim().parse::<f64>().is_ok());

    raw.into_iter()
        .map(|field| {
            if NA_TOKENS.contains(&field.as_str()) {
                Cell::Missing
            } else if numeric {
                // all() above guarantees the parse
                field.trim().parse::<f64>().map_or(Cell::Missing, Cell::Number)
            } else {
                Cell::Text(field)
            }
        })
        .collect()
}

fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    headers
        .into_iter()
        .map(|h| {
            let n = counts.entry(h.clone()).or_insert(0);
            let name = if *n == 0 { h } else { format!("{}.{}", h, n) };
            *n += 1;
            name
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], rows: &[&[&str]]) -> Table {
        Table::from_records(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|f| f.to_string()).collect())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_numeric_column_inference() {
        let t = table(&["a", "b"], &[&["1", "x"], &["2.5", "3"], &["", "y"]]);
        let a = t.column("a").unwrap();
        assert_eq!(a, &[Cell::Number(1.0), Cell::Number(2.5), Cell::Missing]);

        // one non-numeric field keeps the whole column as text
        let b = t.column("b").unwrap();
        assert_eq!(b[1], Cell::Text("3".to_string()));
    }

    #[test]
    fn test_na_tokens_are_missing() {
        let t = table(&["a"], &[&["NA"], &["nan"], &["null"], &["4"]]);
        let a = t.column("a").unwrap();
        assert!(a[..3].iter().all(Cell::is_missing));
        assert_eq!(a[3], Cell::Number(4.0));
    }

    #[test]
    fn test_sentinel_replacement_numeric_and_text() {
        let mut t = table(
            &["depth", "code", "other"],
            &[&["-99", "-99", "-99.5"], &["10", "GRAV", "-98"], &["-99.0", "-99.0", "7"]],
        );
        let before_other = t.column("other").unwrap().to_vec();

        let replaced = t.normalize_sentinels(Sentinel::default());

        // numeric -99, -99.0 and text "-99"; text "-99.0" is a different spelling
        assert_eq!(replaced, 3);
        assert_eq!(
            t.column("depth").unwrap(),
            &[Cell::Missing, Cell::Number(10.0), Cell::Missing]
        );
        assert_eq!(
            t.column("code").unwrap(),
            &[
                Cell::Missing,
                Cell::Text("GRAV".to_string()),
                Cell::Text("-99.0".to_string())
            ]
        );
        assert_eq!(t.column("other").unwrap(), before_other.as_slice());
    }

    #[test]
    fn test_missing_column_error() {
        let t = table(&["a"], &[&["1"]]);
        match t.column("Litologia") {
            Err(StriplogError::MissingColumn { column }) => assert_eq!(column, "Litologia"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_unique_values_first_appearance() {
        let t = table(&["lith"], &[&["SED"], &["GRAV"], &[""], &["SED"], &["NA"]]);
        let unique = t.unique_values("lith").unwrap();
        assert_eq!(
            unique,
            vec![Some("SED".to_string()), Some("GRAV".to_string()), None]
        );
    }

    #[test]
    fn test_duplicate_headers() {
        let t = table(&["x", "x", "y", "x"], &[&["1", "2", "3", "4"]]);
        assert_eq!(t.headers(), &["x", "x.1", "y", "x.2"]);
    }

    #[test]
    fn test_ragged_record_rejected() {
        let err = Table::from_records(
            vec!["a".into(), "b".into()],
            vec![vec!["1".into()]],
        );
        assert!(matches!(err, Err(StriplogError::InvalidData { .. })));
    }

    #[test]
    fn test_cell_text_forms() {
        assert_eq!(Cell::Number(412.0).as_text().as_deref(), Some("412"));
        assert_eq!(Cell::Number(2.5).as_text().as_deref(), Some("2.5"));
        assert_eq!(Cell::Missing.as_text(), None);
        assert_eq!(Cell::Text("12.5".into()).as_f64().unwrap(), Some(12.5));
        assert!(Cell::Text("<0.01".into()).as_f64().is_err());
    }
}
