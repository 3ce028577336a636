//! CSV loading for collar and interval tables
//!
//! Reads a delimited file with a header row into a [`Table`]. No schema is
//! enforced here; missing columns surface when a column is first looked up.

use crate::errors::{Result, StriplogError};
use crate::table::{Sentinel, Table};
use csv::ReaderBuilder;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::debug;

/// Loader for the collar and merged interval CSV files
#[derive(Debug, Clone)]
pub struct CsvTableLoader {
    /// Field delimiter
    delimiter: u8,
    /// Sentinel replaced with missing after loading, when set
    sentinel: Option<Sentinel>,
}

impl Default for CsvTableLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvTableLoader {
    /// Comma-delimited loader that keeps sentinel values as read
    pub fn new() -> Self {
        Self {
            delimiter: b',',
            sentinel: None,
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Replace `sentinel` with missing in every loaded table
    pub fn with_sentinel(mut self, sentinel: Sentinel) -> Self {
        self.sentinel = Some(sentinel);
        self
    }

    /// Load a table from a file path
    pub fn load_table<P: AsRef<Path>>(&self, file_path: P) -> Result<Table> {
        let path = file_path.as_ref();
        let file = File::open(path).map_err(|source| StriplogError::FileOpen {
            path: path.to_path_buf(),
            source,
        })?;

        let table = self.read_table(BufReader::new(file))?;
        debug!(
            path = %path.display(),
            rows = table.len(),
            columns = table.headers().len(),
            "loaded table"
        );
        Ok(table)
    }

    /// Load a table from any reader
    pub fn read_table<R: Read>(&self, reader: R) -> Result<Table> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .delimiter(self.delimiter)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();

        let mut records = Vec::new();
        for result in csv_reader.records() {
            let record = result?;
            records.push(record.iter().map(str::to_string).collect());
        }

        let mut table = Table::from_records(headers, records)?;

        if let Some(sentinel) = self.sentinel {
            let replaced = table.normalize_sentinels(sentinel);
            debug!(replaced, sentinel = sentinel.0, "normalized missing-value sentinels");
        }

        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Cell;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MERGED: &str = "holeid,from,to,Litologia,Alteracion,CUS\n\
SPD0412,0,5,GRAV,A,0.1\n\
SPD0412,5,12,SED,-99,-99\n\
SPD0413,0,3,-99,CL,0.4\n";

    #[test]
    fn test_read_table_with_sentinel() {
        let loader = CsvTableLoader::new().with_sentinel(Sentinel::default());
        let table = loader.read_table(MERGED.as_bytes()).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(
            table.headers(),
            &["holeid", "from", "to", "Litologia", "Alteracion", "CUS"]
        );
        assert_eq!(table.column("CUS").unwrap()[1], Cell::Missing);
        assert_eq!(table.column("Alteracion").unwrap()[1], Cell::Missing);
        assert_eq!(table.column("Litologia").unwrap()[2], Cell::Missing);
        assert_eq!(table.column("CUS").unwrap()[0], Cell::Number(0.1));
    }

    #[test]
    fn test_read_table_without_sentinel_keeps_values() {
        let table = CsvTableLoader::new().read_table(MERGED.as_bytes()).unwrap();
        assert_eq!(table.column("CUS").unwrap()[1], Cell::Number(-99.0));
    }

    #[test]
    fn test_semicolon_delimiter() {
        let data = "holeid;from;to\nH1;0;5\n";
        let table = CsvTableLoader::new()
            .with_delimiter(b';')
            .read_table(data.as_bytes())
            .unwrap();
        assert_eq!(table.column("to").unwrap()[0], Cell::Number(5.0));
    }

    #[test]
    fn test_load_table_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(MERGED.as_bytes()).unwrap();
        file.flush().unwrap();

        let table = CsvTableLoader::default().load_table(file.path()).unwrap();
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_missing_file() {
        let result = CsvTableLoader::new().load_table("/nonexistent/merged_data.csv");
        match result {
            Err(StriplogError::FileOpen { path, .. }) => {
                assert!(path.ends_with("merged_data.csv"))
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_ragged_csv_is_an_error() {
        let data = "a,b\n1,2\n3\n";
        let result = CsvTableLoader::new().read_table(data.as_bytes());
        assert!(matches!(result, Err(StriplogError::Csv { .. })));
    }
}
