//! CSV file reading

use crate::error::{EtlError, Result};
use crate::etl::Extractor;
use crate::table::{Cell, Table};
use std::path::{Path, PathBuf};

/// Read a comma-separated file with a header row into a [`Table`]
///
/// Every field is kept as text; empty fields become [`Cell::Null`] unless
/// their column was registered with [`CsvReader::keep_empty`].
pub struct CsvReader {
    path: PathBuf,
    required: Vec<String>,
    keep_empty: Vec<String>,
}

impl CsvReader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            required: Vec::new(),
            keep_empty: Vec::new(),
        }
    }

    /// Fail the read unless the header contains `column`
    pub fn require(mut self, column: &str) -> Self {
        self.required.push(column.to_string());
        self
    }

    /// Read empty fields in `column` as empty text instead of NULL
    pub fn keep_empty(mut self, column: &str) -> Self {
        self.keep_empty.push(column.to_string());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole file
    pub fn read(&self) -> Result<Table> {
        let source = |source| EtlError::Source {
            path: self.path.clone(),
            source,
        };

        let mut reader = ::csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(&self.path)
            .map_err(source)?;

        let columns: Vec<String> = reader
            .headers()
            .map_err(source)?
            .iter()
            .map(str::to_string)
            .collect();

        if let Some(column) = self.required.iter().find(|c| !columns.contains(c)) {
            return Err(EtlError::MissingColumn {
                path: self.path.clone(),
                column: column.clone(),
            });
        }

        let keep_empty: Vec<bool> = columns
            .iter()
            .map(|c| self.keep_empty.contains(c))
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(source)?;
            rows.push(
                record
                    .iter()
                    .zip(&keep_empty)
                    .map(|(field, keep)| match *keep {
                        true => Cell::Text(field.to_string()),
                        false => Cell::from_field(field),
                    })
                    .collect(),
            );
        }

        log::debug!(
            "Read {} rows x {} columns from {}",
            rows.len(),
            columns.len(),
            self.path.display()
        );

        Table::new(columns, rows)
    }
}

impl Extractor for CsvReader {
    type Output = Table;

    fn extract(&self) -> eyre::Result<Self::Output> {
        Ok(self.read()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_read_keeps_text() {
        let file = csv_file("id,message,genre\n007,\"water, please\",direct\n2,,news\n");
        let table = CsvReader::new(file.path()).require("id").read().unwrap();

        assert_eq!(table.columns(), &["id", "message", "genre"]);
        assert_eq!(table.len(), 2);
        // No numeric coercion: leading zeros survive
        assert_eq!(table.rows()[0][0], Cell::from("007"));
        assert_eq!(table.rows()[0][1], Cell::from("water, please"));
        assert_eq!(table.rows()[1][1], Cell::Null);
    }

    #[test]
    fn test_keep_empty_column() {
        let file = csv_file("id,categories,genre\n1,,\n");
        let table = CsvReader::new(file.path())
            .keep_empty("categories")
            .read()
            .unwrap();

        assert_eq!(table.rows()[0][1], Cell::from(""));
        assert_eq!(table.rows()[0][2], Cell::Null);
    }

    #[test]
    fn test_missing_required_column() {
        let file = csv_file("key,message\n1,help\n");
        let err = CsvReader::new(file.path()).require("id").read().unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.to_string().contains("has no `id` column"));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = CsvReader::new(dir.path().join("absent.csv"))
            .read()
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_uneven_record_is_io_error() {
        let file = csv_file("id,message\n1,help,extra\n");
        let err = CsvReader::new(file.path()).read().unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_extractor() {
        let file = csv_file("id,categories\n1,related-1\n");
        let table = CsvReader::new(file.path()).extract().unwrap();
        assert_eq!(table.len(), 1);
    }
}
