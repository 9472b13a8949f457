//! SQLite persistence for cleaned tables

use crate::error::{EtlError, Result};
use crate::etl::Loader;
use crate::table::{Cell, Table};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, Value, ValueRef};
use rusqlite::{Connection, OpenFlags, ToSql};
use std::path::{Path, PathBuf};

/// Table name written when none is configured
pub const DEFAULT_TABLE_NAME: &str = "DisasterCategories";

impl ToSql for Cell {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Cell::Null => ToSqlOutput::Owned(Value::Null),
            Cell::Integer(i) => ToSqlOutput::Owned(Value::Integer(*i)),
            Cell::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
        })
    }
}

impl FromSql for Cell {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Null => Ok(Cell::Null),
            ValueRef::Integer(i) => Ok(Cell::Integer(i)),
            ValueRef::Real(f) => Ok(Cell::Text(f.to_string())),
            ValueRef::Text(_) => value.as_str().map(|s| Cell::Text(s.to_string())),
            ValueRef::Blob(_) => Err(FromSqlError::InvalidType),
        }
    }
}

/// Declared SQL type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Text,
}

impl ColumnType {
    /// INTEGER when every non-null cell is an integer and one exists, TEXT otherwise
    pub fn infer<'a>(cells: impl IntoIterator<Item = &'a Cell>) -> Self {
        let mut saw_integer = false;
        for cell in cells {
            match cell {
                Cell::Null => {}
                Cell::Integer(_) => saw_integer = true,
                Cell::Text(_) => return ColumnType::Text,
            }
        }
        match saw_integer {
            true => ColumnType::Integer,
            false => ColumnType::Text,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            ColumnType::Integer => "INTEGER",
            ColumnType::Text => "TEXT",
        }
    }
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Write a table to a SQLite database, replacing any table of the same name
pub struct SqliteWriter {
    path: PathBuf,
    table_name: String,
}

impl SqliteWriter {
    pub fn new(path: impl AsRef<Path>, table_name: &str) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            table_name: table_name.to_string(),
        }
    }

    fn create_statement(&self, table: &Table) -> String {
        let definitions = table
            .columns()
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let column_type = ColumnType::infer(table.rows().iter().map(|row| &row[i]));
                format!("{} {}", quote_identifier(name), column_type.as_sql())
            })
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "CREATE TABLE {} ({})",
            quote_identifier(&self.table_name),
            definitions
        )
    }

    fn insert_statement(&self, table: &Table) -> String {
        let columns = table
            .columns()
            .iter()
            .map(|c| quote_identifier(c))
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = vec!["?"; table.columns().len()].join(", ");
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quote_identifier(&self.table_name),
            columns,
            placeholders
        )
    }

    /// Drop, recreate and fill the table in one transaction
    ///
    /// A failure rolls back, leaving any previous table untouched. The
    /// connection is closed when this returns, on success or failure.
    pub fn write(&self, table: &Table) -> Result<usize> {
        let storage = |source| EtlError::storage(self.path.clone(), source);

        let mut conn = Connection::open(&self.path).map_err(storage)?;
        let tx = conn.transaction().map_err(storage)?;

        tx.execute_batch(&format!(
            "DROP TABLE IF EXISTS {}",
            quote_identifier(&self.table_name)
        ))
        .map_err(storage)?;
        tx.execute_batch(&self.create_statement(table))
            .map_err(storage)?;

        {
            let mut insert = tx.prepare(&self.insert_statement(table)).map_err(storage)?;
            for row in table.rows() {
                insert
                    .execute(rusqlite::params_from_iter(row.iter()))
                    .map_err(storage)?;
            }
        }

        tx.commit().map_err(storage)?;
        log::debug!(
            "Wrote {} rows to {} in {}",
            table.len(),
            self.table_name,
            self.path.display()
        );

        Ok(table.len())
    }
}

impl Loader for SqliteWriter {
    type Input = Table;

    fn load(&self, input: Self::Input) -> eyre::Result<usize> {
        Ok(self.write(&input)?)
    }
}

/// Read a table back out of a SQLite database
pub struct SqliteReader {
    path: PathBuf,
    table_name: String,
}

impl SqliteReader {
    pub fn new(path: impl AsRef<Path>, table_name: &str) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            table_name: table_name.to_string(),
        }
    }

    /// Read every row in storage order
    pub fn read(&self) -> Result<Table> {
        let storage = |source| EtlError::storage(self.path.clone(), source);

        let conn = Connection::open_with_flags(&self.path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(storage)?;
        let mut select = conn
            .prepare(&format!(
                "SELECT * FROM {} ORDER BY rowid",
                quote_identifier(&self.table_name)
            ))
            .map_err(storage)?;

        let columns: Vec<String> = select
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        let width = columns.len();

        let rows = select
            .query_map([], |row| {
                (0..width)
                    .map(|i| row.get::<_, Cell>(i))
                    .collect::<rusqlite::Result<Vec<_>>>()
            })
            .map_err(storage)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(storage)?;

        Table::new(columns, rows)
    }
}

/// Persist `table` as `table_name` in the SQLite database at `destination`
///
/// Any existing table of that name is replaced. No row-index column is written.
pub fn save(table: &Table, destination: impl AsRef<Path>, table_name: &str) -> Result<usize> {
    SqliteWriter::new(destination, table_name).write(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use tempfile::TempDir;

    fn cleaned(rows: &[(&str, &str, i64, i64)]) -> Table {
        Table::new(
            vec![
                "id".into(),
                "message".into(),
                "related".into(),
                "request".into(),
            ],
            rows.iter()
                .map(|(id, message, related, request)| {
                    vec![
                        Cell::from(*id),
                        Cell::from(*message),
                        Cell::Integer(*related),
                        Cell::Integer(*request),
                    ]
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_round_trip() {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("out.db");
        let table = cleaned(&[("1", "help", 1, 0), ("2", "water", 0, 1)]);

        assert_eq!(save(&table, &db, DEFAULT_TABLE_NAME).unwrap(), 2);

        let read = SqliteReader::new(&db, DEFAULT_TABLE_NAME).read().unwrap();
        assert_eq!(read, table);
    }

    #[test]
    fn test_overwrite_leaves_no_residue() {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("out.db");

        save(
            &cleaned(&[("1", "help", 1, 0), ("2", "water", 0, 1), ("3", "food", 1, 1)]),
            &db,
            DEFAULT_TABLE_NAME,
        )
        .unwrap();
        let second = cleaned(&[("9", "shelter", 0, 0)]);
        save(&second, &db, DEFAULT_TABLE_NAME).unwrap();

        let read = SqliteReader::new(&db, DEFAULT_TABLE_NAME).read().unwrap();
        assert_eq!(read, second);
    }

    #[test]
    fn test_column_types() {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("out.db");
        save(&cleaned(&[("1", "help", 1, 0)]), &db, "labels").unwrap();

        let conn = Connection::open(&db).unwrap();
        let mut stmt = conn
            .prepare("SELECT name, type FROM pragma_table_info('labels') ORDER BY cid")
            .unwrap();
        let columns: Vec<(String, String)> = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
            .unwrap()
            .collect::<rusqlite::Result<_>>()
            .unwrap();

        assert_eq!(
            columns,
            vec![
                ("id".to_string(), "TEXT".to_string()),
                ("message".to_string(), "TEXT".to_string()),
                ("related".to_string(), "INTEGER".to_string()),
                ("request".to_string(), "INTEGER".to_string()),
            ]
        );
    }

    #[test]
    fn test_infer() {
        assert_eq!(
            ColumnType::infer(&[Cell::Null, Cell::Integer(1)]),
            ColumnType::Integer
        );
        assert_eq!(
            ColumnType::infer(&[Cell::Integer(1), Cell::from("x")]),
            ColumnType::Text
        );
        assert_eq!(ColumnType::infer(&[Cell::Null]), ColumnType::Text);
    }

    #[test]
    fn test_reserved_word_columns_are_quoted() {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("out.db");
        let table = Table::new(
            vec!["id".into(), "order".into()],
            vec![vec![Cell::from("1"), Cell::Integer(0)]],
        )
        .unwrap();

        save(&table, &db, DEFAULT_TABLE_NAME).unwrap();
        let read = SqliteReader::new(&db, DEFAULT_TABLE_NAME).read().unwrap();
        assert_eq!(read, table);
    }

    #[test]
    fn test_rejected_schema_keeps_previous_table() {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("out.db");
        let first = cleaned(&[("1", "help", 1, 0)]);
        save(&first, &db, DEFAULT_TABLE_NAME).unwrap();

        let clashing = Table::new(
            vec!["id".into(), "id".into()],
            vec![vec![Cell::from("1"), Cell::from("2")]],
        )
        .unwrap();
        let err = save(&clashing, &db, DEFAULT_TABLE_NAME).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Storage);

        let read = SqliteReader::new(&db, DEFAULT_TABLE_NAME).read().unwrap();
        assert_eq!(read, first);
    }

    #[test]
    fn test_unwritable_destination() {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("missing").join("out.db");

        let err = save(&cleaned(&[]), &db, DEFAULT_TABLE_NAME).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Storage);
    }

    #[test]
    fn test_loader() {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("out.db");
        let count = SqliteWriter::new(&db, DEFAULT_TABLE_NAME)
            .load(cleaned(&[("1", "help", 1, 0)]))
            .unwrap();
        assert_eq!(count, 1);
    }
}
