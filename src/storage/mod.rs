//! File system and database storage
//!
//! This module handles all I/O:
//! - CSV source reading
//! - Reading and joining the messages and categories sources
//! - SQLite table writing and reading

mod csv;
mod sources;
mod sqlite;

pub use csv::CsvReader;
pub use sources::{MessageCategoryExtractor, load};
pub use sqlite::{ColumnType, DEFAULT_TABLE_NAME, SqliteReader, SqliteWriter, save};
