//! Disaster ETL
//!
//! Loads disaster-response messages and their encoded category labels, decodes the
//! labels into one integer column each, drops duplicate rows, and saves the result
//! to SQLite.
//!
//! ```no_run
//! use disaster_etl::{JoinPolicy, clean, load, save};
//!
//! # fn main() -> Result<(), disaster_etl::EtlError> {
//! let joined = load("messages.csv", "categories.csv", JoinPolicy::Report)?;
//! let cleaned = clean(joined)?;
//! save(&cleaned, "DisasterResponse.db", "DisasterCategories")?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod etl;
pub mod storage;
pub mod table;
pub mod transform;

// Re-exports for convenience
pub use config::EtlConfig;
pub use error::{ErrorKind, EtlError};
pub use etl::{Extractor, Loader, Pipeline, Transformer};
pub use storage::{CsvReader, MessageCategoryExtractor, SqliteReader, SqliteWriter, load, save};
pub use table::{Cell, Table};
pub use transform::{CategorySchema, JoinPolicy, clean};
