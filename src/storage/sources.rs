//! The messages and categories sources, read and joined

use super::CsvReader;
use crate::error::Result;
use crate::etl::Extractor;
use crate::table::Table;
use crate::transform::{CATEGORIES_COLUMN, ID_COLUMN, JoinPolicy, join_on};
use std::path::Path;

/// Extractor that reads both source files and joins them on `id`
pub struct MessageCategoryExtractor {
    messages: CsvReader,
    categories: CsvReader,
    policy: JoinPolicy,
}

impl MessageCategoryExtractor {
    pub fn new(
        messages: impl AsRef<Path>,
        categories: impl AsRef<Path>,
        policy: JoinPolicy,
    ) -> Self {
        Self {
            messages: CsvReader::new(messages).require(ID_COLUMN),
            // NULL in the categories column is reserved for left-join padding
            categories: CsvReader::new(categories)
                .require(ID_COLUMN)
                .require(CATEGORIES_COLUMN)
                .keep_empty(CATEGORIES_COLUMN),
            policy,
        }
    }

    /// Read and join the sources
    pub fn read(&self) -> Result<Table> {
        let messages = self.messages.read()?;
        log::debug!(
            "Messages: {} rows from {}",
            messages.len(),
            self.messages.path().display()
        );
        let categories = self.categories.read()?;
        log::debug!(
            "Categories: {} rows from {}",
            categories.len(),
            self.categories.path().display()
        );

        let joined = join_on(&messages, &categories, ID_COLUMN, self.policy)?;
        joined.log_unmatched(self.policy);
        Ok(joined.table)
    }
}

impl Extractor for MessageCategoryExtractor {
    type Output = Table;

    fn extract(&self) -> eyre::Result<Self::Output> {
        Ok(self.read()?)
    }
}

/// Read the messages and categories files and join them on `id`
pub fn load(
    messages: impl AsRef<Path>,
    categories: impl AsRef<Path>,
    policy: JoinPolicy,
) -> Result<Table> {
    MessageCategoryExtractor::new(messages, categories, policy).read()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::table::Cell;
    use tempfile::TempDir;

    fn write_sources(dir: &TempDir, messages: &str, categories: &str) -> (String, String) {
        let messages_path = dir.path().join("messages.csv");
        let categories_path = dir.path().join("categories.csv");
        std::fs::write(&messages_path, messages).unwrap();
        std::fs::write(&categories_path, categories).unwrap();
        (
            messages_path.display().to_string(),
            categories_path.display().to_string(),
        )
    }

    #[test]
    fn test_load_joins_on_id() {
        let dir = TempDir::new().unwrap();
        let (messages, categories) = write_sources(
            &dir,
            "id,message,genre\n1,help,direct\n2,water,news\n3,lost,social\n",
            "id,categories\n2,related-0;request-1\n1,related-1;request-0\n",
        );

        let table = load(&messages, &categories, JoinPolicy::Report).unwrap();

        assert_eq!(table.columns(), &["id", "message", "genre", "categories"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0][0], Cell::from("1"));
        assert_eq!(table.rows()[0][3], Cell::from("related-1;request-0"));
    }

    #[test]
    fn test_empty_encoding_is_not_null() {
        let dir = TempDir::new().unwrap();
        let (messages, categories) = write_sources(
            &dir,
            "id,message\n1,help\n2,water\n",
            "id,categories\n1,\n",
        );

        let table = load(&messages, &categories, JoinPolicy::Left).unwrap();

        assert_eq!(table.rows()[0][2], Cell::from(""));
        assert_eq!(table.rows()[1][2], Cell::Null);
    }

    #[test]
    fn test_missing_categories_column() {
        let dir = TempDir::new().unwrap();
        let (messages, categories) =
            write_sources(&dir, "id,message\n1,help\n", "id,labels\n1,related-1\n");

        let err = load(&messages, &categories, JoinPolicy::Inner).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.to_string().contains("`categories`"));
    }

    #[test]
    fn test_missing_source_file() {
        let dir = TempDir::new().unwrap();
        let (messages, _) = write_sources(&dir, "id,message\n1,help\n", "id,categories\n");
        let absent = dir.path().join("absent.csv");

        let err = load(&messages, &absent, JoinPolicy::Inner).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}
