//! Transformations from joined source rows to the cleaned table
//!
//! Joining lives here alongside the category decoding and duplicate removal
//! because all three are pure table-to-table functions.

mod categories;
mod dedup;
mod join;

pub use categories::{
    CATEGORIES_COLUMN, CategoryExpander, CategorySchema, LABEL_SEPARATOR, expand_categories,
};
pub use dedup::{Deduplicator, deduplicate, drop_duplicates, duplicate_count};
pub use join::{ID_COLUMN, JoinPolicy, Joined, join_on};

use crate::error::Result;
use crate::etl::{Chain, Transformer};
use crate::table::Table;

/// Category decoding followed by duplicate removal
pub type Cleaner = Chain<CategoryExpander, Deduplicator>;

/// Build the transformer that turns a joined table into the cleaned table
pub fn cleaner() -> Cleaner {
    CategoryExpander::default().then(Deduplicator::new())
}

/// Decode the categories column into label columns and drop exact duplicate rows
///
/// # Example
/// ```
/// use disaster_etl::table::{Cell, Table};
/// use disaster_etl::transform::clean;
///
/// let joined = Table::new(
///     vec!["id".into(), "message".into(), "categories".into()],
///     vec![
///         vec!["1".into(), "help".into(), "related-1;request-0".into()],
///         vec!["1".into(), "help".into(), "related-1;request-0".into()],
///     ],
/// )
/// .unwrap();
///
/// let cleaned = clean(joined).unwrap();
/// assert_eq!(cleaned.columns(), &["id", "message", "related", "request"]);
/// assert_eq!(cleaned.len(), 1);
/// assert_eq!(cleaned.rows()[0][2], Cell::Integer(1));
/// ```
pub fn clean(table: Table) -> Result<Table> {
    let expanded = expand_categories(table, CATEGORIES_COLUMN)?;
    Ok(deduplicate(expanded))
}
