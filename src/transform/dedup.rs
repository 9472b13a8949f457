//! Exact duplicate row removal

use crate::etl::Transformer;
use crate::table::Table;
use std::collections::HashSet;

/// Number of rows identical to an earlier row
pub fn duplicate_count(table: &Table) -> usize {
    let mut seen = HashSet::with_capacity(table.len());
    table.rows().iter().filter(|row| !seen.insert(*row)).count()
}

/// Drop every row identical to an earlier one, keeping first occurrences in order
pub fn drop_duplicates(table: Table) -> Table {
    let keep: Vec<bool> = {
        let mut seen = HashSet::with_capacity(table.len());
        table.rows().iter().map(|row| seen.insert(row)).collect()
    };

    table.select_rows(&keep)
}

/// [`drop_duplicates`] with duplicate counts before and after logged as diagnostics
pub fn deduplicate(table: Table) -> Table {
    let before = duplicate_count(&table);
    log::debug!("Duplicate rows before removal: {}", before);

    let output = drop_duplicates(table);
    log::info!("Removed {} duplicate row(s)", before);
    log::debug!("Duplicate rows after removal: {}", duplicate_count(&output));

    output
}

/// Transformer that removes exact duplicate rows, see [`deduplicate`]
#[derive(Default)]
pub struct Deduplicator;

impl Deduplicator {
    pub fn new() -> Self {
        Self
    }
}

impl Transformer for Deduplicator {
    type Input = Table;
    type Output = Table;

    fn transform(&self, input: Self::Input) -> eyre::Result<Self::Output> {
        Ok(deduplicate(input))
    }
}
