//! CLI helper functions

use crate::{
    config::EtlConfig,
    etl::{Pipeline, PipelineReport},
    storage::{CsvReader, MessageCategoryExtractor, SqliteReader, SqliteWriter},
    transform::{CATEGORIES_COLUMN, CategorySchema, JoinPolicy, cleaner},
};
use eyre::{Context, Result};
use serde::Serialize;
use std::path::Path;

/// Summary of a `run`, written with `--report`
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub messages: String,
    pub categories: String,
    pub database: String,
    pub table: String,
    pub join_policy: JoinPolicy,
    #[serde(flatten)]
    pub rows: PipelineReport,
}

/// Load, clean and save the disaster messages
///
/// Pipeline: MessageCategoryExtractor → CategoryExpander → Deduplicator → SqliteWriter
pub fn run_pipeline(
    messages: impl AsRef<Path>,
    categories: impl AsRef<Path>,
    database: impl AsRef<Path>,
    config: &EtlConfig,
) -> Result<RunReport> {
    let (messages, categories, database) =
        (messages.as_ref(), categories.as_ref(), database.as_ref());

    log::info!("Messages: {}", messages.display());
    log::info!("Categories: {}", categories.display());
    log::info!("Database: {} (table {})", database.display(), config.table_name);
    log::debug!("Join policy: {}", config.join_policy);

    let extractor = MessageCategoryExtractor::new(messages, categories, config.join_policy);
    let loader = SqliteWriter::new(database, &config.table_name);

    let rows = Pipeline::new(extractor, cleaner(), loader).run()?;

    Ok(RunReport {
        messages: messages.display().to_string(),
        categories: categories.display().to_string(),
        database: database.display().to_string(),
        table: config.table_name.clone(),
        join_policy: config.join_policy,
        rows,
    })
}

/// Write a run report as pretty JSON
pub fn write_report(report: &RunReport, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, format!("{}\n", json))
        .with_context(|| format!("Failed to write report: {}", path.display()))?;
    log::debug!("Report written to {}", path.display());
    Ok(())
}

/// Label columns derived from the first encoding in a categories file
pub fn category_columns(categories: impl AsRef<Path>) -> Result<Vec<String>> {
    let table = CsvReader::new(categories)
        .require(CATEGORIES_COLUMN)
        .read()?;
    let (schema, _) = CategorySchema::from_table(&table, CATEGORIES_COLUMN)?;
    Ok(schema.names().to_vec())
}

/// Row count and columns of a persisted table
pub fn inspect_table(database: impl AsRef<Path>, table_name: &str) -> Result<(usize, Vec<String>)> {
    let table = SqliteReader::new(database, table_name).read()?;
    Ok((table.len(), table.columns().to_vec()))
}
