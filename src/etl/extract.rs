//! Extractor trait for reading data from sources

use eyre::Result;

/// Extractor trait for extracting data from a source
///
/// Implementors define how to read a batch from sources like:
/// - CSV files
/// - Several files joined together
/// - Databases
///
/// # Example
/// ```no_run
/// use disaster_etl::etl::Extractor;
/// use eyre::Result;
/// use std::path::PathBuf;
///
/// struct LineExtractor {
///     path: PathBuf,
/// }
///
/// impl Extractor for LineExtractor {
///     type Output = Vec<String>;
///
///     fn extract(&self) -> Result<Self::Output> {
///         let content = std::fs::read_to_string(&self.path)?;
///         Ok(content.lines().map(str::to_string).collect())
///     }
/// }
/// ```
pub trait Extractor {
    /// The batch produced by the source
    type Output;

    /// Extract a batch from the source
    ///
    /// # Errors
    /// Returns an error if extraction fails (I/O, parsing, joining, etc.)
    fn extract(&self) -> Result<Self::Output>;
}
