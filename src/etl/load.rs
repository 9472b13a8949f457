//! Loader trait for writing data to destinations

use eyre::Result;

/// Loader trait for loading data to a destination
///
/// Implementors define how to write a batch to destinations:
/// - Relational stores
/// - File systems
///
/// # Example
/// ```no_run
/// use disaster_etl::etl::Loader;
/// use eyre::Result;
/// use std::path::PathBuf;
///
/// struct LineLoader {
///     path: PathBuf,
/// }
///
/// impl Loader for LineLoader {
///     type Input = Vec<String>;
///
///     fn load(&self, input: Self::Input) -> Result<usize> {
///         std::fs::write(&self.path, input.join("\n"))?;
///         Ok(input.len())
///     }
/// }
/// ```
pub trait Loader {
    /// The batch accepted by the destination
    type Input;

    /// Load a batch to the destination
    ///
    /// Returns the number of rows written
    ///
    /// # Errors
    /// Returns an error if loading fails (unwritable destination, rejected schema, etc.)
    fn load(&self, input: Self::Input) -> Result<usize>;
}
