//! Pipeline orchestration for ETL operations

use super::{Extractor, Loader, Transformer};
use crate::table::Table;
use eyre::Result;
use serde::Serialize;

/// A batch whose row count the pipeline can report
pub trait Batch {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Batch for Table {
    fn len(&self) -> usize {
        Table::len(self)
    }
}

impl<T> Batch for Vec<T> {
    fn len(&self) -> usize {
        Vec::len(self)
    }
}

/// Row counts observed at each stage of a pipeline run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PipelineReport {
    pub extracted: usize,
    pub transformed: usize,
    pub loaded: usize,
}

/// ETL Pipeline that orchestrates Extract, Transform, and Load operations
///
/// # Type Parameters
/// - `E`: Extractor type
/// - `T`: Transformer type (must transform from E::Output)
/// - `L`: Loader type (must load T::Output)
///
/// # Example
/// ```no_run
/// use disaster_etl::etl::Pipeline;
/// # use disaster_etl::etl::{Extractor, Transformer, Loader};
/// # use eyre::Result;
/// # struct MyExtractor;
/// # impl Extractor for MyExtractor {
/// #     type Output = Vec<i32>;
/// #     fn extract(&self) -> Result<Self::Output> { Ok(vec![]) }
/// # }
/// # struct MyTransformer;
/// # impl Transformer for MyTransformer {
/// #     type Input = Vec<i32>;
/// #     type Output = Vec<i32>;
/// #     fn transform(&self, input: Self::Input) -> Result<Self::Output> { Ok(input) }
/// # }
/// # struct MyLoader;
/// # impl Loader for MyLoader {
/// #     type Input = Vec<i32>;
/// #     fn load(&self, input: Self::Input) -> Result<usize> { Ok(input.len()) }
/// # }
///
/// # fn example() -> Result<()> {
/// let pipeline = Pipeline::new(MyExtractor, MyTransformer, MyLoader);
///
/// let report = pipeline.run()?;
/// println!("Loaded {} rows", report.loaded);
/// # Ok(())
/// # }
/// ```
pub struct Pipeline<E, T, L> {
    extractor: E,
    transformer: T,
    loader: L,
}

impl<E, T, L> Pipeline<E, T, L>
where
    E: Extractor,
    E::Output: Batch,
    T: Transformer<Input = E::Output>,
    T::Output: Batch,
    L: Loader<Input = T::Output>,
{
    /// Create a new pipeline
    pub fn new(extractor: E, transformer: T, loader: L) -> Self {
        Self {
            extractor,
            transformer,
            loader,
        }
    }

    /// Run the complete ETL pipeline
    ///
    /// Steps:
    /// 1. Extract a batch from the source
    /// 2. Transform the batch
    /// 3. Load the batch to the destination
    ///
    /// Nothing is loaded unless extraction and transformation both succeed.
    /// An empty extraction ends the run without touching the destination.
    ///
    /// # Errors
    /// Returns an error if any stage fails
    pub fn run(&self) -> Result<PipelineReport> {
        log::info!("Starting ETL pipeline");
        let mut report = PipelineReport::default();

        // Extract
        log::debug!("Extracting from source...");
        let batch = self.extractor.extract()?;
        report.extracted = batch.len();
        log::info!("Extracted {} rows", report.extracted);

        if batch.is_empty() {
            log::warn!("No rows extracted, pipeline complete");
            return Ok(report);
        }

        // Transform
        log::debug!("Transforming rows...");
        let transformed = self.transformer.transform(batch)?;
        report.transformed = transformed.len();
        log::info!("Transformed {} rows", report.transformed);

        // Load
        log::debug!("Loading to destination...");
        report.loaded = self.loader.load(transformed)?;
        log::info!("Loaded {} rows", report.loaded);

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct MockExtractor(Vec<i32>);

    impl Extractor for MockExtractor {
        type Output = Vec<i32>;
        fn extract(&self) -> Result<Self::Output> {
            Ok(self.0.clone())
        }
    }

    struct DoubleTransformer;

    impl Transformer for DoubleTransformer {
        type Input = Vec<i32>;
        type Output = Vec<i32>;
        fn transform(&self, input: Self::Input) -> Result<Self::Output> {
            Ok(input.into_iter().map(|i| i * 2).collect())
        }
    }

    struct FailingTransformer;

    impl Transformer for FailingTransformer {
        type Input = Vec<i32>;
        type Output = Vec<i32>;
        fn transform(&self, _input: Self::Input) -> Result<Self::Output> {
            Err(eyre::eyre!("bad row"))
        }
    }

    struct SumLoader(RefCell<Option<i32>>);

    impl Loader for SumLoader {
        type Input = Vec<i32>;
        fn load(&self, input: Self::Input) -> Result<usize> {
            *self.0.borrow_mut() = Some(input.iter().sum());
            Ok(input.len())
        }
    }

    #[test]
    fn test_pipeline() {
        let loader = SumLoader(RefCell::new(None));
        let pipeline = Pipeline::new(MockExtractor(vec![1, 2, 3]), DoubleTransformer, loader);

        let report = pipeline.run().unwrap();
        assert_eq!(
            report,
            PipelineReport {
                extracted: 3,
                transformed: 3,
                loaded: 3
            }
        );
        assert_eq!(*pipeline.loader.0.borrow(), Some(12)); // (1+2+3)*2 = 12
    }

    #[test]
    fn test_empty_pipeline_skips_load() {
        let pipeline = Pipeline::new(
            MockExtractor(vec![]),
            DoubleTransformer,
            SumLoader(RefCell::new(None)),
        );

        let report = pipeline.run().unwrap();
        assert_eq!(report, PipelineReport::default());
        assert_eq!(*pipeline.loader.0.borrow(), None);
    }

    #[test]
    fn test_failed_transform_skips_load() {
        let pipeline = Pipeline::new(
            MockExtractor(vec![1]),
            FailingTransformer,
            SumLoader(RefCell::new(None)),
        );

        assert!(pipeline.run().is_err());
        assert_eq!(*pipeline.loader.0.borrow(), None);
    }
}
