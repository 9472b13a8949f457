//! Transformer trait for data transformation

use eyre::Result;

/// Transformer trait for transforming a batch
///
/// Implementors define how to turn one batch into another:
/// - Decoding encoded fields into columns
/// - Removing fields
/// - Removing duplicate rows
///
/// The input is taken by value and a new batch is returned.
///
/// # Example
/// ```no_run
/// use disaster_etl::etl::Transformer;
/// use eyre::Result;
///
/// struct Uppercase;
///
/// impl Transformer for Uppercase {
///     type Input = Vec<String>;
///     type Output = Vec<String>;
///
///     fn transform(&self, input: Self::Input) -> Result<Self::Output> {
///         Ok(input.into_iter().map(|s| s.to_uppercase()).collect())
///     }
/// }
/// ```
pub trait Transformer {
    /// Input batch type
    type Input;

    /// Output batch type after transformation
    type Output;

    /// Transform a batch
    ///
    /// # Errors
    /// Returns an error if transformation fails (decoding, validation, etc.)
    fn transform(&self, input: Self::Input) -> Result<Self::Output>;

    /// Run `next` on the output of this transformer
    fn then<N>(self, next: N) -> Chain<Self, N>
    where
        Self: Sized,
        N: Transformer<Input = Self::Output>,
    {
        Chain { first: self, next }
    }
}

/// Two transformers applied in sequence, built with [`Transformer::then`]
pub struct Chain<A, B> {
    first: A,
    next: B,
}

impl<A, B> Transformer for Chain<A, B>
where
    A: Transformer,
    B: Transformer<Input = A::Output>,
{
    type Input = A::Input;
    type Output = B::Output;

    fn transform(&self, input: Self::Input) -> Result<Self::Output> {
        let intermediate = self.first.transform(input)?;
        self.next.transform(intermediate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AddOne;

    impl Transformer for AddOne {
        type Input = Vec<i32>;
        type Output = Vec<i32>;
        fn transform(&self, input: Self::Input) -> Result<Self::Output> {
            Ok(input.into_iter().map(|i| i + 1).collect())
        }
    }

    struct Double;

    impl Transformer for Double {
        type Input = Vec<i32>;
        type Output = Vec<i32>;
        fn transform(&self, input: Self::Input) -> Result<Self::Output> {
            Ok(input.into_iter().map(|i| i * 2).collect())
        }
    }

    #[test]
    fn test_chain_order() {
        let chain = AddOne.then(Double);
        assert_eq!(chain.transform(vec![1, 2]).unwrap(), vec![4, 6]);

        let chain = Double.then(AddOne);
        assert_eq!(chain.transform(vec![1, 2]).unwrap(), vec![3, 5]);
    }
}
