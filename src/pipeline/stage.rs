//! Pipeline stage abstractions for composable result transforms.
//!
//! A stage takes the result tree (or any other value) by ownership and hands
//! back the transformed value. Stages run strictly one after another; the
//! builder enforces at compile time that each stage accepts what the
//! previous one produced.

use crate::errors::StatsError;
use std::marker::PhantomData;

/// A pipeline stage that transforms data.
///
/// ```rust,ignore
/// stage1  // Input: A, Output: B
///   .then(stage2)  // Input: B, Output: C - OK!
///   .then(stage3)  // Input: D, Output: E - Compile error!
/// ```
pub trait Stage {
    type Input;
    type Output;
    type Error;

    /// Execute this stage with the given input.
    fn execute(&self, input: Self::Input) -> Result<Self::Output, Self::Error>;

    /// Stage name used in tracing spans and timings.
    fn name(&self) -> &str;
}

/// A stage that cannot fail.
///
/// # Example
///
/// ```rust,ignore
/// let stage = PureStage::new("add_percentages", |mut years: ResultsByYear| {
///     add_percentages(&mut years);
///     years
/// });
/// ```
pub struct PureStage<F, I, O> {
    name: String,
    func: F,
    _phantom: PhantomData<(I, O)>,
}

impl<F, I, O> PureStage<F, I, O>
where
    F: Fn(I) -> O,
{
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
            _phantom: PhantomData,
        }
    }
}

impl<F, I, O> Stage for PureStage<F, I, O>
where
    F: Fn(I) -> O,
{
    type Input = I;
    type Output = O;
    type Error = std::convert::Infallible;

    fn execute(&self, input: Self::Input) -> Result<Self::Output, Self::Error> {
        Ok((self.func)(input))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Type-erased stage so the builder can keep heterogeneous stages in one list.
pub(crate) trait AnyStage: Send + Sync {
    fn execute_any(
        &self,
        input: Box<dyn std::any::Any>,
    ) -> Result<Box<dyn std::any::Any>, StatsError>;
    fn name(&self) -> &str;
}

impl<S> AnyStage for S
where
    S: Stage + Send + Sync,
    S::Input: 'static,
    S::Output: 'static,
    S::Error: Into<StatsError>,
{
    fn execute_any(
        &self,
        input: Box<dyn std::any::Any>,
    ) -> Result<Box<dyn std::any::Any>, StatsError> {
        let typed_input = input
            .downcast::<S::Input>()
            .map_err(|_| StatsError::pipeline("Type mismatch in pipeline stage input"))?;

        let output = self.execute(*typed_input).map_err(|e| e.into())?;
        Ok(Box::new(output))
    }

    fn name(&self) -> &str {
        Stage::name(self)
    }
}
