//! Pipeline builder for composing result-tree stages.
//!
//! This module provides a type-safe fluent API for building pipelines.

use super::stage::{AnyStage, Stage};
use crate::errors::StatsError;
use std::any::Any;
use std::marker::PhantomData;
use std::time::{Duration, Instant};
use tracing::{debug, info_span};

/// Builder for constructing pipelines.
///
/// `I` is the input the finished pipeline accepts and `T` the output of the
/// last stage added so far; both are tracked at compile time.
///
/// # Example
///
/// ```rust,ignore
/// let pipeline = PipelineBuilder::<ResultsByYear>::new()
///     .stage(discard_empty_ids)      // ResultsByYear -> ResultsByYear
///     .stage(add_completion_counts)  // ResultsByYear -> ResultsByYear
///     .build();
/// let finished = pipeline.execute(raw_tree)?;
/// ```
pub struct PipelineBuilder<I, T> {
    stages: Vec<Box<dyn AnyStage>>,
    _phantom: PhantomData<fn(I) -> T>,
}

impl<I> PipelineBuilder<I, I> {
    /// Create a new empty pipeline builder accepting `I`.
    pub fn new() -> Self {
        Self {
            stages: Vec::new(),
            _phantom: PhantomData,
        }
    }
}

impl<I> Default for PipelineBuilder<I, I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I, T> PipelineBuilder<I, T> {
    /// Add a stage to the pipeline.
    ///
    /// The stage's input type must match the current pipeline output type.
    pub fn stage<S>(mut self, stage: S) -> PipelineBuilder<I, S::Output>
    where
        S: Stage<Input = T> + Send + Sync + 'static,
        S::Input: 'static,
        S::Output: 'static,
        S::Error: Into<StatsError>,
    {
        self.stages.push(Box::new(stage));
        PipelineBuilder {
            stages: self.stages,
            _phantom: PhantomData,
        }
    }

    /// Add a stage conditionally.
    ///
    /// ```rust,ignore
    /// let pipeline = PipelineBuilder::new()
    ///     .stage(add_percentages)
    ///     .when(params.means_enabled(), |p| p.stage(add_means))
    ///     .build();
    /// ```
    pub fn when<F>(self, condition: bool, f: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        if condition {
            f(self)
        } else {
            self
        }
    }

    /// Build the final pipeline ready for execution.
    pub fn build(self) -> BuiltPipeline<I, T> {
        BuiltPipeline {
            stages: self.stages,
            _phantom: PhantomData,
        }
    }
}

/// A built pipeline ready for execution.
///
/// The pipeline can be executed multiple times with different inputs.
pub struct BuiltPipeline<I, T> {
    stages: Vec<Box<dyn AnyStage>>,
    _phantom: PhantomData<fn(I) -> T>,
}

impl<I: 'static, T: 'static> BuiltPipeline<I, T> {
    /// Thread `input` through every stage in order.
    pub fn execute(&self, input: I) -> Result<T, StatsError> {
        self.run(input, |_| {})
    }

    /// Execute the pipeline and collect timing information for each stage.
    pub fn execute_with_timing(&self, input: I) -> Result<(T, Vec<StageTiming>), StatsError> {
        let mut timings = Vec::with_capacity(self.stages.len());
        let result = self.run(input, |timing| timings.push(timing))?;
        Ok((result, timings))
    }

    fn run(&self, input: I, mut on_stage: impl FnMut(StageTiming)) -> Result<T, StatsError> {
        let mut data: Box<dyn Any> = Box::new(input);
        let total = self.stages.len();

        for (i, stage) in self.stages.iter().enumerate() {
            let _span = info_span!("stage", name = stage.name()).entered();
            debug!("Stage {}/{}: {}", i + 1, total, stage.name());

            let start = Instant::now();
            data = stage.execute_any(data).map_err(|e| {
                StatsError::pipeline(format!("Failed in stage '{}': {}", stage.name(), e))
            })?;

            on_stage(StageTiming {
                name: stage.name().to_string(),
                duration: start.elapsed(),
            });
        }

        data.downcast::<T>()
            .map(|b| *b)
            .map_err(|_| StatsError::pipeline("Type mismatch in pipeline output"))
    }

    /// Get the number of stages in this pipeline.
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Names of the stages in execution order.
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }
}

/// Timing information for a pipeline stage.
#[derive(Debug, Clone)]
pub struct StageTiming {
    pub name: String,
    pub duration: Duration,
}

impl StageTiming {
    /// Format the timing as a human-readable string.
    pub fn format(&self) -> String {
        format!("{}: {:.3}ms", self.name, self.duration.as_secs_f64() * 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::stage::PureStage;

    struct Reject;

    impl Stage for Reject {
        type Input = i32;
        type Output = i32;
        type Error = StatsError;

        fn execute(&self, _: i32) -> Result<i32, StatsError> {
            Err(StatsError::other("nope"))
        }

        fn name(&self) -> &str {
            "Reject"
        }
    }

    #[test]
    fn test_pipeline_builder() {
        let pipeline = PipelineBuilder::<i32, i32>::new()
            .stage(PureStage::new("Add 1", |x: i32| x + 1))
            .stage(PureStage::new("Double", |x: i32| x * 2))
            .stage(PureStage::new("To String", |x: i32| x.to_string()))
            .build();

        assert_eq!(pipeline.execute(0).unwrap(), "2");
        assert_eq!(pipeline.execute(4).unwrap(), "10");
    }

    #[test]
    fn test_pipeline_conditional() {
        let with_extra = PipelineBuilder::<i32, i32>::new()
            .when(true, |p| p.stage(PureStage::new("Add 10", |x: i32| x + 10)))
            .stage(PureStage::new("Double", |x: i32| x * 2))
            .build();

        let without_extra = PipelineBuilder::<i32, i32>::new()
            .when(false, |p| {
                p.stage(PureStage::new("Add 10", |x: i32| x + 10))
            })
            .stage(PureStage::new("Double", |x: i32| x * 2))
            .build();

        assert_eq!(with_extra.execute(1).unwrap(), 22);
        assert_eq!(without_extra.execute(1).unwrap(), 2);
    }

    #[test]
    fn test_pipeline_timing() {
        let pipeline = PipelineBuilder::<i32, i32>::new()
            .stage(PureStage::new("Stage 1", |x: i32| x + 41))
            .stage(PureStage::new("Stage 2", |x: i32| x * 2))
            .build();

        let (result, timings) = pipeline.execute_with_timing(1).unwrap();

        assert_eq!(result, 84);
        assert_eq!(timings.len(), 2);
        assert_eq!(timings[0].name, "Stage 1");
        assert_eq!(timings[1].name, "Stage 2");
    }

    #[test]
    fn test_failing_stage_names_stage_in_error() {
        let pipeline = PipelineBuilder::<i32, i32>::new()
            .stage(Reject)
            .build();

        let err = pipeline.execute(1).unwrap_err();
        assert!(err.to_string().contains("Failed in stage 'Reject'"));
    }

    #[test]
    fn test_stage_count_and_names() {
        let pipeline = PipelineBuilder::<i32, i32>::new()
            .stage(PureStage::new("S1", |x: i32| x))
            .stage(PureStage::new("S2", |x: i32| x + 1))
            .build();

        assert_eq!(pipeline.stage_count(), 2);
        assert_eq!(pipeline.stage_names(), vec!["S1", "S2"]);
    }
}
