//! Survey statistics pipeline.
//!
//! Turns a raw grouped-count tree into the fully annotated tree served to
//! clients. Each stage is a plain function over an owned tree (see
//! [`stages`]); [`configs`] wires them in dependency order and [`compute`]
//! runs a whole request, including asynchronous entity enrichment.

pub mod builder;
pub mod compute;
pub mod configs;
pub mod data;
pub mod stage;
pub mod stages;

pub use builder::{BuiltPipeline, PipelineBuilder, StageTiming};
pub use compute::{compute_results, compute_results_blocking};
pub use data::{ComputeParams, ComputeRequest, RespondentCounts};
pub use stage::{PureStage, Stage};
