// Export modules for library usage
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod errors;
pub mod pipeline;

// Re-export commonly used types
pub use crate::core::{
    BucketId, BucketResult, CompletionStats, Entity, FacetResult, ResultsByYear, YearResult,
};

pub use crate::config::{load_config, load_config_from, StatsConfig};

pub use crate::errors::{Result, StatsError};

pub use crate::pipeline::stages::{
    EntityLookup, FacetLimits, SortField, SortOrder, SortSpec, StaticEntityLookup, NO_ANSWER,
};

pub use crate::pipeline::{
    compute_results, compute_results_blocking, ComputeParams, ComputeRequest,
};
