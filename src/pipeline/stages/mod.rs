//! Result-tree transforms, one module per pipeline component.
//!
//! Every stage except entity enrichment is a synchronous, total function
//! over an owned tree: no I/O, no failure modes. Stages depend on fields
//! set by earlier ones, so they are only meant to be run in the order laid
//! out by [`crate::pipeline::compute`].

pub mod completion;
pub mod entities;
pub mod filtering;
pub mod freeform;
pub mod means;
pub mod percentages;
pub mod shape;
pub mod sorting;

pub use completion::add_completion_counts;
pub use entities::{add_entities, EntityLookup, StaticEntityLookup};
pub use filtering::{apply_cutoff, discard_empty_ids, limit_buckets, limit_facets, FacetLimits};
pub use freeform::{combine_results, NO_ANSWER};
pub use means::add_means;
pub use percentages::add_percentages;
pub use shape::add_missing_bucket_values;
pub use sorting::{sort_buckets, sort_facets, SortField, SortOrder, SortSpec};
