//! Configuration for statistics computation.
//!
//! Loaded from `.survey-stats.toml`. Every section is optional:
//!
//! ```toml
//! parallel = true
//!
//! [facets]
//! limit = 10
//! min_percent = 1.0
//! min_count = 5
//!
//! [buckets]
//! cutoff = 1
//! limit = 1000
//!
//! [sort]
//! sort = "count"
//! order = "desc"
//!
//! [facet_sort]
//! sort = "mean"
//! order = "asc"
//!
//! [means]
//! enabled = true
//!
//! [enrichment]
//! enabled = true
//! max_concurrency = 8
//! ```

pub mod loader;

pub use loader::{load_config, load_config_from, parse_and_validate_config, CONFIG_FILE_NAME};

use crate::errors::{Result, StatsError};
use crate::pipeline::stages::entities::DEFAULT_MAX_CONCURRENCY;
use crate::pipeline::stages::filtering::FacetLimits;
use crate::pipeline::stages::sorting::SortSpec;
use crate::pipeline::ComputeParams;
use serde::{Deserialize, Serialize};

/// Buckets below this count are dropped unless configured otherwise.
pub const DEFAULT_CUTOFF: u64 = 1;

/// Buckets kept per facet unless configured otherwise.
pub const DEFAULT_BUCKET_LIMIT: usize = 1000;

/// Root configuration structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsConfig {
    /// Run CPU-bound stages across years in parallel
    #[serde(default = "default_true")]
    pub parallel: bool,

    #[serde(default)]
    pub facets: FacetLimits,

    #[serde(default)]
    pub buckets: BucketConfig,

    /// Bucket ordering within each facet
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortSpec>,

    /// Facet ordering within each year
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facet_sort: Option<SortSpec>,

    #[serde(default)]
    pub means: MeansConfig,

    #[serde(default)]
    pub enrichment: EnrichmentConfig,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            facets: FacetLimits::default(),
            buckets: BucketConfig::default(),
            sort: None,
            facet_sort: None,
            means: MeansConfig::default(),
            enrichment: EnrichmentConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketConfig {
    /// Minimum count for a bucket to be kept
    #[serde(default = "default_cutoff")]
    pub cutoff: Option<u64>,
    /// Maximum buckets per facet; `0` disables the limit
    #[serde(default = "default_bucket_limit")]
    pub limit: Option<usize>,
}

impl Default for BucketConfig {
    fn default() -> Self {
        Self {
            cutoff: default_cutoff(),
            limit: default_bucket_limit(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeansConfig {
    #[serde(default)]
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_cutoff() -> Option<u64> {
    Some(DEFAULT_CUTOFF)
}

fn default_bucket_limit() -> Option<usize> {
    Some(DEFAULT_BUCKET_LIMIT)
}

fn default_max_concurrency() -> usize {
    DEFAULT_MAX_CONCURRENCY
}

impl StatsConfig {
    /// Reject values no stage can make sense of.
    pub fn validate(&self) -> Result<()> {
        if self.enrichment.max_concurrency == 0 {
            return Err(StatsError::config(
                "enrichment.max_concurrency must be at least 1",
            ));
        }
        if let Some(min_percent) = self.facets.min_percent {
            if !(0.0..=100.0).contains(&min_percent) {
                return Err(StatsError::config(format!(
                    "facets.min_percent must be within 0..=100, got {}",
                    min_percent
                )));
            }
        }
        Ok(())
    }

    /// Build the pipeline parameters for one question.
    pub fn to_params(&self) -> ComputeParams {
        ComputeParams {
            facet_limits: self.facets,
            cutoff: self.buckets.cutoff,
            bucket_limit: self.buckets.limit.filter(|limit| *limit > 0),
            values: Vec::new(),
            bucket_sort: self.sort.clone(),
            facet_sort: self.facet_sort.clone(),
            means: self.means.enabled,
            parallel: self.parallel,
            max_concurrency: self.enrichment.max_concurrency,
        }
    }
}
