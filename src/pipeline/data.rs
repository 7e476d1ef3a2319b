//! Data handed to the pipeline: the request document and the parameters.

use crate::core::{BucketId, ResultsByYear};
use crate::pipeline::stages::entities::DEFAULT_MAX_CONCURRENCY;
use crate::pipeline::stages::filtering::FacetLimits;
use crate::pipeline::stages::sorting::{SortField, SortSpec};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Everything the grouping backend and metadata layer provide for one question.
///
/// Year maps are keyed by year; in JSON the keys are strings (`"2023"`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComputeRequest {
    /// Raw grouped counts for the predefined options
    pub results: ResultsByYear,

    /// Raw grouped counts for the free-text field, merged into `results`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freeform: Option<ResultsByYear>,

    /// Survey-wide respondents per year
    #[serde(default)]
    pub total_respondents_by_year: HashMap<i32, u64>,

    /// Respondents to this question per year
    #[serde(default)]
    pub question_respondents_by_year: HashMap<i32, u64>,

    /// Canonical ordered answer options for the question
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<BucketId>,
}

impl ComputeRequest {
    pub fn new(results: ResultsByYear) -> Self {
        Self {
            results,
            ..Self::default()
        }
    }

    pub fn with_freeform(mut self, freeform: ResultsByYear) -> Self {
        self.freeform = Some(freeform);
        self
    }

    pub fn with_totals(
        mut self,
        total_respondents_by_year: HashMap<i32, u64>,
        question_respondents_by_year: HashMap<i32, u64>,
    ) -> Self {
        self.total_respondents_by_year = total_respondents_by_year;
        self.question_respondents_by_year = question_respondents_by_year;
        self
    }

    pub fn with_values(mut self, values: Vec<BucketId>) -> Self {
        self.values = values;
        self
    }
}

/// Per-year denominators for completion counts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RespondentCounts {
    pub total_by_year: HashMap<i32, u64>,
    pub question_by_year: HashMap<i32, u64>,
}

/// Parameters controlling which optional stages run and how.
///
/// An unset parameter disables its stage.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputeParams {
    pub facet_limits: FacetLimits,
    /// Minimum bucket count
    pub cutoff: Option<u64>,
    /// Maximum buckets per facet
    pub bucket_limit: Option<usize>,
    /// Canonical answer order, used for zero-fill, means and explicit sorting
    pub values: Vec<BucketId>,
    pub bucket_sort: Option<SortSpec>,
    pub facet_sort: Option<SortSpec>,
    pub means: bool,
    pub parallel: bool,
    pub max_concurrency: usize,
}

impl Default for ComputeParams {
    fn default() -> Self {
        Self {
            facet_limits: FacetLimits::default(),
            cutoff: None,
            bucket_limit: None,
            values: Vec::new(),
            bucket_sort: None,
            facet_sort: None,
            means: false,
            parallel: true,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }
}

impl ComputeParams {
    pub fn with_facet_limits(mut self, facet_limits: FacetLimits) -> Self {
        self.facet_limits = facet_limits;
        self
    }

    pub fn with_cutoff(mut self, cutoff: u64) -> Self {
        self.cutoff = Some(cutoff);
        self
    }

    pub fn with_bucket_limit(mut self, limit: usize) -> Self {
        self.bucket_limit = Some(limit);
        self
    }

    pub fn with_values(mut self, values: Vec<BucketId>) -> Self {
        self.values = values;
        self
    }

    pub fn with_bucket_sort(mut self, spec: SortSpec) -> Self {
        self.bucket_sort = Some(spec);
        self
    }

    pub fn with_facet_sort(mut self, spec: SortSpec) -> Self {
        self.facet_sort = Some(spec);
        self
    }

    pub fn with_means(mut self, means: bool) -> Self {
        self.means = means;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    /// Bucket sort with explicit-values mode falling back to `values` when
    /// no option list was given.
    pub fn effective_bucket_sort(&self) -> Option<SortSpec> {
        self.bucket_sort.clone().map(|mut spec| {
            if spec.sort == SortField::Options && spec.options.is_empty() {
                spec.options = self.values.clone();
            }
            spec
        })
    }

    pub fn means_enabled(&self) -> bool {
        self.means && !self.values.is_empty()
    }
}
