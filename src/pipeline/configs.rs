//! Pre-wired pipelines over the result tree.
//!
//! The stage order encodes the dependencies between stages:
//!
//! 1. **discard_empty_ids**
//! 2. **add_completion_counts**: denominators for everything below
//! 3. **presort_facets / limit_facets**: needs facet completion; the kept
//!    prefix follows the facet sort when one is set
//! 4. **apply_cutoff**
//! 5. **rank_buckets / presort_buckets / limit_buckets**: derived fields are
//!    filled in first so the kept prefix follows the requested order
//! 6. **add_missing_bucket_values**
//! 7. **add_percentages**: recomputed over the final facet and bucket sets
//! 8. **add_means**
//!
//! Entity enrichment runs between the statistics and ordering pipelines,
//! then buckets and facets are sorted.

use super::data::{ComputeParams, RespondentCounts};
use super::stage::PureStage;
use super::stages::{
    add_completion_counts, add_means, add_missing_bucket_values, add_percentages, apply_cutoff,
    discard_empty_ids, limit_buckets, limit_facets, sort_buckets, sort_facets, SortField,
};
use super::{BuiltPipeline, PipelineBuilder};
use crate::core::{ResultsByYear, YearResult};
use std::sync::Arc;
use tracing::debug;

/// A pipeline from raw tree to annotated tree.
pub type TreePipeline = BuiltPipeline<ResultsByYear, ResultsByYear>;

/// Wrap an in-place transform as a named tree stage.
fn tree_stage<F>(
    name: &'static str,
    params: &Arc<ComputeParams>,
    transform: F,
) -> PureStage<impl Fn(ResultsByYear) -> ResultsByYear + Send + Sync, ResultsByYear, ResultsByYear>
where
    F: Fn(&mut [YearResult], &ComputeParams) + Send + Sync + 'static,
{
    let params = Arc::clone(params);
    PureStage::new(name, move |mut years: ResultsByYear| {
        transform(&mut years, &params);
        years
    })
}

/// Stages 1-8: completion, filtering, shape, percentages and means.
pub fn statistics_pipeline(params: &ComputeParams, counts: RespondentCounts) -> TreePipeline {
    let params = Arc::new(params.clone());
    let counts = Arc::new(counts);

    PipelineBuilder::new()
        .stage(tree_stage("discard_empty_ids", &params, |years, _| {
            discard_empty_ids(years)
        }))
        .stage(tree_stage("add_completion_counts", &params, move |years, _| {
            add_completion_counts(years, &counts.total_by_year, &counts.question_by_year)
        }))
        .when(presorts_facets(&params), |p| {
            p.stage(tree_stage("presort_facets", &params, |years, params| {
                if let Some(spec) = &params.facet_sort {
                    if spec.sort == SortField::Mean && params.means_enabled() {
                        add_means(years, &params.values);
                    }
                    sort_facets(years, spec);
                }
            }))
        })
        .when(!params.facet_limits.is_noop(), |p| {
            p.stage(tree_stage("limit_facets", &params, |years, params| {
                debug!(limits = ?params.facet_limits, "Limiting facets");
                limit_facets(years, &params.facet_limits)
            }))
        })
        .when(params.cutoff.is_some(), |p| {
            p.stage(tree_stage("apply_cutoff", &params, |years, params| {
                debug!(cutoff = ?params.cutoff, "Applying bucket cutoff");
                apply_cutoff(years, params.cutoff)
            }))
        })
        .when(params.bucket_limit.is_some(), |p| {
            p.stage(tree_stage("rank_buckets", &params, |years, params| {
                add_percentages(years, params.parallel)
            }))
            .stage(tree_stage("presort_buckets", &params, |years, params| {
                if let Some(spec) = params.effective_bucket_sort() {
                    sort_buckets(years, &spec, params.parallel);
                }
            }))
            .stage(tree_stage("limit_buckets", &params, |years, params| {
                debug!(limit = ?params.bucket_limit, "Limiting buckets");
                limit_buckets(years, params.bucket_limit)
            }))
        })
        .when(!params.values.is_empty(), |p| {
            p.stage(tree_stage(
                "add_missing_bucket_values",
                &params,
                |years, params| add_missing_bucket_values(years, &params.values),
            ))
        })
        .stage(tree_stage("add_percentages", &params, |years, params| {
            add_percentages(years, params.parallel)
        }))
        .when(params.means_enabled(), |p| {
            p.stage(tree_stage("add_means", &params, |years, params| {
                add_means(years, &params.values)
            }))
        })
        .build()
}

// Only a facet count limit depends on order; thresholds do not.
fn presorts_facets(params: &ComputeParams) -> bool {
    params.facet_sort.is_some() && params.facet_limits.limit.is_some_and(|limit| limit > 0)
}

/// Final ordering of buckets and facets.
pub fn ordering_pipeline(params: &ComputeParams) -> TreePipeline {
    let params = Arc::new(params.clone());

    PipelineBuilder::new()
        .when(params.bucket_sort.is_some(), |p| {
            p.stage(tree_stage("sort_buckets", &params, |years, params| {
                if let Some(spec) = params.effective_bucket_sort() {
                    sort_buckets(years, &spec, params.parallel);
                }
            }))
        })
        .when(params.facet_sort.is_some(), |p| {
            p.stage(tree_stage("sort_facets", &params, |years, params| {
                if let Some(spec) = &params.facet_sort {
                    sort_facets(years, spec);
                }
            }))
        })
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::BucketId;
    use crate::pipeline::stages::{FacetLimits, SortOrder, SortSpec};

    #[test]
    fn test_minimal_statistics_pipeline() {
        let pipeline = statistics_pipeline(&ComputeParams::default(), RespondentCounts::default());
        assert_eq!(
            pipeline.stage_names(),
            vec!["discard_empty_ids", "add_completion_counts", "add_percentages"]
        );
    }

    #[test]
    fn test_full_statistics_pipeline_order() {
        let params = ComputeParams::default()
            .with_facet_limits(FacetLimits {
                limit: Some(5),
                ..FacetLimits::default()
            })
            .with_cutoff(1)
            .with_bucket_limit(10)
            .with_values(vec![BucketId::from("a")])
            .with_means(true);

        let pipeline = statistics_pipeline(&params, RespondentCounts::default());

        assert_eq!(
            pipeline.stage_names(),
            vec![
                "discard_empty_ids",
                "add_completion_counts",
                "limit_facets",
                "apply_cutoff",
                "rank_buckets",
                "presort_buckets",
                "limit_buckets",
                "add_missing_bucket_values",
                "add_percentages",
                "add_means",
            ]
        );
    }

    #[test]
    fn test_facet_presort_only_with_count_limit() {
        let sorted = ComputeParams::default()
            .with_facet_sort(SortSpec::by_field(SortField::Count, SortOrder::Desc));

        let thresholds_only = sorted.clone().with_facet_limits(FacetLimits {
            min_count: Some(3),
            ..FacetLimits::default()
        });
        assert!(!statistics_pipeline(&thresholds_only, RespondentCounts::default())
            .stage_names()
            .contains(&"presort_facets"));

        let limited = sorted.with_facet_limits(FacetLimits {
            limit: Some(2),
            ..FacetLimits::default()
        });
        let pipeline = statistics_pipeline(&limited, RespondentCounts::default());
        let names = pipeline.stage_names();
        assert_eq!(names[2..4], ["presort_facets", "limit_facets"]);
    }

    #[test]
    fn test_ordering_pipeline_stages() {
        assert_eq!(ordering_pipeline(&ComputeParams::default()).stage_count(), 0);

        let params = ComputeParams::default()
            .with_bucket_sort(SortSpec::by_field(SortField::Count, SortOrder::Desc))
            .with_facet_sort(SortSpec::by_field(SortField::Id, SortOrder::Asc));
        assert_eq!(
            ordering_pipeline(&params).stage_names(),
            vec!["sort_buckets", "sort_facets"]
        );
    }
}
