//! Entry points that run the whole pipeline for one request.

use super::configs::{ordering_pipeline, statistics_pipeline, TreePipeline};
use super::data::{ComputeParams, ComputeRequest, RespondentCounts};
use super::stages::{add_entities, combine_results, EntityLookup};
use crate::core::ResultsByYear;
use crate::errors::Result;
use std::sync::Arc;
use tracing::{debug, info, info_span, Instrument};

/// Compute the finished result tree for one question.
///
/// The free-text tree, if any, is merged first; then the statistics
/// pipeline runs, entities are attached when a lookup is given, and
/// buckets and facets are sorted last. Canonical values in the request
/// are used when `params` carries none.
pub async fn compute_results(
    request: ComputeRequest,
    params: &ComputeParams,
    lookup: Option<Arc<dyn EntityLookup>>,
) -> Result<ResultsByYear> {
    let span = info_span!(
        "compute_results",
        years = request.results.len(),
        freeform = request.freeform.is_some(),
    );

    async move {
        let (years, params) = prepare(request, params)?;

        let years = match lookup {
            Some(lookup) => {
                let mut years = years;
                let attached = add_entities(&mut years, lookup, params.max_concurrency)
                    .instrument(info_span!("stage", name = "add_entities"))
                    .await?;
                debug!(attached, "Entity enrichment complete");
                years
            }
            None => years,
        };

        let years = run_timed(&ordering_pipeline(&params), years)?;
        info!(years = years.len(), "Results computed");
        Ok(years)
    }
    .instrument(span)
    .await
}

/// Synchronous variant for callers without an entity lookup.
pub fn compute_results_blocking(
    request: ComputeRequest,
    params: &ComputeParams,
) -> Result<ResultsByYear> {
    let _span = info_span!("compute_results", years = request.results.len()).entered();
    let (years, params) = prepare(request, params)?;
    run_timed(&ordering_pipeline(&params), years)
}

fn prepare(
    request: ComputeRequest,
    params: &ComputeParams,
) -> Result<(ResultsByYear, ComputeParams)> {
    let ComputeRequest {
        results,
        freeform,
        total_respondents_by_year,
        question_respondents_by_year,
        values,
    } = request;

    let mut params = params.clone();
    if params.values.is_empty() {
        params.values = values;
    }

    let years = match freeform {
        Some(freeform) => {
            let _span = info_span!("stage", name = "combine_freeform").entered();
            combine_results(results, freeform)
        }
        None => results,
    };

    let counts = RespondentCounts {
        total_by_year: total_respondents_by_year,
        question_by_year: question_respondents_by_year,
    };
    let years = run_timed(&statistics_pipeline(&params, counts), years)?;
    Ok((years, params))
}

/// Execute `pipeline`, reporting each stage's duration at debug level.
fn run_timed(pipeline: &TreePipeline, years: ResultsByYear) -> Result<ResultsByYear> {
    let (years, timings) = pipeline.execute_with_timing(years)?;
    for timing in &timings {
        debug!(stage = %timing.name, elapsed = ?timing.duration, "{}", timing.format());
    }
    Ok(years)
}
