//! Bucket percentages and cross-facet aggregates.
//!
//! Three denominators are in play and must not be mixed up:
//! - survey respondents (`year.completion.total`)
//! - question respondents (`year.completion.count`)
//! - facet respondents (`facet.completion.count`)
//!
//! Cross-facet sums are taken over whatever facets remain, so facet
//! filtering and limiting must already have run.

use crate::core::metrics::ratio_to_percentage;
use crate::core::{BucketId, YearResult};
use rayon::prelude::*;
use std::collections::HashMap;

/// Populate every percentage field and `count_all_facets` (pure, in place).
///
/// Years are independent of each other and are processed in parallel when
/// `parallel` is set.
pub fn add_percentages(years: &mut [YearResult], parallel: bool) {
    if parallel {
        years.par_iter_mut().for_each(add_year_percentages);
    } else {
        years.iter_mut().for_each(add_year_percentages);
    }
}

/// Sum of counts per bucket identifier across all facets of a year.
pub fn counts_across_facets(year: &YearResult) -> HashMap<BucketId, u64> {
    let mut totals: HashMap<BucketId, u64> = HashMap::new();
    for bucket in year.facets.iter().flat_map(|f| f.buckets.iter()) {
        *totals.entry(bucket.id.clone()).or_insert(0) += bucket.count;
    }
    totals
}

fn add_year_percentages(year: &mut YearResult) {
    let totals = counts_across_facets(year);
    let survey_total = year.completion.total;
    let question_total = year.completion.count;

    for facet in year.facets.iter_mut() {
        let facet_total = facet.completion.count;
        for bucket in facet.buckets.iter_mut() {
            bucket.percentage_survey = ratio_to_percentage(bucket.count, survey_total);
            bucket.percentage_question = ratio_to_percentage(bucket.count, question_total);
            bucket.percentage_facet = ratio_to_percentage(bucket.count, facet_total);

            bucket.count_all_facets = totals.get(&bucket.id).copied().unwrap_or(0);
            bucket.percentage_all_facets =
                ratio_to_percentage(bucket.count_all_facets, question_total);
        }
    }
}
