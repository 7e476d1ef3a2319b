//! Merging free-text answer counts into predefined-option counts.
//!
//! Both trees are aggregated independently by the grouping backend. The
//! merge runs before any other stage and leaves a single, duplicate-free
//! bucket list per facet: overlapping identifiers have their counts summed,
//! free-text-only identifiers are appended and tagged `isFreeformData`.

use crate::core::{BucketId, BucketResult, FacetResult, ResultsByYear, YearResult};
use std::collections::{HashMap, HashSet};

/// Identifier of the "did not answer" bucket in free-text results.
pub const NO_ANSWER: &str = "__no_answer__";

/// Merge a free-text tree into the predefined tree, matching years.
///
/// Years without free-text data pass through unchanged; free-text years
/// absent from the predefined tree are dropped.
pub fn combine_results(primary: ResultsByYear, freeform: ResultsByYear) -> ResultsByYear {
    let mut freeform_by_year: HashMap<i32, YearResult> =
        freeform.into_iter().map(|year| (year.year, year)).collect();

    primary
        .into_iter()
        .map(|year| match freeform_by_year.remove(&year.year) {
            Some(freeform_year) => combine_year(year, freeform_year),
            None => year,
        })
        .collect()
}

/// Merge one year's free-text facets into its predefined facets.
///
/// Facets are matched by identifier; a free-text facet with no predefined
/// counterpart is appended as a new facet.
pub fn combine_year(mut year: YearResult, freeform: YearResult) -> YearResult {
    for freeform_facet in freeform.facets {
        match year.facets.iter_mut().find(|f| f.id == freeform_facet.id) {
            Some(facet) => {
                let primary = std::mem::take(&mut facet.buckets);
                facet.buckets = combine_buckets(primary, freeform_facet.buckets);
            }
            None => {
                let buckets = combine_buckets(Vec::new(), freeform_facet.buckets);
                year.facets.push(FacetResult::new(freeform_facet.id, buckets));
            }
        }
    }
    year
}

/// Merge free-text buckets into predefined buckets.
///
/// The free-text "no answer" bucket is dropped. Predefined buckets keep
/// their position and fields; only their count grows.
pub fn combine_buckets(
    primary: Vec<BucketResult>,
    freeform: Vec<BucketResult>,
) -> Vec<BucketResult> {
    let no_answer = BucketId::from(NO_ANSWER);

    let mut extra: Vec<BucketResult> = Vec::new();
    let mut extra_index: HashMap<BucketId, usize> = HashMap::new();
    for mut bucket in freeform.into_iter().filter(|b| b.id != no_answer) {
        match extra_index.get(&bucket.id) {
            Some(&i) => extra[i].count += bucket.count,
            None => {
                extra_index.insert(bucket.id.clone(), extra.len());
                bucket.is_freeform_data = true;
                extra.push(bucket);
            }
        }
    }

    let mut merged = primary;
    for bucket in merged.iter_mut() {
        if let Some(&i) = extra_index.get(&bucket.id) {
            bucket.count += extra[i].count;
        }
    }

    let primary_ids: HashSet<BucketId> = merged.iter().map(|b| b.id.clone()).collect();
    merged.extend(extra.into_iter().filter(|b| !primary_ids.contains(&b.id)));
    merged
}
