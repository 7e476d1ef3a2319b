//! Zero-filling buckets so every facet exposes the same identifiers.

use crate::core::{BucketId, BucketResult, YearResult};
use std::collections::HashSet;

/// Append a zero bucket for every expected identifier a facet lacks (pure, in place).
///
/// Identifiers are matched by their stringified form, since metadata lists
/// and backend data do not always agree on numeric vs string representation.
/// Zero buckets keep the canonical identifier and are appended in the order
/// of `values`.
pub fn add_missing_bucket_values(years: &mut [YearResult], values: &[BucketId]) {
    if values.is_empty() {
        return;
    }
    for year in years.iter_mut() {
        for facet in year.facets.iter_mut() {
            let mut seen: HashSet<String> =
                facet.buckets.iter().map(|b| b.id.to_string()).collect();
            let missing: Vec<BucketResult> = values
                .iter()
                .filter(|value| seen.insert(value.to_string()))
                .map(|value| BucketResult::zero(value.clone()))
                .collect();
            facet.buckets.extend(missing);
        }
    }
}
