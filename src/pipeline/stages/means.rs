//! Weighted means over ordinal answer scales.

use crate::core::metrics::{round_to, MEAN_PRECISION};
use crate::core::{BucketId, FacetResult, YearResult};
use std::collections::HashMap;

/// Set `mean` on every facet from an ordinal scale (pure, in place).
///
/// Each identifier in `values` gets its 1-based position as coefficient;
/// buckets whose identifier is not in `values` weigh `1`. A facet with no
/// responses has no mean.
pub fn add_means(years: &mut [YearResult], values: &[BucketId]) {
    let coefficients: HashMap<String, u64> = values
        .iter()
        .enumerate()
        .rev()
        .map(|(index, id)| (id.to_string(), index as u64 + 1))
        .collect();

    for year in years.iter_mut() {
        for facet in year.facets.iter_mut() {
            facet.mean = facet_mean(facet, &coefficients);
        }
    }
}

fn facet_mean(facet: &FacetResult, coefficients: &HashMap<String, u64>) -> Option<f64> {
    let (weighted, total) = facet.buckets.iter().fold((0u64, 0u64), |(weighted, total), b| {
        let coeff = coefficients.get(&b.id.to_string()).copied().unwrap_or(1);
        (weighted + b.count * coeff, total + b.count)
    });
    if total == 0 {
        return None;
    }
    Some(round_to(weighted as f64 / total as f64, MEAN_PRECISION))
}
