//! Filtering and truncation of facets and buckets.
//!
//! Every filter here is optional: an absent parameter leaves the tree
//! untouched. Truncation is always a prefix-take over the current order.

use crate::core::YearResult;
use serde::{Deserialize, Serialize};

/// Facet thresholds and limits.
///
/// For example, when faceting salary by country we may keep only the first
/// ten countries, or drop countries with too few respondents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FacetLimits {
    /// Keep at most this many facets
    #[serde(default)]
    pub limit: Option<usize>,
    /// Keep facets whose question percentage exceeds this value
    #[serde(default)]
    pub min_percent: Option<f64>,
    /// Keep facets whose respondent count exceeds this value
    #[serde(default)]
    pub min_count: Option<u64>,
}

impl FacetLimits {
    pub fn is_noop(&self) -> bool {
        self.limit.unwrap_or(0) == 0
            && active(self.min_percent).is_none()
            && self.min_count.unwrap_or(0) == 0
    }
}

// Zero means "not set", matching how the limits arrive from query arguments.
fn active(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v > 0.0)
}

/// Remove facets and buckets whose identifier is empty (pure, in place).
///
/// Numeric identifiers are always kept, including `0`.
pub fn discard_empty_ids(years: &mut [YearResult]) {
    for year in years.iter_mut() {
        year.facets.retain(|f| !f.id.is_empty());
        for facet in year.facets.iter_mut() {
            facet.buckets.retain(|b| !b.id.is_empty());
        }
    }
}

/// Drop facets below the completion thresholds, then truncate (pure, in place).
///
/// Requires `completion` to be populated on every facet.
pub fn limit_facets(years: &mut [YearResult], limits: &FacetLimits) {
    let min_percent = active(limits.min_percent);
    let min_count = limits.min_count.filter(|c| *c > 0);
    let limit = limits.limit.filter(|l| *l > 0);

    for year in years.iter_mut() {
        if min_percent.is_some() || min_count.is_some() {
            year.facets.retain(|f| {
                let above_percent = min_percent.map_or(true, |min| {
                    f.completion.percentage_question.unwrap_or(0.0) > min
                });
                let above_count = min_count.map_or(true, |min| f.completion.count > min);
                above_percent && above_count
            });
        }
        if let Some(limit) = limit {
            year.facets.truncate(limit);
        }
    }
}

/// Keep only buckets with `count >= cutoff` (pure, in place).
pub fn apply_cutoff(years: &mut [YearResult], cutoff: Option<u64>) {
    let Some(cutoff) = cutoff else {
        return;
    };
    for year in years.iter_mut() {
        for facet in year.facets.iter_mut() {
            facet.buckets.retain(|b| b.count >= cutoff);
        }
    }
}

/// Keep the first `limit` buckets of every facet (pure, in place).
pub fn limit_buckets(years: &mut [YearResult], limit: Option<usize>) {
    let Some(limit) = limit else {
        return;
    };
    for year in years.iter_mut() {
        for facet in year.facets.iter_mut() {
            facet.buckets.truncate(limit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BucketId, BucketResult, CompletionStats, FacetResult};
    use proptest::prelude::*;
    use serde_json::json;

    fn facet_with_completion(id: &str, count: u64, percentage_question: f64) -> FacetResult {
        let mut facet = FacetResult::new(id, vec![BucketResult::new("a", count)]);
        facet.completion = CompletionStats {
            total: 1000,
            count,
            percentage_question: Some(percentage_question),
            percentage_survey: 0.0,
        };
        facet
    }

    fn facet_ids(year: &YearResult) -> Vec<String> {
        year.facets.iter().map(|f| f.id.to_string()).collect()
    }

    #[test]
    fn test_discard_empty_ids_keeps_numeric_zero() {
        let mut years = vec![YearResult::new(
            2023,
            vec![
                FacetResult::new(
                    "fr",
                    vec![
                        BucketResult::new("", 3),
                        BucketResult::new(0i64, 2),
                        BucketResult::new(BucketId::Structured(json!({})), 1),
                        BucketResult::new("yes", 1),
                    ],
                ),
                FacetResult::new("", vec![BucketResult::new("yes", 4)]),
                FacetResult::new(BucketId::Structured(json!([])), vec![]),
            ],
        )];

        discard_empty_ids(&mut years);

        assert_eq!(facet_ids(&years[0]), vec!["fr"]);
        let ids: Vec<String> = years[0].facets[0]
            .buckets
            .iter()
            .map(|b| b.id.to_string())
            .collect();
        assert_eq!(ids, vec!["0", "yes"]);
    }

    #[test]
    fn test_limit_facets_by_percent_and_count() {
        let mut years = vec![YearResult::new(
            2023,
            vec![
                facet_with_completion("a", 50, 50.0),
                facet_with_completion("b", 5, 5.0),
                facet_with_completion("c", 30, 3.0),
            ],
        )];

        let limits = FacetLimits {
            min_percent: Some(4.0),
            min_count: Some(10),
            ..FacetLimits::default()
        };
        limit_facets(&mut years, &limits);

        assert_eq!(facet_ids(&years[0]), vec!["a"]);
    }

    #[test]
    fn test_limit_facets_thresholds_are_exclusive() {
        let mut years = vec![YearResult::new(
            2023,
            vec![
                facet_with_completion("a", 10, 10.0),
                facet_with_completion("b", 11, 11.0),
            ],
        )];

        limit_facets(
            &mut years,
            &FacetLimits {
                min_count: Some(10),
                ..FacetLimits::default()
            },
        );

        assert_eq!(facet_ids(&years[0]), vec!["b"]);
    }

    #[test]
    fn test_limit_facets_prefix_take_preserves_order() {
        let mut years = vec![YearResult::new(
            2023,
            vec![
                facet_with_completion("z", 1, 1.0),
                facet_with_completion("a", 100, 90.0),
                facet_with_completion("m", 50, 40.0),
            ],
        )];

        limit_facets(
            &mut years,
            &FacetLimits {
                limit: Some(2),
                ..FacetLimits::default()
            },
        );

        assert_eq!(facet_ids(&years[0]), vec!["z", "a"]);
    }

    #[test]
    fn test_limit_facets_without_parameters_is_noop() {
        let original = vec![YearResult::new(
            2023,
            vec![facet_with_completion("a", 0, 0.0)],
        )];
        let mut years = original.clone();

        assert!(FacetLimits::default().is_noop());
        limit_facets(&mut years, &FacetLimits::default());
        assert_eq!(years, original);

        let zeroes = FacetLimits {
            limit: Some(0),
            min_percent: Some(0.0),
            min_count: Some(0),
        };
        assert!(zeroes.is_noop());
        limit_facets(&mut years, &zeroes);
        assert_eq!(years, original);
    }

    #[test]
    fn test_apply_cutoff() {
        let mut years = vec![YearResult::new(
            2023,
            vec![FacetResult::new(
                "fr",
                vec![
                    BucketResult::new("a", 0),
                    BucketResult::new("b", 3),
                    BucketResult::new("c", 5),
                ],
            )],
        )];

        apply_cutoff(&mut years, Some(3));

        let counts: Vec<u64> = years[0].facets[0].buckets.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![3, 5]);
    }

    #[test]
    fn test_apply_cutoff_none_is_noop() {
        let original = vec![YearResult::new(
            2023,
            vec![FacetResult::new("fr", vec![BucketResult::new("a", 0)])],
        )];
        let mut years = original.clone();
        apply_cutoff(&mut years, None);
        assert_eq!(years, original);
    }

    #[test]
    fn test_limit_buckets() {
        let mut years = vec![YearResult::new(
            2023,
            vec![FacetResult::new(
                "fr",
                vec![
                    BucketResult::new("a", 1),
                    BucketResult::new("b", 9),
                    BucketResult::new("c", 5),
                ],
            )],
        )];

        limit_buckets(&mut years, Some(2));

        let ids: Vec<String> = years[0].facets[0]
            .buckets
            .iter()
            .map(|b| b.id.to_string())
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    fn counts_tree(counts: Vec<u64>) -> Vec<YearResult> {
        let buckets = counts
            .into_iter()
            .enumerate()
            .map(|(i, c)| BucketResult::new(format!("b{i}"), c))
            .collect();
        vec![YearResult::new(2023, vec![FacetResult::new("f", buckets)])]
    }

    proptest! {
        #[test]
        fn cutoff_is_idempotent(
            counts in prop::collection::vec(0u64..50, 0..30),
            threshold in 0u64..50,
        ) {
            let mut once = counts_tree(counts.clone());
            apply_cutoff(&mut once, Some(threshold));
            let mut twice = once.clone();
            apply_cutoff(&mut twice, Some(threshold));

            prop_assert_eq!(&once, &twice);
            prop_assert!(once[0].facets[0].buckets.iter().all(|b| b.count >= threshold));
            let kept = counts.iter().filter(|c| **c >= threshold).count();
            prop_assert_eq!(once[0].facets[0].buckets.len(), kept);
        }
    }
}
