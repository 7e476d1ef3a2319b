// Test utility module for survey-stats integration tests
#![allow(dead_code)]

use std::collections::HashMap;
use survey_stats::{BucketResult, ComputeRequest, FacetResult, ResultsByYear, YearResult};

/// Build a raw bucket list from `(id, count)` pairs.
pub fn buckets(pairs: &[(&str, u64)]) -> Vec<BucketResult> {
    pairs
        .iter()
        .map(|(id, count)| BucketResult::new(*id, *count))
        .collect()
}

pub fn facet(id: &str, pairs: &[(&str, u64)]) -> FacetResult {
    FacetResult::new(id, buckets(pairs))
}

pub fn year(year: i32, facets: Vec<FacetResult>) -> YearResult {
    YearResult::new(year, facets)
}

/// A request over `results` with the same respondent counts for every year.
pub fn request_with_counts(
    results: ResultsByYear,
    total_respondents: u64,
    question_respondents: u64,
) -> ComputeRequest {
    let years: Vec<i32> = results.iter().map(|y| y.year).collect();
    let totals: HashMap<i32, u64> = years.iter().map(|y| (*y, total_respondents)).collect();
    let questions: HashMap<i32, u64> = years.iter().map(|y| (*y, question_respondents)).collect();
    ComputeRequest::new(results).with_totals(totals, questions)
}

/// Bucket ids of one facet, stringified, in order.
pub fn bucket_ids(facet: &FacetResult) -> Vec<String> {
    facet.buckets.iter().map(|b| b.id.to_string()).collect()
}

pub fn facet_ids(year: &YearResult) -> Vec<String> {
    year.facets.iter().map(|f| f.id.to_string()).collect()
}

pub fn find_bucket<'a>(facet: &'a FacetResult, id: &str) -> &'a BucketResult {
    facet
        .buckets
        .iter()
        .find(|b| b.id.to_string() == id)
        .unwrap_or_else(|| panic!("bucket {} missing from facet {}", id, facet.id))
}
