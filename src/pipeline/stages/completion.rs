//! Completion counts for years and facets.
//!
//! Every percentage stage reads the denominators set here, so this runs
//! before any of them.

use crate::core::metrics::ratio_to_percentage;
use crate::core::{CompletionStats, YearResult};
use std::collections::HashMap;

/// Set `completion` on every year and facet (pure, in place).
///
/// # Arguments
///
/// * `years` - Result tree to annotate
/// * `total_respondents_by_year` - Survey-wide respondents per year
/// * `question_respondents_by_year` - Respondents to this question per year
///
/// Years missing from either map use a count of `0`. The facet count is the
/// sum of its bucket counts, which ignores respondents who skipped the
/// question entirely; `percentage_question` for facets is therefore an
/// approximation.
pub fn add_completion_counts(
    years: &mut [YearResult],
    total_respondents_by_year: &HashMap<i32, u64>,
    question_respondents_by_year: &HashMap<i32, u64>,
) {
    for year in years.iter_mut() {
        let total = total_respondents_by_year.get(&year.year).copied().unwrap_or(0);
        let question = question_respondents_by_year
            .get(&year.year)
            .copied()
            .unwrap_or(0);

        year.completion = CompletionStats {
            total,
            count: question,
            percentage_question: None,
            percentage_survey: ratio_to_percentage(question, total),
        };

        for facet in year.facets.iter_mut() {
            let facet_total = facet.total_count();
            facet.completion = CompletionStats {
                total,
                count: facet_total,
                percentage_question: Some(ratio_to_percentage(facet_total, question)),
                percentage_survey: ratio_to_percentage(facet_total, total),
            };
        }
    }
}
