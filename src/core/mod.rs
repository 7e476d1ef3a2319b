//! The result tree shared by every pipeline stage: years → facets → buckets.
//!
//! The grouping backend produces this tree with only `id`/`count` populated
//! on buckets; every other field is derived by the pipeline.

pub mod bucket_id;
pub mod entity;
pub mod metrics;

pub use bucket_id::BucketId;
pub use entity::Entity;

use serde::{Deserialize, Serialize};

/// Results for one question, one entry per year present in the data.
pub type ResultsByYear = Vec<YearResult>;

/// Respondent counts relative to a survey-wide or question-wide denominator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionStats {
    /// Survey-wide respondent count for the year
    pub total: u64,
    /// Respondents who answered this question (year) or fall in this facet
    pub count: u64,
    /// `count` relative to the question's respondents; facets only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage_question: Option<f64>,
    /// `count` relative to `total`
    #[serde(default)]
    pub percentage_survey: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearResult {
    pub year: i32,
    #[serde(default)]
    pub facets: Vec<FacetResult>,
    #[serde(default)]
    pub completion: CompletionStats,
}

/// One value of the secondary dimension (e.g. one country).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetResult {
    pub id: BucketId,
    #[serde(default)]
    pub buckets: Vec<BucketResult>,
    #[serde(default)]
    pub completion: CompletionStats,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mean: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<Entity>,
}

/// Aggregated count for one answer option within a facet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketResult {
    pub id: BucketId,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub percentage_question: f64,
    #[serde(default)]
    pub percentage_facet: f64,
    #[serde(default)]
    pub percentage_survey: f64,
    #[serde(default)]
    pub count_all_facets: u64,
    #[serde(default)]
    pub percentage_all_facets: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<Entity>,
    #[serde(rename = "isFreeformData", default, skip_serializing_if = "is_false")]
    pub is_freeform_data: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl YearResult {
    pub fn new(year: i32, facets: Vec<FacetResult>) -> Self {
        Self {
            year,
            facets,
            completion: CompletionStats::default(),
        }
    }
}

impl FacetResult {
    pub fn new(id: impl Into<BucketId>, buckets: Vec<BucketResult>) -> Self {
        Self {
            id: id.into(),
            buckets,
            completion: CompletionStats::default(),
            mean: None,
            entity: None,
        }
    }

    /// Count for `id` in this facet, `0` when the bucket is absent.
    pub fn count_of(&self, id: &BucketId) -> u64 {
        self.buckets
            .iter()
            .find(|b| &b.id == id)
            .map_or(0, |b| b.count)
    }

    /// Sum of all bucket counts.
    pub fn total_count(&self) -> u64 {
        self.buckets.iter().map(|b| b.count).sum()
    }
}

impl BucketResult {
    /// A raw bucket as produced by the grouping backend.
    pub fn new(id: impl Into<BucketId>, count: u64) -> Self {
        Self {
            id: id.into(),
            count,
            percentage_question: 0.0,
            percentage_facet: 0.0,
            percentage_survey: 0.0,
            count_all_facets: 0,
            percentage_all_facets: 0.0,
            entity: None,
            is_freeform_data: false,
        }
    }

    /// A zero-filled bucket for an expected identifier absent from the data.
    pub fn zero(id: impl Into<BucketId>) -> Self {
        Self::new(id, 0)
    }
}
