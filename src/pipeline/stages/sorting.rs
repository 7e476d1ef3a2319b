//! Ordering of buckets within facets and of facets within years.
//!
//! Two modes:
//! - explicit values: order follows the position of each identifier in a
//!   caller-supplied list (compared stringified); identifiers missing from
//!   the list, such as free-text answers, lead;
//! - field: order by a named field and direction. Equal field values always
//!   break ties by ascending identifier, whatever the direction.

use crate::core::{BucketId, BucketResult, FacetResult, YearResult};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::debug;

/// Field to sort on. `Options` selects explicit-values mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Options,
    Id,
    #[default]
    Count,
    PercentageQuestion,
    PercentageFacet,
    PercentageSurvey,
    CountAllFacets,
    PercentageAllFacets,
    Mean,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[serde(alias = "ascending")]
    Asc,
    #[default]
    #[serde(alias = "descending")]
    Desc,
}

/// How to order a list of buckets or facets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SortSpec {
    #[serde(default)]
    pub sort: SortField,
    #[serde(default)]
    pub order: SortOrder,
    /// Canonical identifier order for explicit-values mode
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<BucketId>,
}

impl SortSpec {
    pub fn by_field(sort: SortField, order: SortOrder) -> Self {
        Self {
            sort,
            order,
            options: Vec::new(),
        }
    }

    pub fn by_options(options: Vec<BucketId>) -> Self {
        Self {
            sort: SortField::Options,
            order: SortOrder::Asc,
            options,
        }
    }
}

/// Anything that can be ordered by the sorter.
pub trait Sortable {
    fn sort_id(&self) -> &BucketId;

    /// Numeric value for `field`, `None` when the item has no such field.
    fn sort_value(&self, field: SortField) -> Option<f64>;
}

impl Sortable for BucketResult {
    fn sort_id(&self) -> &BucketId {
        &self.id
    }

    fn sort_value(&self, field: SortField) -> Option<f64> {
        match field {
            SortField::Count => Some(self.count as f64),
            SortField::PercentageQuestion => Some(self.percentage_question),
            SortField::PercentageFacet => Some(self.percentage_facet),
            SortField::PercentageSurvey => Some(self.percentage_survey),
            SortField::CountAllFacets => Some(self.count_all_facets as f64),
            SortField::PercentageAllFacets => Some(self.percentage_all_facets),
            SortField::Options | SortField::Id | SortField::Mean => None,
        }
    }
}

impl Sortable for FacetResult {
    fn sort_id(&self) -> &BucketId {
        &self.id
    }

    fn sort_value(&self, field: SortField) -> Option<f64> {
        match field {
            SortField::Count => Some(self.completion.count as f64),
            SortField::PercentageQuestion => self.completion.percentage_question,
            SortField::PercentageSurvey => Some(self.completion.percentage_survey),
            SortField::Mean => self.mean,
            _ => None,
        }
    }
}

/// Order buckets inside every facet (pure, in place).
///
/// In explicit-values mode with an empty list the buckets keep their order.
pub fn sort_buckets(years: &mut [YearResult], spec: &SortSpec, parallel: bool) {
    debug!(sort = ?spec.sort, order = ?spec.order, options = spec.options.len(), "Sorting buckets");
    let sort_year = |year: &mut YearResult| {
        for facet in year.facets.iter_mut() {
            if spec.sort == SortField::Options {
                sort_by_options(&mut facet.buckets, &spec.options);
            } else {
                sort_by_field(&mut facet.buckets, spec.sort, spec.order);
            }
        }
    };
    if parallel {
        years.par_iter_mut().for_each(sort_year);
    } else {
        years.iter_mut().for_each(sort_year);
    }
}

/// Order facets inside every year (pure, in place).
///
/// A non-empty `options` list always selects explicit-values mode.
pub fn sort_facets(years: &mut [YearResult], spec: &SortSpec) {
    debug!(sort = ?spec.sort, order = ?spec.order, options = spec.options.len(), "Sorting facets");
    for year in years.iter_mut() {
        if spec.options.is_empty() {
            sort_by_field(&mut year.facets, spec.sort, spec.order);
        } else {
            sort_by_options(&mut year.facets, &spec.options);
        }
    }
}

/// Stable sort by position in `options`; unlisted items go first in their
/// current relative order.
pub fn sort_by_options<T: Sortable>(items: &mut [T], options: &[BucketId]) {
    if options.is_empty() {
        return;
    }
    let positions: HashMap<String, usize> = options
        .iter()
        .enumerate()
        .rev()
        .map(|(index, id)| (id.to_string(), index))
        .collect();
    // `None` orders before any position.
    items.sort_by_cached_key(|item| positions.get(&item.sort_id().to_string()).copied());
}

/// Sort by `field` in `order`, ties broken by ascending identifier.
pub fn sort_by_field<T: Sortable>(items: &mut [T], field: SortField, order: SortOrder) {
    items.sort_by(|a, b| {
        let primary = if field == SortField::Id {
            a.sort_id().natural_cmp(b.sort_id())
        } else {
            compare_values(a.sort_value(field), b.sort_value(field))
        };
        let primary = match order {
            SortOrder::Asc => primary,
            SortOrder::Desc => primary.reverse(),
        };
        primary.then_with(|| a.sort_id().natural_cmp(b.sort_id()))
    });
}

// Missing values sort after present ones in ascending order.
fn compare_values(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
