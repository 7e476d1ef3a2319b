//! Entity enrichment of facets and buckets.
//!
//! Lookups are independent of each other and I/O bound, so they all run
//! concurrently on a `JoinSet`, bounded by a semaphore. A lookup that finds
//! nothing simply leaves `entity` unset.

use crate::core::{BucketId, Entity, YearResult};
use crate::errors::{Result, StatsError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::debug;

/// Default number of lookups allowed in flight at once.
pub const DEFAULT_MAX_CONCURRENCY: usize = 8;

/// Resolves an identifier to a descriptive record.
///
/// Retries and caching, if any, belong to the implementation.
#[async_trait]
pub trait EntityLookup: Send + Sync {
    async fn get_entity(&self, id: &BucketId) -> Option<Entity>;
}

/// In-memory lookup keyed by entity id.
#[derive(Debug, Clone, Default)]
pub struct StaticEntityLookup {
    entities: HashMap<String, Entity>,
}

impl StaticEntityLookup {
    pub fn new(entities: impl IntoIterator<Item = Entity>) -> Self {
        Self {
            entities: entities.into_iter().map(|e| (e.id.clone(), e)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[async_trait]
impl EntityLookup for StaticEntityLookup {
    async fn get_entity(&self, id: &BucketId) -> Option<Entity> {
        self.entities.get(&id.to_string()).cloned()
    }
}

#[derive(Debug, Clone, Copy)]
enum Target {
    Facet {
        year: usize,
        facet: usize,
    },
    Bucket {
        year: usize,
        facet: usize,
        bucket: usize,
    },
}

/// Attach entities to every facet and bucket that resolves (in place).
///
/// Returns the number of entities attached. Fails only when a lookup task
/// itself fails (panics or is cancelled).
pub async fn add_entities(
    years: &mut [YearResult],
    lookup: Arc<dyn EntityLookup>,
    max_concurrency: usize,
) -> Result<usize> {
    let semaphore = Arc::new(Semaphore::new(max_concurrency.max(1)));
    let mut join_set: JoinSet<(Target, Option<Entity>)> = JoinSet::new();

    for (y, year) in years.iter().enumerate() {
        for (f, facet) in year.facets.iter().enumerate() {
            let target = Target::Facet { year: y, facet: f };
            spawn_lookup(&mut join_set, &lookup, &semaphore, target, facet.id.clone());
            for (b, bucket) in facet.buckets.iter().enumerate() {
                let target = Target::Bucket {
                    year: y,
                    facet: f,
                    bucket: b,
                };
                spawn_lookup(&mut join_set, &lookup, &semaphore, target, bucket.id.clone());
            }
        }
    }
    debug!(lookups = join_set.len(), max_concurrency, "Resolving entities");

    let mut attached = 0;
    while let Some(joined) = join_set.join_next().await {
        let (target, entity) = joined
            .map_err(|e| StatsError::enrichment(format!("Entity lookup task failed: {}", e)))?;
        if let Some(entity) = entity {
            attach(years, target, entity);
            attached += 1;
        }
    }

    debug!(attached, "Entities attached");
    Ok(attached)
}

fn spawn_lookup(
    join_set: &mut JoinSet<(Target, Option<Entity>)>,
    lookup: &Arc<dyn EntityLookup>,
    semaphore: &Arc<Semaphore>,
    target: Target,
    id: BucketId,
) {
    let lookup = Arc::clone(lookup);
    let semaphore = Arc::clone(semaphore);
    join_set.spawn(async move {
        // The semaphore is never closed, so acquiring cannot fail.
        let _permit = semaphore.acquire_owned().await.ok();
        (target, lookup.get_entity(&id).await)
    });
}

fn attach(years: &mut [YearResult], target: Target, entity: Entity) {
    match target {
        Target::Facet { year, facet } => {
            years[year].facets[facet].entity = Some(entity);
        }
        Target::Bucket {
            year,
            facet,
            bucket,
        } => {
            years[year].facets[facet].buckets[bucket].entity = Some(entity);
        }
    }
}
