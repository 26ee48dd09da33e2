//! Associative reduction of classified records.
//!
//! [`Aggregate`] is a partial result: a map from key to summed statistics
//! plus the diagnostic counters of the records it has seen. Aggregates form
//! a monoid, so any partitioning of the input can be folded independently
//! and the partials combined in any order or tree shape with the same
//! result. [`aggregate_records`] uses exactly that with rayon's
//! `fold`/`reduce`.

use rayon::prelude::*;
use std::collections::HashMap;
use stillwater::{Monoid, Semigroup};
use tracing::debug_span;

use crate::config::ParallelConfig;
use crate::core::{AggregationKey, RawRecord, StatsVector};
use crate::extraction::{Classification, Extractor};
use crate::observability::Diagnostics;

/// Partial or final aggregate over some subset of records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregate {
    groups: HashMap<AggregationKey, StatsVector>,
    diagnostics: Diagnostics,
}

impl Aggregate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one (key, statistics) pair.
    pub fn insert(&mut self, key: AggregationKey, stats: StatsVector) {
        self.groups
            .entry(key)
            .and_modify(|total| *total = total.merge(&stats))
            .or_insert(stats);
    }

    /// Count a classification and, if it produced a key, add it.
    pub fn observe(mut self, classification: Classification) -> Self {
        self.diagnostics.observe(&classification);
        if let Classification::Extracted { key, stats, .. } = classification {
            self.insert(key, stats);
        }
        self
    }

    pub fn groups(&self) -> &HashMap<AggregationKey, StatsVector> {
        &self.groups
    }

    pub fn get(&self, key: &AggregationKey) -> Option<&StatsVector> {
        self.groups.get(key)
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn into_parts(self) -> (HashMap<AggregationKey, StatsVector>, Diagnostics) {
        (self.groups, self.diagnostics)
    }
}

impl Semigroup for Aggregate {
    fn combine(self, other: Self) -> Self {
        // Fold the smaller map into the larger one.
        let (mut large, small) = if self.groups.len() >= other.groups.len() {
            (self, other)
        } else {
            (other, self)
        };
        for (key, stats) in small.groups {
            large.insert(key, stats);
        }
        large.diagnostics = large.diagnostics.combine(small.diagnostics);
        large
    }
}

impl Monoid for Aggregate {
    fn empty() -> Self {
        Self::default()
    }
}

impl FromIterator<(AggregationKey, StatsVector)> for Aggregate {
    fn from_iter<I: IntoIterator<Item = (AggregationKey, StatsVector)>>(iter: I) -> Self {
        let mut aggregate = Aggregate::new();
        for (key, stats) in iter {
            aggregate.insert(key, stats);
        }
        aggregate
    }
}

/// Classify and reduce a batch of records.
///
/// With parallelism enabled each rayon task folds at least
/// `chunk_size` records into its own [`Aggregate`]; partials are then
/// combined pairwise. The sequential path folds on the calling thread.
/// Both produce the same groups and counters.
pub fn aggregate_records(
    extractor: &Extractor,
    records: &[RawRecord],
    parallel: &ParallelConfig,
) -> Aggregate {
    let _span = debug_span!("aggregate_records", records = records.len()).entered();

    if parallel.enabled {
        records
            .par_iter()
            .with_min_len(parallel.effective_chunk_size())
            .fold(Aggregate::empty, |acc, record| {
                acc.observe(extractor.classify(record))
            })
            .reduce(Aggregate::empty, Semigroup::combine)
    } else {
        records
            .iter()
            .fold(Aggregate::empty(), |acc, record| {
                acc.observe(extractor.classify(record))
            })
    }
}
