//! Inverted Index - Sharded label pair → fingerprint index
//!
//! Writes hash the label set to exactly one shard and lock only that shard.
//! Reads fan out to every shard, or to the stripe selected by a query-shard
//! annotation, and merge the per-shard answers.
//!
//! # Query sharding
//!
//! ```text
//! 8 physical shards, annotation K_of_4:
//!
//!   0_of_4 → shards 0, 4
//!   1_of_4 → shards 1, 5
//!   2_of_4 → shards 2, 6
//!   3_of_4 → shards 3, 7
//! ```
//!
//! Each series lives in one shard, so the per-shard lookup results can be
//! concatenated without deduplication.
//!
//! There is no cross-shard snapshot: a read observes each shard at the
//! moment that shard is locked.

use crate::config::{IndexConfig, DEFAULT_INDEX_SHARDS};
use crate::index::hash::ScratchPool;
use crate::index::shard::IndexShard;
use crate::index::sorted::merge_sorted;
use crate::index::{IndexError, IndexResult, IndexStats, ShardAnnotation};
use crate::matcher::Matcher;
use crate::model::{Fingerprint, InternedLabels, LabelPair};
use tracing::{debug, trace, warn};

/// Operations the ingestion and query layers need from a label index
pub trait LabelIndex: Send + Sync {
    /// Index `fp` under `labels`, returning index-owned copies of the labels
    fn add(&self, labels: &[LabelPair], fp: Fingerprint) -> InternedLabels;

    /// Fingerprints matching every matcher; all fingerprints when empty
    fn lookup(
        &self,
        matchers: &[Matcher],
        shard: Option<ShardAnnotation>,
    ) -> IndexResult<Vec<Fingerprint>>;

    /// Sorted, deduplicated label names
    fn label_names(&self, shard: Option<ShardAnnotation>) -> IndexResult<Vec<String>>;

    /// Sorted, deduplicated values of one label name
    fn label_values(&self, name: &str, shard: Option<ShardAnnotation>)
        -> IndexResult<Vec<String>>;

    /// Remove `fp` from `labels`; must receive the labels in the order they were added
    fn delete(&self, labels: &[LabelPair], fp: Fingerprint);
}

/// In-memory inverted index from label pairs to fingerprints
///
/// Sharded to reduce lock contention on writes.
#[derive(Debug)]
pub struct InvertedIndex {
    total_shards: u32,
    shards: Box<[IndexShard]>,
    scratch: ScratchPool,
}

impl Default for InvertedIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl InvertedIndex {
    /// Create an index with the default shard count
    pub fn new() -> Self {
        Self::with_shards(DEFAULT_INDEX_SHARDS)
    }

    /// Create an index with a fixed shard count
    pub fn with_shards(total_shards: u32) -> Self {
        Self::build(total_shards, IndexConfig::default().scratch_pool_size)
    }

    /// Create an index from configuration
    pub fn from_config(config: &IndexConfig) -> Self {
        Self::build(config.shards, config.scratch_pool_size)
    }

    fn build(total_shards: u32, scratch_pool_size: usize) -> Self {
        let total_shards = if total_shards == 0 {
            warn!("Index shard count of 0 requested, using 1");
            1
        } else {
            total_shards
        };

        let shards: Box<[IndexShard]> = (0..total_shards).map(IndexShard::new).collect();
        debug!(shards = total_shards, "Created inverted index");

        Self {
            total_shards,
            shards,
            scratch: ScratchPool::new(scratch_pool_size),
        }
    }

    /// Number of physical shards
    pub fn total_shards(&self) -> u32 {
        self.total_shards
    }

    /// Physical shard a label set routes to
    pub fn shard_for(&self, labels: &[LabelPair]) -> usize {
        (self.scratch.series_hash(labels) % self.total_shards) as usize
    }

    fn route(&self, labels: &[LabelPair]) -> &IndexShard {
        // shard_for is always below total_shards, which equals shards.len()
        &self.shards[self.shard_for(labels)]
    }

    /// Add a fingerprint under the specified labels
    ///
    /// The returned labels are sorted by name and reference only interned
    /// strings, so they stay valid after `labels` is dropped.
    pub fn add(&self, labels: &[LabelPair], fp: Fingerprint) -> InternedLabels {
        self.route(labels).add(labels, fp)
    }

    /// Delete a fingerprint from the given label pairs
    pub fn delete(&self, labels: &[LabelPair], fp: Fingerprint) {
        self.route(labels).delete(labels, fp)
    }

    fn validate_shard(&self, shard: Option<ShardAnnotation>) -> IndexResult<()> {
        let Some(annotation) = shard else {
            return Ok(());
        };

        if annotation.of == 0
            || annotation.of > self.total_shards
            || self.total_shards % annotation.of != 0
            || annotation.shard >= annotation.of
        {
            warn!(
                index_shards = self.total_shards,
                query_shard = %annotation,
                "Rejected incompatible shard query"
            );
            return Err(IndexError::IncompatibleShardQuery {
                index_shards: self.total_shards,
                query_shard: annotation,
            });
        }
        Ok(())
    }

    /// Shards owned by a query slice; must be called after `validate_shard`
    fn get_shards(&self, shard: Option<ShardAnnotation>) -> Vec<&IndexShard> {
        let Some(annotation) = shard else {
            return self.shards.iter().collect();
        };

        let requested = self.total_shards / annotation.of;
        (0..requested)
            .filter_map(|i| self.shards.get((annotation.shard + i * annotation.of) as usize))
            .collect()
    }

    /// Lookup all fingerprints for the provided matchers
    ///
    /// With no matchers every fingerprint in the selected shards is returned.
    pub fn lookup(
        &self,
        matchers: &[Matcher],
        shard: Option<ShardAnnotation>,
    ) -> IndexResult<Vec<Fingerprint>> {
        self.validate_shard(shard)?;
        let shards = self.get_shards(shard);

        let result: Vec<Fingerprint> = if matchers.is_empty() {
            shards.iter().flat_map(|s| s.all_fingerprints()).collect()
        } else {
            shards.iter().flat_map(|s| s.lookup(matchers)).collect()
        };

        trace!(
            matchers = matchers.len(),
            shards = shards.len(),
            found = result.len(),
            "Index lookup"
        );
        Ok(result)
    }

    /// All label names
    pub fn label_names(&self, shard: Option<ShardAnnotation>) -> IndexResult<Vec<String>> {
        self.validate_shard(shard)?;
        let results = self
            .get_shards(shard)
            .iter()
            .map(|s| s.label_names())
            .collect();

        Ok(merge_sorted(results))
    }

    /// Values for the given label name
    pub fn label_values(
        &self,
        name: &str,
        shard: Option<ShardAnnotation>,
    ) -> IndexResult<Vec<String>> {
        self.validate_shard(shard)?;
        let results = self
            .get_shards(shard)
            .iter()
            .map(|s| s.label_values(name))
            .collect();

        Ok(merge_sorted(results))
    }

    /// Entry counts across all shards
    pub fn stats(&self) -> IndexStats {
        let mut stats = IndexStats {
            shards: self.total_shards,
            ..IndexStats::default()
        };
        let mut names = Vec::with_capacity(self.shards.len());

        for shard in self.shards.iter() {
            let s = shard.stats();
            stats.label_pairs += s.label_pairs;
            stats.postings += s.postings;
            stats.series += s.series;
            names.push(shard.label_names());
        }
        stats.label_names = merge_sorted(names).len();

        stats
    }
}

impl LabelIndex for InvertedIndex {
    fn add(&self, labels: &[LabelPair], fp: Fingerprint) -> InternedLabels {
        InvertedIndex::add(self, labels, fp)
    }

    fn lookup(
        &self,
        matchers: &[Matcher],
        shard: Option<ShardAnnotation>,
    ) -> IndexResult<Vec<Fingerprint>> {
        InvertedIndex::lookup(self, matchers, shard)
    }

    fn label_names(&self, shard: Option<ShardAnnotation>) -> IndexResult<Vec<String>> {
        InvertedIndex::label_names(self, shard)
    }

    fn label_values(
        &self,
        name: &str,
        shard: Option<ShardAnnotation>,
    ) -> IndexResult<Vec<String>> {
        InvertedIndex::label_values(self, name, shard)
    }

    fn delete(&self, labels: &[LabelPair], fp: Fingerprint) {
        InvertedIndex::delete(self, labels, fp)
    }
}
