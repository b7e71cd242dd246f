//! Label Index Structures
//!
//! In-memory inverted index from label pairs to series fingerprints:
//!
//! - **InvertedIndex**: fixed array of shards; routes writes by label-set hash
//!   and fans reads out over all shards or one query-shard stripe
//! - **IndexShard**: lock-protected `name → value → [Fingerprint]` map
//! - **sorted**: intersect and k-way merge of sorted sequences
//! - **hash**: canonical label string, SHA-256 routing hash, scratch buffers
//!
//! # Architecture
//!
//! ```text
//! add(labels, fp) ──hash──> shard[h % N].add        (write lock, one shard)
//!
//! lookup(matchers, K_of_M)
//!        ↓
//! validate K_of_M against N ──> IncompatibleShardQuery
//!        ↓
//! shards {K, K+M, K+2M, ...}.lookup   (read lock, each shard on its own)
//!        ↓
//! concatenate per-shard fingerprints
//! ```

mod annotation;
mod error;
mod hash;
mod inverted;
mod shard;
mod sorted;

pub use annotation::{ParseShardError, ShardAnnotation};
pub use error::{IndexError, IndexResult};
pub use hash::{ScratchBuffer, ScratchPool};
pub use inverted::{InvertedIndex, LabelIndex};
pub use shard::{IndexShard, ShardStats, CACHE_LINE_SIZE};
pub use sorted::{intersect, merge_sorted};

pub use crate::config::DEFAULT_INDEX_SHARDS;

use serde::Serialize;

/// Statistics about index contents
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    /// Number of physical shards
    pub shards: u32,
    /// Distinct label names across all shards
    pub label_names: usize,
    /// Label (name, value) entries, summed per shard
    pub label_pairs: usize,
    /// Fingerprint entries across all posting lists
    pub postings: usize,
    /// Distinct series fingerprints
    pub series: usize,
}
