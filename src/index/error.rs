//! Index error types
//!
//! The index has exactly one failure mode: a query-shard annotation that
//! cannot be mapped onto the physical shard count. Unknown names, unknown
//! values and deletes of absent fingerprints are empty results, not errors.

use crate::index::ShardAnnotation;
use thiserror::Error;

/// Errors returned by index reads
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    /// Requested query partitioning does not divide the index shards
    #[error("incompatible shard query: index_shards={index_shards} query_shard={query_shard}")]
    IncompatibleShardQuery {
        index_shards: u32,
        query_shard: ShardAnnotation,
    },
}

/// Result type alias for index reads
pub type IndexResult<T> = Result<T, IndexError>;
