//! Query-shard annotation
//!
//! Describes which slice of a distributed query a call answers. Worker `k` of
//! `of` owns physical shards `{k, k+of, k+2*of, ...}`.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// `{shard}_of_{of}` slice of a larger query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShardAnnotation {
    /// Index of this slice, in `[0, of)`
    pub shard: u32,
    /// Total number of slices
    pub of: u32,
}

impl ShardAnnotation {
    pub fn new(shard: u32, of: u32) -> Self {
        Self { shard, of }
    }
}

impl fmt::Display for ShardAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_of_{}", self.shard, self.of)
    }
}

/// Failure to parse a `K_of_N` annotation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid shard annotation {0:?}: expected <shard>_of_<total>")]
pub struct ParseShardError(String);

impl FromStr for ShardAnnotation {
    type Err = ParseShardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseShardError(s.to_string());
        let (shard, of) = s.split_once("_of_").ok_or_else(err)?;
        let shard = shard.parse().map_err(|_| err())?;
        let of = of.parse().map_err(|_| err())?;
        Ok(Self { shard, of })
    }
}
