//! # Label Index
//!
//! Sharded in-memory inverted index mapping label (name, value) pairs to the
//! fingerprints of the series that carry them.
//!
//! ## Features
//!
//! - **Lock striping**: every shard has its own reader-writer lock; writes
//!   touch exactly one shard chosen by a stable label-set hash
//! - **Matcher lookup**: `=`, `!=`, `=~`, `!~` with AND across matchers and a
//!   literal-alternation fast path for `=~"a|b|c"`
//! - **Query sharding**: `K_of_N` annotations select a stripe of shards so a
//!   query can be split across workers
//! - **Label enumeration**: sorted, deduplicated label names and values
//!
//! ## Modules
//!
//! - [`index`]: Inverted index, shards, and sorted-sequence utilities
//! - [`matcher`]: Label matchers and the selector parser
//! - [`model`]: Fingerprints and label pairs
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust
//! use label_index::{Fingerprint, InvertedIndex, LabelPair, Matcher, ShardAnnotation};
//!
//! let index = InvertedIndex::with_shards(16);
//!
//! index.add(
//!     &[
//!         LabelPair::new("__name__", "http_requests"),
//!         LabelPair::new("method", "GET"),
//!     ],
//!     Fingerprint(1),
//! );
//!
//! let found = index.lookup(&[Matcher::equal("method", "GET")], None).unwrap();
//! assert_eq!(found, vec![Fingerprint(1)]);
//!
//! // one quarter of the shards
//! let names = index.label_names(Some(ShardAnnotation::new(0, 4))).unwrap();
//! assert!(names.len() <= 2);
//! ```

pub mod config;
pub mod index;
pub mod matcher;
pub mod model;

pub use index::{
    IndexError, IndexResult, IndexStats, InvertedIndex, LabelIndex, ShardAnnotation,
    DEFAULT_INDEX_SHARDS,
};

pub use matcher::{parse_selector, MatchType, Matcher, MatcherError};

pub use model::{Fingerprint, InternedLabels, LabelPair, SeriesRecord, METRIC_NAME};

pub use config::{Config, ConfigError, IndexConfig, LoggingConfig};
