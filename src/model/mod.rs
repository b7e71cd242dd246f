//! Label Index Data Model
//!
//! Types shared between the index and its callers:
//!
//! - **types**: `Fingerprint`, `LabelPair`, interned label output
//!
//! The index never retains caller memory. Pairs passed to `add` are copied
//! into shard-owned storage and handed back as [`InternedLabels`].

pub mod types;

pub use types::{Fingerprint, InternedLabel, InternedLabels, LabelPair, SeriesRecord, METRIC_NAME};
