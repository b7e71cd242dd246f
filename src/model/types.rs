//! Core data types for the label index
//!
//! - `Fingerprint`: opaque, ordered identifier of one series' label set
//! - `LabelPair`: a caller-supplied (name, value) pair
//! - `InternedLabel` / `InternedLabels`: index-owned copies returned by `add`
//! - `SeriesRecord`: one line of a series file (fingerprint plus labels)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Label carrying the metric name; emitted first when routing a label set.
pub const METRIC_NAME: &str = "__name__";

/// Identifier of a series' label set
///
/// Assigned by the caller and never changed by the index. Totally ordered so
/// posting lists can be kept sorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(pub u64);

impl Fingerprint {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl From<u64> for Fingerprint {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// A (name, value) pair describing one dimension of a series
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LabelPair {
    pub name: String,
    pub value: String,
}

impl LabelPair {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A label pair whose strings are owned by an index shard
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InternedLabel {
    pub name: Arc<str>,
    pub value: Arc<str>,
}

/// Name-sorted interned labels returned from `add`
///
/// The container belongs to the caller and may be retained indefinitely; the
/// strings it points at are shared with the index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InternedLabels(Vec<InternedLabel>);

impl InternedLabels {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    pub(crate) fn push(&mut self, label: InternedLabel) {
        self.0.push(label);
    }

    pub(crate) fn sort_by_name(&mut self) {
        self.0.sort_by(|a, b| a.name.cmp(&b.name));
    }

    /// Value of the label with the given name, if present
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|l| &*l.name == name)
            .map(|l| &*l.value)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, InternedLabel> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Copy back out into owned caller-side pairs
    pub fn to_pairs(&self) -> Vec<LabelPair> {
        self.0
            .iter()
            .map(|l| LabelPair::new(&*l.name, &*l.value))
            .collect()
    }
}

impl<'a> IntoIterator for &'a InternedLabels {
    type Item = &'a InternedLabel;
    type IntoIter = std::slice::Iter<'a, InternedLabel>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for InternedLabels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, l) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={:?}", l.name, &*l.value)?;
        }
        write!(f, "}}")
    }
}

/// One series as stored in a JSON-lines series file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeriesRecord {
    pub fingerprint: Fingerprint,
    pub labels: Vec<LabelPair>,
}
