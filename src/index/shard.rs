//! Index Shard
//!
//! One lock-protected partition of the inverted index:
//!
//! ```text
//! label name → label value → sorted [Fingerprint]
//! ```
//!
//! Every posting list stays ascending and duplicate-free after each add and
//! delete. Value entries are pruned when their list empties, and name
//! entries when they have no values left.

use crate::index::sorted::intersect;
use crate::matcher::{find_set_matches, MatchType, Matcher};
use crate::model::{Fingerprint, InternedLabel, InternedLabels, LabelPair};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Cache line size for Intel and AMD CPUs
pub const CACHE_LINE_SIZE: usize = 64;

/// Interned value plus the fingerprints carrying it
#[derive(Debug)]
struct ValueEntry {
    value: Arc<str>,
    fps: Vec<Fingerprint>,
}

impl ValueEntry {
    fn new(value: Arc<str>) -> Self {
        Self {
            value,
            fps: Vec::new(),
        }
    }

    /// Insert at the sorted position; already-present fingerprints are kept once
    fn insert(&mut self, fp: Fingerprint) {
        let j = self.fps.partition_point(|&f| f < fp);
        if self.fps.get(j) != Some(&fp) {
            self.fps.insert(j, fp);
        }
    }

    fn remove(&mut self, fp: Fingerprint) -> bool {
        match self.fps.binary_search(&fp) {
            Ok(j) => {
                self.fps.remove(j);
                true
            }
            Err(_) => false,
        }
    }
}

/// Interned name plus its values
#[derive(Debug)]
struct NameEntry {
    name: Arc<str>,
    values: HashMap<Arc<str>, ValueEntry>,
}

impl NameEntry {
    fn new(name: Arc<str>) -> Self {
        Self {
            name,
            values: HashMap::new(),
        }
    }

    /// Sorted fingerprints under this name matching one matcher
    fn candidates(&self, matcher: &Matcher) -> Vec<Fingerprint> {
        match matcher.match_type() {
            MatchType::Equal => self
                .values
                .get(matcher.value())
                .map(|entry| entry.fps.clone())
                .unwrap_or_default(),
            MatchType::Regexp => {
                let set = matcher.pattern().map(find_set_matches).unwrap_or_default();
                if set.is_empty() {
                    return self.scan(matcher);
                }
                // alternatives are not visited in fingerprint order
                let mut fps: Vec<Fingerprint> = set
                    .iter()
                    .filter_map(|value| self.values.get(value.as_str()))
                    .flat_map(|entry| entry.fps.iter().copied())
                    .collect();
                fps.sort_unstable();
                fps.dedup();
                fps
            }
            MatchType::NotEqual | MatchType::NotRegexp => self.scan(matcher),
        }
    }

    /// Test every value against the matcher's predicate
    fn scan(&self, matcher: &Matcher) -> Vec<Fingerprint> {
        let mut fps: Vec<Fingerprint> = self
            .values
            .values()
            .filter(|entry| matcher.matches(&entry.value))
            .flat_map(|entry| entry.fps.iter().copied())
            .collect();
        fps.sort_unstable();
        fps.dedup();
        fps
    }
}

/// Entry counts for one shard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShardStats {
    pub label_names: usize,
    pub label_pairs: usize,
    pub postings: usize,
    pub series: usize,
}

/// A cache-line aligned, independently locked partition of the index
#[repr(align(64))]
#[derive(Debug)]
pub struct IndexShard {
    id: u32,
    idx: RwLock<HashMap<Arc<str>, NameEntry>>,
}

const _: () = assert!(std::mem::align_of::<IndexShard>() == CACHE_LINE_SIZE);

impl IndexShard {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            idx: RwLock::new(HashMap::new()),
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    /// Index `fp` under every pair, returning name-sorted interned copies
    ///
    /// Names and values are copied on first sight; the returned labels point
    /// only at shard-owned strings.
    pub fn add(&self, labels: &[LabelPair], fp: Fingerprint) -> InternedLabels {
        let mut idx = self.idx.write();
        let mut interned = InternedLabels::with_capacity(labels.len());

        for pair in labels {
            if !idx.contains_key(pair.name.as_str()) {
                let name: Arc<str> = Arc::from(pair.name.as_str());
                idx.insert(Arc::clone(&name), NameEntry::new(name));
            }
            let Some(entry) = idx.get_mut(pair.name.as_str()) else {
                continue;
            };

            if !entry.values.contains_key(pair.value.as_str()) {
                let value: Arc<str> = Arc::from(pair.value.as_str());
                entry
                    .values
                    .insert(Arc::clone(&value), ValueEntry::new(value));
            }
            let Some(value) = entry.values.get_mut(pair.value.as_str()) else {
                continue;
            };

            value.insert(fp);
            interned.push(InternedLabel {
                name: Arc::clone(&entry.name),
                value: Arc::clone(&value.value),
            });
        }

        interned.sort_by_name();
        interned
    }

    /// Remove `fp` from every pair's posting list; absent entries are skipped
    pub fn delete(&self, labels: &[LabelPair], fp: Fingerprint) {
        let mut idx = self.idx.write();

        for pair in labels {
            let Some(entry) = idx.get_mut(pair.name.as_str()) else {
                continue;
            };
            let Some(value) = entry.values.get_mut(pair.value.as_str()) else {
                continue;
            };
            if !value.remove(fp) {
                continue;
            }

            if value.fps.is_empty() {
                entry.values.remove(pair.value.as_str());
            }
            if entry.values.is_empty() {
                idx.remove(pair.name.as_str());
            }
        }
    }

    /// Sorted fingerprints matching all matchers
    pub fn lookup(&self, matchers: &[Matcher]) -> Vec<Fingerprint> {
        let idx = self.idx.read();

        // None is the universal set until the first matcher narrows it
        let mut result: Option<Vec<Fingerprint>> = None;
        for matcher in matchers {
            let Some(entry) = idx.get(matcher.name()) else {
                return Vec::new();
            };
            let narrowed = intersect(result.take(), entry.candidates(matcher));
            if narrowed.is_empty() {
                return Vec::new();
            }
            result = Some(narrowed);
        }

        result.unwrap_or_default()
    }

    /// Every fingerprint in the shard, once each
    pub fn all_fingerprints(&self) -> Vec<Fingerprint> {
        let idx = self.idx.read();
        distinct_fingerprints(&idx)
    }

    pub fn label_names(&self) -> Vec<String> {
        let idx = self.idx.read();

        let mut names: Vec<String> = idx.keys().map(|name| name.to_string()).collect();
        names.sort_unstable();
        names
    }

    pub fn label_values(&self, name: &str) -> Vec<String> {
        let idx = self.idx.read();

        let Some(entry) = idx.get(name) else {
            return Vec::new();
        };
        let mut values: Vec<String> = entry.values.keys().map(|v| v.to_string()).collect();
        values.sort_unstable();
        values
    }

    /// Counts taken under one read guard, so they describe a single state
    pub fn stats(&self) -> ShardStats {
        let idx = self.idx.read();

        let postings: usize = idx
            .values()
            .flat_map(|entry| entry.values.values())
            .map(|value| value.fps.len())
            .sum();
        let label_pairs: usize = idx.values().map(|entry| entry.values.len()).sum();

        ShardStats {
            label_names: idx.len(),
            label_pairs,
            postings,
            series: distinct_fingerprints(&idx).len(),
        }
    }
}

/// Sorted, duplicate-free union of every posting list in the map
fn distinct_fingerprints(idx: &HashMap<Arc<str>, NameEntry>) -> Vec<Fingerprint> {
    let mut fps: Vec<Fingerprint> = idx
        .values()
        .flat_map(|entry| entry.values.values())
        .flat_map(|value| value.fps.iter().copied())
        .collect();
    fps.sort_unstable();
    fps.dedup();
    fps
}
