//! Shard routing hash
//!
//! A label set is rendered to its canonical string
//! (`metric{a="1", b="2"}`, pairs in input order), digested with SHA-256 and
//! base64 encoded. The first four encoded bytes, read big-endian, select the
//! shard. The result depends only on the labels, so `add` and `delete` of the
//! same label set always land on the same shard across restarts.

use crate::model::{LabelPair, METRIC_NAME};
use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine;
use parking_lot::Mutex;
use sha2::{Digest, Sha256};
use std::ops::{Deref, DerefMut};

/// Initial capacity of a fresh scratch buffer
const SCRATCH_CAPACITY: usize = 1000;

/// Pool of reusable string buffers for canonicalizing label sets
#[derive(Debug)]
pub struct ScratchPool {
    buffers: Mutex<Vec<String>>,
    max_idle: usize,
}

impl ScratchPool {
    /// Create a pool keeping at most `max_idle` buffers between calls
    pub fn new(max_idle: usize) -> Self {
        Self {
            buffers: Mutex::new(Vec::with_capacity(max_idle)),
            max_idle,
        }
    }

    /// Take a cleared buffer; it goes back to the pool when dropped
    pub fn checkout(&self) -> ScratchBuffer<'_> {
        let buf = self
            .buffers
            .lock()
            .pop()
            .unwrap_or_else(|| String::with_capacity(SCRATCH_CAPACITY));
        ScratchBuffer { pool: self, buf }
    }

    /// Number of buffers currently idle in the pool
    pub fn idle(&self) -> usize {
        self.buffers.lock().len()
    }

    /// Shard-selection hash of a label set
    pub fn series_hash(&self, labels: &[LabelPair]) -> u32 {
        let mut canonical = self.checkout();
        write_labels_string(&mut canonical, labels);
        let digest = Sha256::digest(canonical.as_bytes());

        let mut encoded = self.checkout();
        STANDARD_NO_PAD.encode_string(digest, &mut encoded);

        encoded
            .bytes()
            .take(4)
            .fold(0u32, |acc, b| (acc << 8) | u32::from(b))
    }
}

/// A buffer checked out of a [`ScratchPool`]
pub struct ScratchBuffer<'a> {
    pool: &'a ScratchPool,
    buf: String,
}

impl Deref for ScratchBuffer<'_> {
    type Target = String;

    fn deref(&self) -> &String {
        &self.buf
    }
}

impl DerefMut for ScratchBuffer<'_> {
    fn deref_mut(&mut self) -> &mut String {
        &mut self.buf
    }
}

impl Drop for ScratchBuffer<'_> {
    fn drop(&mut self) {
        let mut buf = std::mem::take(&mut self.buf);
        buf.clear();
        let mut idle = self.pool.buffers.lock();
        if idle.len() < self.pool.max_idle {
            idle.push(buf);
        }
    }
}

/// Render labels as `metric{name="value", ...}`
///
/// The metric name value comes first, unprefixed; the remaining pairs keep
/// their input order.
pub(crate) fn write_labels_string(buf: &mut String, labels: &[LabelPair]) {
    if let Some(metric) = labels.iter().find(|l| l.name == METRIC_NAME) {
        buf.push_str(&metric.value);
    }
    buf.push('{');
    let mut first = true;
    for label in labels.iter().filter(|l| l.name != METRIC_NAME) {
        if !first {
            buf.push_str(", ");
        }
        first = false;
        buf.push_str(&label.name);
        buf.push('=');
        buf.push('"');
        buf.extend(label.value.escape_debug());
        buf.push('"');
    }
    buf.push('}');
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(pairs: &[(&str, &str)]) -> Vec<LabelPair> {
        pairs.iter().map(|(n, v)| LabelPair::new(*n, *v)).collect()
    }

    #[test]
    fn test_labels_string() {
        let mut buf = String::new();
        write_labels_string(
            &mut buf,
            &labels(&[("method", "GET"), ("__name__", "http_requests"), ("path", "/a\"b")]),
        );
        assert_eq!(buf, r#"http_requests{method="GET", path="/a\"b"}"#);

        buf.clear();
        write_labels_string(&mut buf, &labels(&[("job", "api")]));
        assert_eq!(buf, r#"{job="api"}"#);
    }

    #[test]
    fn test_hash_is_stable() {
        let pool = ScratchPool::new(4);
        let ls = labels(&[("__name__", "up"), ("job", "api")]);

        let first = pool.series_hash(&ls);
        assert_eq!(pool.series_hash(&ls), first);
        assert_eq!(ScratchPool::new(0).series_hash(&ls), first);
    }

    #[test]
    fn test_hash_known_values() {
        let pool = ScratchPool::new(4);

        // sha256(`up{job="api"}`) encodes to "Da7M..."
        let up = labels(&[("__name__", "up"), ("job", "api")]);
        assert_eq!(pool.series_hash(&up), 0x4461_374D);
        assert_eq!(pool.series_hash(&up) % 32, 13);

        // sha256(`http_requests{method="GET", path="/a\"b"}`) encodes to "qclO..."
        let quoted = labels(&[("method", "GET"), ("__name__", "http_requests"), ("path", "/a\"b")]);
        assert_eq!(pool.series_hash(&quoted), 0x7163_6C4F);
        assert_eq!(pool.series_hash(&quoted) % 32, 15);
    }

    #[test]
    fn test_canonical_string_keeps_input_order() {
        let mut forward = String::new();
        let mut reversed = String::new();
        write_labels_string(&mut forward, &labels(&[("a", "1"), ("b", "2")]));
        write_labels_string(&mut reversed, &labels(&[("b", "2"), ("a", "1")]));

        assert_eq!(forward, r#"{a="1", b="2"}"#);
        assert_eq!(reversed, r#"{b="2", a="1"}"#);
    }

    #[test]
    fn test_buffers_are_returned_cleared() {
        let pool = ScratchPool::new(2);
        {
            let mut buf = pool.checkout();
            buf.push_str("leftover");
        }
        assert_eq!(pool.idle(), 1);
        assert!(pool.checkout().is_empty());

        let _a = pool.checkout();
        let _b = pool.checkout();
        let _c = pool.checkout();
        drop((_a, _b, _c));
        assert_eq!(pool.idle(), 2);
    }
}
