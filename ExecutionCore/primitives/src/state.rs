//! Write buffer for one call.
//!
//! Writes made by an entry point are buffered here and become visible to
//! later reads in the same call. The host folds the buffer into the state
//! store only when the call succeeds; a failed call discards it, so no
//! partial write is ever observable.

use std::collections::BTreeMap;

/// Buffered writes overlaying committed state.
///
/// `BTreeMap` keeps drain order sorted by key, so commits are deterministic.
#[derive(Debug, Clone, Default)]
pub struct StateOverlay {
    writes: BTreeMap<Vec<u8>, Vec<u8>>,
    /// Keys + values currently buffered, for `max_write_bytes`.
    total_write_bytes: u64,
}

impl StateOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer `key = value`, replacing an earlier write of the same key.
    pub fn set(&mut self, key: Vec<u8>, value: Vec<u8>) {
        let added = (key.len() + value.len()) as u64;
        if let Some(prev) = self.writes.get(&key) {
            let prev_bytes = (key.len() + prev.len()) as u64;
            self.total_write_bytes = self.total_write_bytes.saturating_sub(prev_bytes);
        }
        self.total_write_bytes = self.total_write_bytes.saturating_add(added);
        self.writes.insert(key, value);
    }

    /// The buffered value, or `None` when the caller must fall through to
    /// committed state.
    pub fn get(&self, key: &[u8]) -> Option<&[u8]> {
        self.writes.get(key).map(Vec::as_slice)
    }

    /// Bytes the buffer would hold after writing `key = value`.
    pub fn projected_bytes(&self, key: &[u8], value: &[u8]) -> u64 {
        let prev = self
            .writes
            .get(key)
            .map(|v| (key.len() + v.len()) as u64)
            .unwrap_or(0);
        self.total_write_bytes - prev + (key.len() + value.len()) as u64
    }

    /// Consume the buffer, yielding writes sorted by key.
    pub fn drain(self) -> BTreeMap<Vec<u8>, Vec<u8>> {
        self.writes
    }

    pub fn writes(&self) -> &BTreeMap<Vec<u8>, Vec<u8>> {
        &self.writes
    }

    /// Discard every buffered write.
    pub fn clear(&mut self) {
        self.writes.clear();
        self.total_write_bytes = 0;
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    pub fn total_write_bytes(&self) -> u64 {
        self.total_write_bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut overlay = StateOverlay::new();
        overlay.set(b"ns/a".to_vec(), b"hello".to_vec());
        assert_eq!(overlay.get(b"ns/a"), Some(&b"hello"[..]));
        assert_eq!(overlay.get(b"ns/b"), None);
    }

    #[test]
    fn test_overwrite_keeps_last_value() {
        let mut overlay = StateOverlay::new();
        overlay.set(b"k".to_vec(), b"v1".to_vec());
        overlay.set(b"k".to_vec(), b"v2".to_vec());
        assert_eq!(overlay.get(b"k"), Some(&b"v2"[..]));
        assert_eq!(overlay.len(), 1);
    }

    #[test]
    fn test_total_write_bytes() {
        let mut overlay = StateOverlay::new();
        // "key1" (4) + "value1" (6) = 10
        overlay.set(b"key1".to_vec(), b"value1".to_vec());
        assert_eq!(overlay.total_write_bytes(), 10);

        overlay.set(b"key2".to_vec(), b"val2".to_vec());
        assert_eq!(overlay.total_write_bytes(), 18);

        // Overwrite key1: 10 out, 5 in
        assert_eq!(overlay.projected_bytes(b"key1", b"v"), 13);
        overlay.set(b"key1".to_vec(), b"v".to_vec());
        assert_eq!(overlay.total_write_bytes(), 13);
    }

    #[test]
    fn test_drain_is_sorted() {
        let mut overlay = StateOverlay::new();
        overlay.set(b"c".to_vec(), b"3".to_vec());
        overlay.set(b"a".to_vec(), b"1".to_vec());
        overlay.set(b"b".to_vec(), b"2".to_vec());

        let keys: Vec<Vec<u8>> = overlay.drain().into_keys().collect();
        assert_eq!(keys, vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec()]);
    }

    #[test]
    fn test_clear() {
        let mut overlay = StateOverlay::new();
        overlay.set(b"k".to_vec(), b"v".to_vec());
        overlay.clear();
        assert!(overlay.is_empty());
        assert_eq!(overlay.total_write_bytes(), 0);
    }
}
