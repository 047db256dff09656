//! In-memory state store.
//!
//! `MemStore` implements `StateStore` over a `BTreeMap` behind a `RwLock`,
//! so one store can be shared by `Arc` between sandbox calls.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::HostError;
use crate::state_store::StateStore;

/// In-memory state store backed by `BTreeMap` for deterministic ordering.
#[derive(Debug, Default)]
pub struct MemStore {
    data: RwLock<BTreeMap<Vec<u8>, Vec<u8>>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with data.
    pub fn with_data(data: BTreeMap<Vec<u8>, Vec<u8>>) -> Self {
        Self {
            data: RwLock::new(data),
        }
    }

    /// Insert a key-value pair directly, bypassing any call.
    pub fn insert(&self, key: Vec<u8>, value: Vec<u8>) -> Result<(), HostError> {
        self.write()?.insert(key, value);
        Ok(())
    }

    pub fn len(&self) -> Result<usize, HostError> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, HostError> {
        Ok(self.read()?.is_empty())
    }

    /// Copy of the current contents.
    pub fn snapshot(&self) -> Result<BTreeMap<Vec<u8>, Vec<u8>>, HostError> {
        Ok(self.read()?.clone())
    }

    /// BLAKE3 digest of the contents.
    ///
    /// Entries are hashed in key order as
    /// `[key_len: u32 LE][key][value_len: u32 LE][value]`, so two stores
    /// with the same contents always have the same digest.
    pub fn digest(&self) -> Result<[u8; 32], HostError> {
        let data = self.read()?;
        let mut hasher = blake3::Hasher::new();
        for (key, value) in data.iter() {
            hasher.update(&(key.len() as u32).to_le_bytes());
            hasher.update(key);
            hasher.update(&(value.len() as u32).to_le_bytes());
            hasher.update(value);
        }
        Ok(*hasher.finalize().as_bytes())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, BTreeMap<Vec<u8>, Vec<u8>>>, HostError> {
        self.data
            .read()
            .map_err(|_| HostError::Internal("state store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, BTreeMap<Vec<u8>, Vec<u8>>>, HostError> {
        self.data
            .write()
            .map_err(|_| HostError::Internal("state store lock poisoned".into()))
    }
}

impl StateStore for MemStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, HostError> {
        Ok(self.read()?.get(key).cloned())
    }

    fn contains(&self, key: &[u8]) -> Result<bool, HostError> {
        Ok(self.read()?.contains_key(key))
    }

    fn apply(&self, writes: Vec<(Vec<u8>, Vec<u8>)>) -> Result<(), HostError> {
        // Single write guard: readers never observe a partial batch.
        let mut data = self.write()?;
        data.extend(writes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_store() {
        let store = MemStore::new();
        assert!(store.is_empty().unwrap());
        assert_eq!(store.get(b"missing").unwrap(), None);
        assert!(!store.contains(b"missing").unwrap());
    }

    #[test]
    fn test_insert_and_overwrite() {
        let store = MemStore::new();
        store.insert(b"k".to_vec(), b"v1".to_vec()).unwrap();
        store.insert(b"k".to_vec(), b"v2".to_vec()).unwrap();

        assert_eq!(store.get(b"k").unwrap(), Some(b"v2".to_vec()));
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_apply_batch() {
        let store = MemStore::new();
        store.insert(b"a".to_vec(), b"old".to_vec()).unwrap();
        store
            .apply(vec![
                (b"a".to_vec(), b"new".to_vec()),
                (b"b".to_vec(), b"2".to_vec()),
            ])
            .unwrap();

        let snapshot = store.snapshot().unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[&b"a".to_vec()], b"new".to_vec());
    }

    #[test]
    fn test_empty_value_is_present() {
        let store = MemStore::new();
        store.insert(b"k".to_vec(), Vec::new()).unwrap();
        assert_eq!(store.get(b"k").unwrap(), Some(Vec::new()));
        assert!(store.contains(b"k").unwrap());
    }

    #[test]
    fn test_digest_depends_only_on_contents() {
        let a = MemStore::new();
        a.insert(b"x".to_vec(), b"1".to_vec()).unwrap();
        a.insert(b"y".to_vec(), b"2".to_vec()).unwrap();

        let b = MemStore::new();
        b.apply(vec![
            (b"y".to_vec(), b"2".to_vec()),
            (b"x".to_vec(), b"1".to_vec()),
        ])
        .unwrap();

        assert_eq!(a.digest().unwrap(), b.digest().unwrap());

        b.insert(b"x".to_vec(), b"changed".to_vec()).unwrap();
        assert_ne!(a.digest().unwrap(), b.digest().unwrap());
    }

    #[test]
    fn test_poisoned_lock_is_reported() {
        let store = std::sync::Arc::new(MemStore::new());
        let poisoner = store.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.data.write().unwrap();
            panic!("poison the lock");
        })
        .join();

        assert!(store.len().is_err());
        assert!(store.is_empty().is_err());
        assert!(store.get(b"k").is_err());
    }

    #[test]
    fn test_digest_separates_key_and_value() {
        let a = MemStore::new();
        a.insert(b"ab".to_vec(), b"c".to_vec()).unwrap();
        let b = MemStore::new();
        b.insert(b"a".to_vec(), b"bc".to_vec()).unwrap();
        assert_ne!(a.digest().unwrap(), b.digest().unwrap());
    }
}
