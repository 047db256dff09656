//! Backend state storage abstraction.
//!
//! The sandbox layers a per-call `StateOverlay` (write buffer) over a
//! `StateStore` (committed state): reads check the overlay first, then
//! fall through to the store. A successful call's overlay is handed to
//! [`StateStore::apply`]; a failed call's overlay is dropped.

use crate::error::HostError;

/// Abstraction over committed state storage.
///
/// Shared between calls and threads. Implementations must be
/// deterministic: the same key always returns the same value until a
/// batch that touches it is applied.
pub trait StateStore: Send + Sync {
    /// Get the value for a key. `Ok(None)` if the key does not exist.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, HostError>;

    /// Check if a key exists.
    fn contains(&self, key: &[u8]) -> Result<bool, HostError> {
        Ok(self.get(key)?.is_some())
    }

    /// Persist a batch of writes. Either every write lands or none does.
    fn apply(&self, writes: Vec<(Vec<u8>, Vec<u8>)>) -> Result<(), HostError>;
}
