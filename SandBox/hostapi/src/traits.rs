//! Host API trait: host-side function signatures.
//!
//! `HostApi` mirrors the guest's `HostInterface`, one method per function
//! imported under the `securemsg_host` module. The sandbox creates one
//! implementation per call. Pointer validation happens in the sandbox; this
//! trait works with Rust slices.

use crate::error::HostError;

/// Host-side implementation of the contract host API.
pub trait HostApi {
    // ── Call input ──

    /// The payload of the current call.
    fn input(&self) -> Result<&[u8], HostError>;

    // ── State access ──

    /// Read a value. Checks the call's write buffer first, then committed
    /// state. `Ok(None)` if the key exists in neither.
    fn state_get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, HostError>;

    /// Buffer a write for this call.
    ///
    /// Enforces `max_key_len`, `max_value_len` and `max_write_bytes`. A
    /// rejected write buffers nothing.
    fn state_set(&mut self, key: &[u8], value: &[u8]) -> Result<(), HostError>;

    // ── Logs ──

    /// Debug log. The host may drop lines past its limits.
    fn log(&mut self, level: u32, message: &str) -> Result<(), HostError>;

    // ── Output ──

    /// Record the call's return data, replacing any earlier value.
    fn value_return(&mut self, data: &[u8]) -> Result<(), HostError>;
}
