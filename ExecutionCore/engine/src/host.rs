//! Host interface trait: abstraction over host API calls.
//!
//! The `HostInterface` trait decouples the contract from the execution
//! environment:
//!
//! - In wasm: implemented by calling the imported `securemsg_host` functions
//! - In tests: implemented via `MockHost` (in-memory store)

use std::collections::BTreeMap;
use securemsg_primitives::{
    ErrorCode, ExecError, ExecResult, LogLine, StateOverlay, MAX_KEY_LEN, MAX_VALUE_LEN,
};

/// Abstraction over the host environment.
///
/// Storage calls are synchronous and observe read-after-write within one
/// call: a `state_get` after `state_set` of the same key returns the new value.
pub trait HostInterface {
    /// Read a raw value. `Ok(None)` if the key does not exist.
    fn state_get(&self, key: &[u8]) -> ExecResult<Option<Vec<u8>>>;

    /// Write a raw value, replacing any previous value under `key`.
    ///
    /// Either the whole value is buffered or nothing is.
    fn state_set(&mut self, key: &[u8], value: &[u8]) -> ExecResult<()>;

    /// Write a debug log line.
    ///
    /// Not contractual: callers must never branch on the result.
    fn log(&mut self, level: u32, message: &str) -> ExecResult<()>;

    /// Hand the call's output to the host. The last call wins.
    fn value_return(&mut self, value: &[u8]) -> ExecResult<()>;
}

// ── MockHost: in-memory host for testing ──

/// In-memory host implementation for deterministic testing.
///
/// Uses a `BTreeMap` as committed state and a `StateOverlay` for buffered
/// writes. Read and write failures can be injected to exercise the error
/// paths of the entry points.
#[derive(Debug, Default)]
pub struct MockHost {
    committed: BTreeMap<Vec<u8>, Vec<u8>>,
    overlay: StateOverlay,
    logs: Vec<LogLine>,
    return_value: Option<Vec<u8>>,
    fail_writes: Option<ErrorCode>,
    fail_reads: Option<ErrorCode>,
}

impl MockHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a host whose committed state is `committed`.
    pub fn with_state(committed: BTreeMap<Vec<u8>, Vec<u8>>) -> Self {
        Self {
            committed,
            ..Self::default()
        }
    }

    /// Make every subsequent `state_set` fail with `code`.
    pub fn fail_writes_with(&mut self, code: ErrorCode) {
        self.fail_writes = Some(code);
    }

    /// Make every subsequent `state_get` fail with `code`.
    pub fn fail_reads_with(&mut self, code: ErrorCode) {
        self.fail_reads = Some(code);
    }

    /// Insert committed state directly.
    pub fn set_committed(&mut self, key: Vec<u8>, value: Vec<u8>) {
        self.committed.insert(key, value);
    }

    /// Fold buffered writes into committed state.
    pub fn commit(&mut self) {
        let writes = std::mem::take(&mut self.overlay).drain();
        self.committed.extend(writes);
    }

    /// Drop buffered writes, as the host does after a failed call.
    pub fn rollback(&mut self) {
        self.overlay.clear();
    }

    pub fn committed_state(&self) -> &BTreeMap<Vec<u8>, Vec<u8>> {
        &self.committed
    }

    pub fn overlay(&self) -> &StateOverlay {
        &self.overlay
    }

    pub fn logs(&self) -> &[LogLine] {
        &self.logs
    }

    /// Take the last value handed to `value_return`.
    pub fn take_return_value(&mut self) -> Option<Vec<u8>> {
        self.return_value.take()
    }

    /// Take and clear captured logs.
    pub fn take_logs(&mut self) -> Vec<LogLine> {
        std::mem::take(&mut self.logs)
    }
}

impl HostInterface for MockHost {
    fn state_get(&self, key: &[u8]) -> ExecResult<Option<Vec<u8>>> {
        if let Some(code) = self.fail_reads {
            return Err(ExecError::HostError(code));
        }
        if key.len() > MAX_KEY_LEN {
            return Err(ExecError::HostError(ErrorCode::KeyTooLarge));
        }
        match self.overlay.get(key) {
            Some(value) => Ok(Some(value.to_vec())),
            None => Ok(self.committed.get(key).cloned()),
        }
    }

    fn state_set(&mut self, key: &[u8], value: &[u8]) -> ExecResult<()> {
        if let Some(code) = self.fail_writes {
            return Err(ExecError::HostError(code));
        }
        if key.len() > MAX_KEY_LEN {
            return Err(ExecError::HostError(ErrorCode::KeyTooLarge));
        }
        if value.len() > MAX_VALUE_LEN {
            return Err(ExecError::HostError(ErrorCode::ValueTooLarge));
        }
        self.overlay.set(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn log(&mut self, level: u32, message: &str) -> ExecResult<()> {
        self.logs.push(LogLine {
            level,
            message: String::from(message),
        });
        Ok(())
    }

    fn value_return(&mut self, value: &[u8]) -> ExecResult<()> {
        self.return_value = Some(value.to_vec());
        Ok(())
    }
}
