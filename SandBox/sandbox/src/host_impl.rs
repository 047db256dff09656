//! Per-instance mutable state held in the Wasmtime `Store`.
//!
//! `HostState` combines the committed state store, the call's write
//! buffer, its input, return data and logs, plus the host allocator and
//! memory limits. One `HostState` lives as long as one guest instance;
//! [`HostState::begin_call`] resets the per-call parts between calls.

use std::sync::Arc;

use wasmtime::{StoreLimits, StoreLimitsBuilder};

use securemsg_hostapi::{ExecutionConfig, HostApi, HostError, StateStore};
use securemsg_primitives::{
    types::{LOG_DEBUG, LOG_INFO, LOG_TRACE, LOG_WARN},
    LogLine, StateOverlay,
};

use crate::memory::HostAllocator;

pub struct HostState {
    /// Committed state (read-only during a call).
    pub state_store: Arc<dyn StateStore>,
    /// Per-call resource limits.
    pub config: ExecutionConfig,
    /// Write buffer overlaying committed state.
    pub overlay: StateOverlay,
    /// Payload of the current call.
    pub input: Vec<u8>,
    /// Last value passed to `value_return`.
    pub return_data: Vec<u8>,
    /// Log lines kept for the current call.
    pub logs: Vec<LogLine>,
    /// Host-side bump allocator for guest memory.
    pub host_alloc: HostAllocator,
    /// Memory growth limits enforced by wasmtime.
    pub limits: StoreLimits,
    /// Forward guest log lines to `tracing`.
    pub forward_logs: bool,
}

impl HostState {
    pub fn new(
        state_store: Arc<dyn StateStore>,
        config: ExecutionConfig,
        max_memory_bytes: usize,
        forward_logs: bool,
    ) -> Self {
        Self {
            state_store,
            config,
            overlay: StateOverlay::new(),
            input: Vec::new(),
            return_data: Vec::new(),
            logs: Vec::new(),
            // Set after instantiation, once the memory size is known.
            host_alloc: HostAllocator::default(),
            limits: StoreLimitsBuilder::new()
                .memory_size(max_memory_bytes)
                .instances(1)
                .build(),
            forward_logs,
        }
    }

    /// Reset per-call state and install `payload` as the call input.
    pub fn begin_call(&mut self, payload: &[u8]) {
        self.overlay.clear();
        self.input = payload.to_vec();
        self.return_data.clear();
        self.logs.clear();
        self.host_alloc.reset();
    }

    /// Take the buffered writes, sorted by key.
    pub fn take_writes(&mut self) -> Vec<(Vec<u8>, Vec<u8>)> {
        std::mem::take(&mut self.overlay).drain().into_iter().collect()
    }

    /// Drop the buffered writes of a failed call.
    pub fn discard_writes(&mut self) {
        self.overlay.clear();
    }
}

impl HostApi for HostState {
    fn input(&self) -> Result<&[u8], HostError> {
        if self.input.len() > self.config.max_input_len {
            return Err(HostError::input_too_large());
        }
        Ok(&self.input)
    }

    /// Reads see this call's earlier writes before committed state.
    fn state_get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, HostError> {
        if key.len() > self.config.max_key_len {
            return Err(HostError::key_too_large());
        }
        match self.overlay.get(key) {
            Some(value) => Ok(Some(value.to_vec())),
            None => self.state_store.get(key),
        }
    }

    fn state_set(&mut self, key: &[u8], value: &[u8]) -> Result<(), HostError> {
        if key.len() > self.config.max_key_len {
            return Err(HostError::key_too_large());
        }
        if value.len() > self.config.max_value_len {
            return Err(HostError::value_too_large());
        }
        if self.overlay.projected_bytes(key, value) > self.config.max_write_bytes as u64 {
            return Err(HostError::write_limit());
        }
        self.overlay.set(key.to_vec(), value.to_vec());
        Ok(())
    }

    /// Oversized lines and lines past the per-call limit are dropped.
    fn log(&mut self, level: u32, message: &str) -> Result<(), HostError> {
        if message.len() > self.config.max_log_line_len
            || self.logs.len() >= self.config.max_log_lines as usize
        {
            return Ok(());
        }
        if self.forward_logs {
            forward_to_tracing(level, message);
        }
        self.logs.push(LogLine {
            level,
            message: message.to_string(),
        });
        Ok(())
    }

    fn value_return(&mut self, data: &[u8]) -> Result<(), HostError> {
        self.return_data = data.to_vec();
        Ok(())
    }
}

fn forward_to_tracing(level: u32, message: &str) {
    match level {
        LOG_TRACE => tracing::trace!(target: "securemsg::guest", "{}", message),
        LOG_DEBUG => tracing::debug!(target: "securemsg::guest", "{}", message),
        LOG_INFO => tracing::info!(target: "securemsg::guest", "{}", message),
        LOG_WARN => tracing::warn!(target: "securemsg::guest", "{}", message),
        _ => tracing::error!(target: "securemsg::guest", "{}", message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use securemsg_hostapi::MemStore;
    use securemsg_primitives::ErrorCode;

    fn host_state_with(store: MemStore, config: ExecutionConfig) -> HostState {
        HostState::new(Arc::new(store), config, 1 << 20, false)
    }

    fn host_state() -> HostState {
        host_state_with(MemStore::new(), ExecutionConfig::default())
    }

    #[test]
    fn test_state_get_from_overlay() {
        let mut state = host_state();
        state.state_set(b"key1", b"value1").unwrap();
        assert_eq!(state.state_get(b"key1").unwrap(), Some(b"value1".to_vec()));
    }

    #[test]
    fn test_overlay_shadows_committed() {
        let store = MemStore::new();
        store.insert(b"key1".to_vec(), b"old".to_vec()).unwrap();
        let mut state = host_state_with(store, ExecutionConfig::default());

        assert_eq!(state.state_get(b"key1").unwrap(), Some(b"old".to_vec()));
        state.state_set(b"key1", b"new").unwrap();
        assert_eq!(state.state_get(b"key1").unwrap(), Some(b"new".to_vec()));
    }

    #[test]
    fn test_size_limits_buffer_nothing() {
        let mut state = host_state();
        let big_key = vec![0u8; state.config.max_key_len + 1];
        let big_val = vec![0u8; state.config.max_value_len + 1];

        assert_eq!(
            state.state_set(&big_key, b"v").unwrap_err().to_error_code(),
            ErrorCode::KeyTooLarge.as_i32()
        );
        assert_eq!(
            state.state_set(b"k", &big_val).unwrap_err().to_error_code(),
            ErrorCode::ValueTooLarge.as_i32()
        );
        assert!(state.overlay.is_empty());
    }

    #[test]
    fn test_write_limit_counts_overwrites_once() {
        let config = ExecutionConfig {
            max_write_bytes: 10,
            ..ExecutionConfig::default()
        };
        let mut state = host_state_with(MemStore::new(), config);

        state.state_set(b"k", b"12345678").unwrap(); // 9 bytes
        state.state_set(b"k", b"abcdefgh").unwrap(); // replaces, still 9
        let err = state.state_set(b"j", b"xy").unwrap_err();
        assert_eq!(err, HostError::write_limit());
        assert_eq!(state.overlay.len(), 1);
    }

    #[test]
    fn test_input_limit() {
        let config = ExecutionConfig {
            max_input_len: 4,
            ..ExecutionConfig::default()
        };
        let mut state = host_state_with(MemStore::new(), config);
        state.begin_call(b"1234");
        assert_eq!(state.input().unwrap(), b"1234");
        state.begin_call(b"12345");
        assert_eq!(state.input().unwrap_err(), HostError::input_too_large());
    }

    #[test]
    fn test_log_limits_silently_drop() {
        let config = ExecutionConfig {
            max_log_lines: 2,
            max_log_line_len: 8,
            ..ExecutionConfig::default()
        };
        let mut state = host_state_with(MemStore::new(), config);
        state.log(2, "msg1").unwrap();
        state.log(2, "far too long").unwrap();
        state.log(2, "msg2").unwrap();
        state.log(2, "msg3").unwrap();

        let kept: Vec<&str> = state.logs.iter().map(|l| l.message.as_str()).collect();
        assert_eq!(kept, vec!["msg1", "msg2"]);
    }

    #[test]
    fn test_begin_call_resets_call_state() {
        let mut state = host_state();
        state.begin_call(b"first");
        state.state_set(b"k", b"v").unwrap();
        state.log(2, "line").unwrap();
        state.value_return(b"out").unwrap();

        state.begin_call(b"second");
        assert!(state.overlay.is_empty());
        assert!(state.logs.is_empty());
        assert!(state.return_data.is_empty());
        assert_eq!(state.input().unwrap(), b"second");
    }

    #[test]
    fn test_begin_call_rewinds_host_allocator() {
        let mut state = host_state();
        state.host_alloc = HostAllocator::new(65_536, 1024);
        state.begin_call(b"first");
        let plan = state.host_alloc.plan(512, 2 * 65_536);
        state.host_alloc.commit(plan, 512);
        assert_eq!(state.host_alloc.remaining(), 512);

        state.begin_call(b"second");
        assert_eq!(state.host_alloc.remaining(), 1024);
    }

    #[test]
    fn test_take_writes_is_sorted() {
        let mut state = host_state();
        state.state_set(b"b", b"2").unwrap();
        state.state_set(b"a", b"1").unwrap();
        let writes = state.take_writes();
        assert_eq!(
            writes,
            vec![(b"a".to_vec(), b"1".to_vec()), (b"b".to_vec(), b"2".to_vec())]
        );
        assert!(state.overlay.is_empty());
    }
}
