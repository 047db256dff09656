//! Sandbox configuration.

use securemsg_hostapi::ExecutionConfig;

/// Configuration for the wasm sandbox.
#[derive(Debug, Clone)]
pub struct SandboxConfig {
    /// Maximum linear memory pages (1 page = 64 KiB).
    /// Default: 256 pages = 16 MiB.
    pub max_memory_pages: u32,

    /// Wasmtime fuel per call (instruction metering).
    /// Bounds pure guest compute such as infinite loops.
    pub fuel_limit: u64,

    /// Per-call resource limits enforced by the host API.
    pub execution: ExecutionConfig,

    /// Forward guest log lines to `tracing` as they arrive.
    pub enable_guest_logs: bool,
}

impl SandboxConfig {
    /// Memory limit in bytes.
    pub fn max_memory_bytes(&self) -> usize {
        self.max_memory_pages as usize * crate::memory::PAGE_SIZE
    }
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            max_memory_pages: 256, // 16 MiB
            fuel_limit: 50_000_000,
            execution: ExecutionConfig::default(),
            enable_guest_logs: false,
        }
    }
}
