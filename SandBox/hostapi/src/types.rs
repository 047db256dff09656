//! Host-side configuration types.

use securemsg_primitives::{MAX_INPUT_LEN, MAX_KEY_LEN, MAX_VALUE_LEN};

/// Resource limits for a single call.
///
/// Enforced by the host API implementation; the guest cannot exceed them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionConfig {
    /// Maximum length of a state key in bytes.
    pub max_key_len: usize,
    /// Maximum length of a state value in bytes.
    pub max_value_len: usize,
    /// Maximum total key + value bytes buffered by one call.
    pub max_write_bytes: usize,
    /// Maximum call payload length in bytes.
    pub max_input_len: usize,
    /// Maximum number of log lines kept per call.
    pub max_log_lines: u32,
    /// Maximum length of a single log line in bytes.
    pub max_log_line_len: usize,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            max_key_len: MAX_KEY_LEN,
            max_value_len: MAX_VALUE_LEN,
            max_write_bytes: 1024 * 1024, // 1 MiB
            max_input_len: MAX_INPUT_LEN,
            max_log_lines: 256,
            max_log_line_len: 1024,
        }
    }
}
