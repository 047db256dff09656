//! Call outcome types shared by the contract and the host.
//!
//! The public response convention is **bare UTF-8 text**: a successful
//! entry point hands its text to the host via `value_return` and returns
//! result code 0. A failed entry point returns a non-zero [`ResultCode`]
//! and hands back the error's display text instead.

use serde::{Deserialize, Serialize};

use crate::error::ResultCode;
use crate::types::EntryPoint;

/// Text produced by a successful entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response(String);

impl Response {
    pub fn text(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Bytes written to the host's return channel.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Debug log line emitted by the contract.
///
/// Logs carry no contractual meaning. The contract never branches on log
/// success and the host may drop lines over its limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogLine {
    /// Log level (0=trace, 1=debug, 2=info, 3=warn, 4=error).
    pub level: u32,
    pub message: String,
}

/// Outcome of one entry-point invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallReceipt {
    /// Export name of the invoked entry point.
    pub entry: String,
    /// False when the call failed; `return_data` then holds the error text.
    pub success: bool,
    /// [`ResultCode`] as `u32`.
    pub result_code: u32,
    /// Bytes passed to `value_return`.
    pub return_data: Vec<u8>,
    /// Log lines captured during the call.
    pub logs: Vec<LogLine>,
}

impl CallReceipt {
    pub fn new(entry: EntryPoint, code: ResultCode, return_data: Vec<u8>, logs: Vec<LogLine>) -> Self {
        Self {
            entry: String::from(entry.export_name()),
            success: code.is_ok(),
            result_code: code.as_u32(),
            return_data,
            logs,
        }
    }

    /// Returned data as text, if it is valid UTF-8.
    pub fn return_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.return_data).ok()
    }

    /// Decoded result code. Unknown codes map to `None`.
    pub fn code(&self) -> Option<ResultCode> {
        ResultCode::from_u32(self.result_code)
    }
}
