//! Sandbox error types.
//!
//! These describe failures of the sandbox itself. A contract call that
//! runs to completion and reports a non-zero result code is not an error
//! here: it comes back as a `CallReceipt` with `success == false`.

use securemsg_hostapi::HostError;

#[derive(Debug, thiserror::Error)]
pub enum SandboxError {
    /// Wasmtime engine, compilation, or instantiation error.
    #[error("wasmtime error: {0}")]
    Wasmtime(#[from] anyhow::Error),

    /// Module validation failed (missing exports, bad imports, etc.).
    #[error("validation error: {0}")]
    ValidationError(String),

    /// The requested entry point is not one the contract exports.
    #[error("unknown entry point: {0}")]
    UnknownEntryPoint(String),

    /// Committing a successful call's writes failed.
    #[error("host error: {0}")]
    HostError(#[from] HostError),

    /// The guest returned a code outside the result code table.
    #[error("entry point {entry} returned unknown result code {code}")]
    UnknownResultCode { entry: String, code: i32 },

    /// Memory operation failed (out-of-bounds, grow failure).
    #[error("memory error: {0}")]
    MemoryError(String),

    /// Fuel exhausted during execution.
    #[error("fuel exhausted (instruction limit)")]
    FuelExhausted,

    /// Wasm guest trapped.
    #[error("guest trapped: {0}")]
    GuestTrapped(String),
}
