//! Host-side error type.
//!
//! `HostError` wraps the ABI `ErrorCode` for errors the guest is expected to
//! handle, plus an `Internal` variant for host faults that only surface to
//! the guest as `ERR_INTERNAL`.

use securemsg_primitives::ErrorCode;

/// Error returned by `HostApi` and `StateStore` methods.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    /// An ABI error code.
    #[error("host error: {0}")]
    Code(ErrorCode),
    /// A host fault with a description for host-side logs.
    #[error("internal host error: {0}")]
    Internal(String),
}

impl HostError {
    /// The `i32` code returned to the wasm guest.
    pub fn to_error_code(&self) -> i32 {
        match self {
            Self::Code(code) => code.as_i32(),
            Self::Internal(_) => ErrorCode::Internal.as_i32(),
        }
    }

    pub fn bad_pointer() -> Self {
        Self::Code(ErrorCode::BadPointer)
    }

    pub fn invalid_encoding() -> Self {
        Self::Code(ErrorCode::InvalidEncoding)
    }

    pub fn key_too_large() -> Self {
        Self::Code(ErrorCode::KeyTooLarge)
    }

    pub fn value_too_large() -> Self {
        Self::Code(ErrorCode::ValueTooLarge)
    }

    pub fn write_limit() -> Self {
        Self::Code(ErrorCode::WriteLimit)
    }

    pub fn input_too_large() -> Self {
        Self::Code(ErrorCode::InputTooLarge)
    }
}

impl From<ErrorCode> for HostError {
    fn from(code: ErrorCode) -> Self {
        Self::Code(code)
    }
}
