//! Error types for the message contract.
//!
//! Two layers:
//! - [`ErrorCode`]: `i32` codes returned by every host import (0 = OK).
//! - [`ContractError`] / [`DecodeError`]: contract-level failures, reported
//!   to the caller as a non-zero [`ResultCode`] plus the error text.

use std::fmt;

/// Host import error codes.
///
/// These repr values are part of the guest/host ABI and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ErrorCode {
    Ok = 0,
    BadPointer = 1,
    InvalidEncoding = 2,
    KeyTooLarge = 3,
    ValueTooLarge = 4,
    WriteLimit = 5,
    InputTooLarge = 6,
    Internal = 7,
}

impl ErrorCode {
    /// Convert from an i32 returned by a host import.
    pub fn from_i32(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Ok),
            1 => Some(Self::BadPointer),
            2 => Some(Self::InvalidEncoding),
            3 => Some(Self::KeyTooLarge),
            4 => Some(Self::ValueTooLarge),
            5 => Some(Self::WriteLimit),
            6 => Some(Self::InputTooLarge),
            7 => Some(Self::Internal),
            _ => None,
        }
    }

    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "OK"),
            Self::BadPointer => write!(f, "ERR_BAD_POINTER"),
            Self::InvalidEncoding => write!(f, "ERR_INVALID_ENCODING"),
            Self::KeyTooLarge => write!(f, "ERR_KEY_TOO_LARGE"),
            Self::ValueTooLarge => write!(f, "ERR_VALUE_TOO_LARGE"),
            Self::WriteLimit => write!(f, "ERR_WRITE_LIMIT"),
            Self::InputTooLarge => write!(f, "ERR_INPUT_TOO_LARGE"),
            Self::Internal => write!(f, "ERR_INTERNAL"),
        }
    }
}

/// Error returned by a host interface call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecError {
    /// A host import returned a non-zero code.
    HostError(ErrorCode),
    /// Bytes crossing the boundary were not in the expected encoding.
    Encoding(String),
}

impl ExecError {
    /// The ABI code that best describes this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::HostError(code) => *code,
            Self::Encoding(_) => ErrorCode::InvalidEncoding,
        }
    }
}

impl fmt::Display for ExecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HostError(code) => write!(f, "host error: {}", code),
            Self::Encoding(msg) => write!(f, "encoding error: {}", msg),
        }
    }
}

impl From<ErrorCode> for ExecError {
    fn from(code: ErrorCode) -> Self {
        Self::HostError(code)
    }
}

/// Result type for host interface calls.
pub type ExecResult<T> = std::result::Result<T, ExecError>;

/// Failure while decoding a call payload. The first failing field wins.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// Payload is not a JSON object.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// A required field is absent.
    #[error("missing field '{0}'")]
    FieldMissing(String),

    /// A required field is present but not a string.
    #[error("field '{0}' must be a string")]
    FieldTypeMismatch(String),
}

/// Contract-level error taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContractError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The store rejected an insert. Nothing was written.
    #[error("store write failed: {0}")]
    StoreWrite(ExecError),

    /// The store could not return a value.
    #[error("store read failed: {0}")]
    StoreRead(ExecError),

    /// No record exists under the key.
    #[error("key not found: {0}")]
    KeyNotFound(String),

    /// Returning the response to the host failed.
    #[error("host call failed: {0}")]
    Host(ExecError),
}

impl ContractError {
    /// Result code reported to the caller for this failure.
    pub fn result_code(&self) -> ResultCode {
        match self {
            Self::Decode(DecodeError::MalformedPayload(_)) => ResultCode::MalformedPayload,
            Self::Decode(DecodeError::FieldMissing(_)) => ResultCode::FieldMissing,
            Self::Decode(DecodeError::FieldTypeMismatch(_)) => ResultCode::FieldTypeMismatch,
            Self::StoreWrite(_) => ResultCode::StoreWriteFailure,
            Self::StoreRead(_) | Self::KeyNotFound(_) => ResultCode::StoreReadFailure,
            Self::Host(_) => ResultCode::HostFailure,
        }
    }
}

/// Outcome code an entry point returns to the host (0 = success).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ResultCode {
    Ok = 0,
    MalformedPayload = 1,
    FieldMissing = 2,
    FieldTypeMismatch = 3,
    StoreWriteFailure = 4,
    StoreReadFailure = 5,
    HostFailure = 6,
}

impl ResultCode {
    pub fn from_u32(code: u32) -> Option<Self> {
        match code {
            0 => Some(Self::Ok),
            1 => Some(Self::MalformedPayload),
            2 => Some(Self::FieldMissing),
            3 => Some(Self::FieldTypeMismatch),
            4 => Some(Self::StoreWriteFailure),
            5 => Some(Self::StoreReadFailure),
            6 => Some(Self::HostFailure),
            _ => None,
        }
    }

    pub fn as_u32(self) -> u32 {
        self as u32
    }

    pub fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "OK"),
            Self::MalformedPayload => write!(f, "MALFORMED_PAYLOAD"),
            Self::FieldMissing => write!(f, "FIELD_MISSING"),
            Self::FieldTypeMismatch => write!(f, "FIELD_TYPE_MISMATCH"),
            Self::StoreWriteFailure => write!(f, "STORE_WRITE_FAILURE"),
            Self::StoreReadFailure => write!(f, "STORE_READ_FAILURE"),
            Self::HostFailure => write!(f, "HOST_FAILURE"),
        }
    }
}
