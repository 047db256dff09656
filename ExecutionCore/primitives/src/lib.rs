//! `securemsg-primitives`: shared types for the secure-chain message contract.
//!
//! This crate provides the constants, ABI error codes, contract error
//! taxonomy, payload decoder, response/receipt types and the per-call write
//! buffer used by the contract engine, the wasm guest and the sandbox host.

pub mod types;
pub mod error;
pub mod payload;
pub mod response;
pub mod state;

// Re-export commonly used types at the crate root for convenience.
pub use types::{
    EntryPoint, DEFAULT_NAMESPACE, MAX_INPUT_LEN, MAX_KEY_LEN, MAX_VALUE_LEN,
};
pub use error::{ContractError, DecodeError, ErrorCode, ExecError, ExecResult, ResultCode};
pub use payload::{decode_fields, CreateMsgRequest, DecodedFields, GetMsgRequest};
pub use response::{CallReceipt, LogLine, Response};
pub use state::StateOverlay;
