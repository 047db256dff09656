//! Core constants and naming for the message contract.
//!
//! These values are shared by the contract engine, the wasm guest and the
//! sandbox host, so both sides of the ABI agree on names, limits and the
//! fixed acknowledgement strings.

use std::fmt;

/// Namespace scoping every message record written by this contract.
pub const DEFAULT_NAMESPACE: &str = "secure_chain_msg";

/// Separator between the namespace and the caller-supplied key.
pub const NAMESPACE_SEPARATOR: u8 = b'/';

/// Maximum storage key length in bytes (namespace prefix included).
pub const MAX_KEY_LEN: usize = 512;

/// Maximum stored value length in bytes.
pub const MAX_VALUE_LEN: usize = 65_536; // 64 KiB

/// Maximum size of a call payload accepted by the host.
pub const MAX_INPUT_LEN: usize = 131_072; // 128 KiB

/// Payload field holding the record key.
pub const FIELD_KEY: &str = "key";

/// Payload field holding the message body.
pub const FIELD_MSG: &str = "msg";

/// Fixed acknowledgement returned (and logged) by `Init`.
pub const INIT_ACK: &str = "Init Smart Contract";

/// Success text returned by `CreateMsg`.
pub const CREATE_ACK: &str = "Msg was created successfully";

/// Prefix of the diagnostic text `GetMsg` returns when a read fails.
pub const GET_ERROR_PREFIX: &str = "Error getting message";

/// Host import module name. Guests may only import from this module.
pub const HOST_MODULE: &str = "securemsg_host";

// Log levels understood by the host `log` import.
pub const LOG_TRACE: u32 = 0;
pub const LOG_DEBUG: u32 = 1;
pub const LOG_INFO: u32 = 2;
pub const LOG_WARN: u32 = 3;
pub const LOG_ERROR: u32 = 4;

/// Externally invokable operations of the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryPoint {
    Init,
    CreateMsg,
    GetMsg,
}

impl EntryPoint {
    /// Every entry point, in export order.
    pub const ALL: [EntryPoint; 3] = [Self::Init, Self::CreateMsg, Self::GetMsg];

    /// The wasm export name the host invokes.
    pub fn export_name(self) -> &'static str {
        match self {
            Self::Init => "Init",
            Self::CreateMsg => "CreateMsg",
            Self::GetMsg => "GetMsg",
        }
    }

    /// Resolve an export name back to an entry point.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.export_name() == name)
    }

    /// Payload fields the entry point requires, in extraction order.
    ///
    /// `CreateMsg` checks `msg` before `key`, which decides which error a
    /// payload missing both fields reports.
    pub fn required_fields(self) -> &'static [&'static str] {
        match self {
            Self::Init => &[],
            Self::CreateMsg => &[FIELD_MSG, FIELD_KEY],
            Self::GetMsg => &[FIELD_KEY],
        }
    }
}

impl fmt::Display for EntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.export_name())
    }
}

/// Build the storage key for a record: `<namespace>/<key>`.
pub fn namespaced_key(namespace: &str, key: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(namespace.len() + 1 + key.len());
    out.extend_from_slice(namespace.as_bytes());
    out.push(NAMESPACE_SEPARATOR);
    out.extend_from_slice(key.as_bytes());
    out
}

/// Render the `GetMsg` diagnostic for a failed read.
pub fn get_error_text(cause: &dyn fmt::Display) -> String {
    format!("{}: {}", GET_ERROR_PREFIX, cause)
}
