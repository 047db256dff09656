//! Client error type.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Sealing or opening a message failed.
    #[error("crypto error: {0}")]
    Crypto(String),

    /// The access code is not valid base58 or does not carry a message
    /// id and key pair.
    #[error("invalid message code format")]
    InvalidAccessCode,

    /// A stored record or payload could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The contract holds no message under the code's id.
    #[error("message not found: {0}")]
    NotFound(String),

    /// The contract answered with a non-zero result code.
    #[error("contract call {entry} failed with code {code}: {text}")]
    Rejected {
        entry: String,
        code: u32,
        text: String,
    },

    /// The call never completed (trap, fuel, host failure).
    #[error("transport error: {0}")]
    Transport(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Serialization(err.to_string())
    }
}

impl From<securemsg_sandbox::SandboxError> for ClientError {
    fn from(err: securemsg_sandbox::SandboxError) -> Self {
        ClientError::Transport(err.to_string())
    }
}
