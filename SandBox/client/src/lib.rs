//! `securemsg-client`: sealed messages over the secure-chain message contract.
//!
//! The contract stores plain text under a key. This crate makes that text
//! private:
//!
//! - [`sealing`]: ChaCha20-Poly1305 sealing under a per-message key
//! - [`access_code`]: base58 codes carrying a message id and its key
//! - [`MessageClient`]: create and read messages through a [`ContractTransport`]
//!
//! Only the holder of an access code can open the message it points to.

pub mod error;
pub mod sealing;
pub mod access_code;
pub mod record;
pub mod transport;
pub mod client;

pub use access_code::AccessCode;
pub use client::{CreatedMessage, MessageClient, ReadMessage};
pub use error::{ClientError, Result};
pub use record::StoredMessage;
pub use sealing::{EncryptedMessage, SealingKey};
pub use transport::{ContractTransport, LocalTransport};
