//! Create and read sealed messages through the contract.

use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::json;

use securemsg_primitives::{types::GET_ERROR_PREFIX, CallReceipt, EntryPoint};

use crate::access_code::AccessCode;
use crate::error::{ClientError, Result};
use crate::record::StoredMessage;
use crate::sealing::{self, EncryptedMessage};
use crate::transport::ContractTransport;

/// Result of [`MessageClient::create_message`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedMessage {
    pub message_id: String,
    /// Base58 access code to hand to the reader.
    pub access_code: String,
}

/// Result of [`MessageClient::read_message`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadMessage {
    pub message: String,
    pub author: String,
    pub timestamp: u64,
}

pub struct MessageClient<T> {
    transport: T,
}

impl<T: ContractTransport> MessageClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Seal `content`, store it under a fresh random id and return the
    /// access code that opens it.
    pub fn create_message(&mut self, content: &str, author: &str) -> Result<CreatedMessage> {
        let message_id = sealing::generate_message_id();
        let (sealed, key) = sealing::seal(content)?;

        let record = StoredMessage {
            id: message_id.clone(),
            encrypted_content: serde_json::to_string(&sealed)?,
            timestamp: now_millis(),
            author: author.to_string(),
        };
        let payload = json!({
            "key": message_id,
            "msg": serde_json::to_string(&record)?,
        });
        self.call(EntryPoint::CreateMsg, payload.to_string().as_bytes())?;

        let access_code = AccessCode::new(message_id.clone(), key).encode()?;
        tracing::debug!(%message_id, "sealed message stored");
        Ok(CreatedMessage {
            message_id,
            access_code,
        })
    }

    /// Fetch and open the message an access code points to.
    pub fn read_message(&mut self, access_code: &str) -> Result<ReadMessage> {
        let code = AccessCode::decode(access_code)?;
        let payload = json!({ "key": code.message_id });
        let receipt = self.call(EntryPoint::GetMsg, payload.to_string().as_bytes())?;

        let text = receipt
            .return_text()
            .ok_or_else(|| ClientError::Serialization("response is not UTF-8".into()))?;
        // Records are JSON objects, so the diagnostic prefix cannot collide.
        if text.starts_with(GET_ERROR_PREFIX) {
            return Err(ClientError::NotFound(code.message_id));
        }

        let record: StoredMessage = serde_json::from_str(text)?;
        if record.id != code.message_id {
            return Err(ClientError::Serialization(format!(
                "record id {} does not match {}",
                record.id, code.message_id
            )));
        }
        let sealed: EncryptedMessage = serde_json::from_str(&record.encrypted_content)?;
        let message = sealing::open(&sealed, &code.key)?;

        Ok(ReadMessage {
            message,
            author: record.author,
            timestamp: record.timestamp,
        })
    }

    fn call(&mut self, entry: EntryPoint, payload: &[u8]) -> Result<CallReceipt> {
        let receipt = self.transport.invoke(entry, payload)?;
        if !receipt.success {
            let text = receipt.return_text().unwrap_or_default().to_string();
            tracing::warn!(entry = %entry, code = receipt.result_code, %text, "contract call rejected");
            return Err(ClientError::Rejected {
                entry: receipt.entry,
                code: receipt.result_code,
                text,
            });
        }
        Ok(receipt)
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
