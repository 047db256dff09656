//! Message record as the client stores it in the contract.

use serde::{Deserialize, Serialize};

/// Value written under the message id. `encrypted_content` holds the
/// JSON of an [`EncryptedMessage`](crate::sealing::EncryptedMessage).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredMessage {
    pub id: String,
    pub encrypted_content: String,
    /// Milliseconds since the Unix epoch, taken by the writer.
    pub timestamp: u64,
    pub author: String,
}
