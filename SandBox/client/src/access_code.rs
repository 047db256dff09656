//! Access codes.
//!
//! An access code hands a reader everything needed to fetch and open one
//! message: its id and its key pair. It is the base58 encoding of
//! `{"messageId": ..., "privateKey": base64, "publicKey": base64}`.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};
use crate::sealing::{decode_fixed, SealingKey, KEY_LEN};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessCode {
    pub message_id: String,
    pub key: SealingKey,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccessCodeWire {
    message_id: String,
    private_key: String,
    public_key: String,
}

impl AccessCode {
    pub fn new(message_id: impl Into<String>, key: SealingKey) -> Self {
        Self {
            message_id: message_id.into(),
            key,
        }
    }

    pub fn encode(&self) -> Result<String> {
        let wire = AccessCodeWire {
            message_id: self.message_id.clone(),
            private_key: BASE64.encode(self.key.secret()),
            public_key: BASE64.encode(self.key.public()),
        };
        let json = serde_json::to_vec(&wire)?;
        Ok(bs58::encode(json).into_string())
    }

    /// Any malformed input yields [`ClientError::InvalidAccessCode`].
    pub fn decode(code: &str) -> Result<Self> {
        let bytes = bs58::decode(code.trim())
            .into_vec()
            .map_err(|_| ClientError::InvalidAccessCode)?;
        let wire: AccessCodeWire =
            serde_json::from_slice(&bytes).map_err(|_| ClientError::InvalidAccessCode)?;

        let secret = decode_fixed::<KEY_LEN>(&wire.private_key, "private key")
            .map_err(|_| ClientError::InvalidAccessCode)?;
        let public = decode_fixed::<KEY_LEN>(&wire.public_key, "public key")
            .map_err(|_| ClientError::InvalidAccessCode)?;
        let key =
            SealingKey::from_parts(secret, public).map_err(|_| ClientError::InvalidAccessCode)?;

        Ok(Self::new(wire.message_id, key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_round_trip() {
        let code = AccessCode::new("bWVzc2FnZS1pZC0xMjM0NQ==", SealingKey::generate());
        let encoded = code.encode().unwrap();

        assert!(encoded.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(AccessCode::decode(&encoded).unwrap(), code);
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        let code = AccessCode::new("id", SealingKey::generate());
        let encoded = format!("  {}\n", code.encode().unwrap());
        assert_eq!(AccessCode::decode(&encoded).unwrap(), code);
    }

    #[test]
    fn test_not_base58() {
        // '0', 'O', 'I' and 'l' are outside the base58 alphabet.
        assert_eq!(AccessCode::decode("0OIl").unwrap_err(), ClientError::InvalidAccessCode);
    }

    #[test]
    fn test_base58_but_not_a_code() {
        let encoded = bs58::encode(br#"{"messageId":"x"}"#).into_string();
        assert_eq!(AccessCode::decode(&encoded).unwrap_err(), ClientError::InvalidAccessCode);
    }

    #[test]
    fn test_mismatched_key_pair() {
        let a = SealingKey::generate();
        let b = SealingKey::generate();
        let json = serde_json::json!({
            "messageId": "id",
            "privateKey": BASE64.encode(a.secret()),
            "publicKey": BASE64.encode(b.public()),
        });
        let encoded = bs58::encode(json.to_string()).into_string();
        assert_eq!(AccessCode::decode(&encoded).unwrap_err(), ClientError::InvalidAccessCode);
    }
}
