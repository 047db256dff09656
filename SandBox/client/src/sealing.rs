//! Message sealing.
//!
//! A message is sealed under a fresh 32-byte secret. Two keys are derived
//! from it with BLAKE3 in derive-key mode: a public key that is stored next
//! to the ciphertext, and the ChaCha20-Poly1305 cipher key. The public key
//! is bound to the ciphertext as associated data, so a record cannot be
//! re-labelled with another key.
//!
//! Wire format of [`EncryptedMessage`] (all fields base64):
//! `{"content": ciphertext+tag, "publicKey": 32 bytes, "nonce": 12 bytes}`.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chacha20poly1305::{
    aead::{Aead, KeyInit, Payload},
    ChaCha20Poly1305, Key, Nonce,
};
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};

const PUBLIC_KEY_CONTEXT: &str = "securemsg 2026-10-01 sealing public key";
const CIPHER_KEY_CONTEXT: &str = "securemsg 2026-10-01 sealing cipher key";

pub const KEY_LEN: usize = 32;
pub const NONCE_LEN: usize = 12;

/// Random bytes behind a message id.
const MESSAGE_ID_LEN: usize = 16;

/// Sealed message as stored on chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedMessage {
    pub content: String,
    pub public_key: String,
    pub nonce: String,
}

/// Secret that opens one message, with its derived public key.
#[derive(Clone, PartialEq, Eq)]
pub struct SealingKey {
    secret: [u8; KEY_LEN],
    public: [u8; KEY_LEN],
}

impl std::fmt::Debug for SealingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SealingKey")
            .field("public", &BASE64.encode(self.public))
            .finish_non_exhaustive()
    }
}

impl SealingKey {
    pub fn generate() -> Self {
        let mut secret = [0u8; KEY_LEN];
        OsRng.fill_bytes(&mut secret);
        Self::from_secret(secret)
    }

    pub fn from_secret(secret: [u8; KEY_LEN]) -> Self {
        let public = blake3::derive_key(PUBLIC_KEY_CONTEXT, &secret);
        Self { secret, public }
    }

    /// Rebuild a key from both halves, rejecting a public key that does
    /// not belong to `secret`.
    pub fn from_parts(secret: [u8; KEY_LEN], public: [u8; KEY_LEN]) -> Result<Self> {
        let key = Self::from_secret(secret);
        if key.public != public {
            return Err(ClientError::Crypto("public key does not match secret".into()));
        }
        Ok(key)
    }

    pub fn secret(&self) -> &[u8; KEY_LEN] {
        &self.secret
    }

    pub fn public(&self) -> &[u8; KEY_LEN] {
        &self.public
    }

    fn cipher(&self) -> ChaCha20Poly1305 {
        let key = blake3::derive_key(CIPHER_KEY_CONTEXT, &self.secret);
        ChaCha20Poly1305::new(Key::from_slice(&key))
    }
}

/// Seal `message` under a freshly generated key.
pub fn seal(message: &str) -> Result<(EncryptedMessage, SealingKey)> {
    let key = SealingKey::generate();
    let sealed = seal_with(message, &key)?;
    Ok((sealed, key))
}

/// Seal `message` under `key` with a random nonce.
pub fn seal_with(message: &str, key: &SealingKey) -> Result<EncryptedMessage> {
    let mut nonce = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce);

    let ciphertext = key
        .cipher()
        .encrypt(
            Nonce::from_slice(&nonce),
            Payload {
                msg: message.as_bytes(),
                aad: &key.public,
            },
        )
        .map_err(|_| ClientError::Crypto("encryption failed".into()))?;

    Ok(EncryptedMessage {
        content: BASE64.encode(ciphertext),
        public_key: BASE64.encode(key.public),
        nonce: BASE64.encode(nonce),
    })
}

/// Open a sealed message.
pub fn open(sealed: &EncryptedMessage, key: &SealingKey) -> Result<String> {
    let public = decode_fixed::<KEY_LEN>(&sealed.public_key, "public key")?;
    if public != key.public {
        return Err(ClientError::Crypto("message was sealed under another key".into()));
    }
    let nonce = decode_fixed::<NONCE_LEN>(&sealed.nonce, "nonce")?;
    let ciphertext = BASE64
        .decode(&sealed.content)
        .map_err(|e| ClientError::Crypto(format!("content is not base64: {}", e)))?;

    let plaintext = key
        .cipher()
        .decrypt(
            Nonce::from_slice(&nonce),
            Payload {
                msg: &ciphertext,
                aad: &key.public,
            },
        )
        .map_err(|_| ClientError::Crypto("failed to decrypt message".into()))?;

    String::from_utf8(plaintext)
        .map_err(|_| ClientError::Crypto("decrypted message is not valid UTF-8".into()))
}

/// Random message id: 16 bytes, base64.
pub fn generate_message_id() -> String {
    let mut id = [0u8; MESSAGE_ID_LEN];
    OsRng.fill_bytes(&mut id);
    BASE64.encode(id)
}

pub(crate) fn decode_fixed<const N: usize>(encoded: &str, what: &str) -> Result<[u8; N]> {
    let bytes = BASE64
        .decode(encoded)
        .map_err(|e| ClientError::Crypto(format!("{} is not base64: {}", what, e)))?;
    bytes
        .try_into()
        .map_err(|_| ClientError::Crypto(format!("{} must be {} bytes", what, N)))
}
