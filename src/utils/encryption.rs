use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::Aes256Gcm;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use rand::RngCore;
use thiserror::Error;

type Nonce = [u8; 12];

const FORMAT_VERSION: u8 = 0x01;
const HEADER_LEN: usize = 1 + 12;

/// Cryptographic errors
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Invalid key: {0}")]
    InvalidKey(String),
    #[error("Encryption failed: {0}")]
    Encryption(String),
    #[error("Decryption failed: {0}")]
    Decryption(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Base64 decode error: {0}")]
    Base64Decode(String),
    #[error("UTF-8 conversion error: {0}")]
    Utf8Error(String),
}

/// AES256-GCM cipher for the API bearer token kept in `.env`
///
/// Sealed tokens are base64 of `[version_byte][nonce(12)][ciphertext]`.
pub struct TokenCipher {
    cipher: Aes256Gcm,
}

impl TokenCipher {
    /// Build a cipher from a 64 character hex key
    pub fn from_hex(key_hex: &str) -> Result<Self, CryptoError> {
        let key_bytes = hex::decode(key_hex.trim())
            .map_err(|e| CryptoError::InvalidKey(format!("not hex: {}", e)))?;

        let key: [u8; 32] = key_bytes.try_into().map_err(|_| {
            CryptoError::InvalidKey("Encryption key must be 32 bytes (256 bits)".to_string())
        })?;

        Ok(Self {
            cipher: Aes256Gcm::new(&key.into()),
        })
    }

    pub fn seal(&self, token: &str) -> Result<String, CryptoError> {
        let mut nonce: Nonce = [0u8; 12];
        rand::rngs::OsRng.fill_bytes(&mut nonce);

        let ciphertext = self
            .cipher
            .encrypt((&nonce).into(), token.as_bytes())
            .map_err(|e| CryptoError::Encryption(e.to_string()))?;

        let mut sealed = Vec::with_capacity(HEADER_LEN + ciphertext.len());
        sealed.push(FORMAT_VERSION);
        sealed.extend_from_slice(&nonce);
        sealed.extend_from_slice(&ciphertext);

        Ok(BASE64.encode(sealed))
    }

    pub fn open(&self, sealed_b64: &str) -> Result<String, CryptoError> {
        let sealed = BASE64
            .decode(sealed_b64.trim())
            .map_err(|e| CryptoError::Base64Decode(e.to_string()))?;

        if sealed.len() < HEADER_LEN {
            return Err(CryptoError::InvalidData(
                "Sealed token too short (need at least 1 + 12 bytes for version + nonce)"
                    .to_string(),
            ));
        }

        if sealed[0] != FORMAT_VERSION {
            return Err(CryptoError::InvalidData(format!(
                "Unsupported encryption version: {}",
                sealed[0]
            )));
        }

        let nonce: Nonce = sealed[1..HEADER_LEN]
            .try_into()
            .map_err(|_| CryptoError::InvalidData("Failed to extract nonce".to_string()))?;

        let plaintext = self
            .cipher
            .decrypt((&nonce).into(), &sealed[HEADER_LEN..])
            .map_err(|e| CryptoError::Decryption(e.to_string()))?;

        String::from_utf8(plaintext).map_err(|e| CryptoError::Utf8Error(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

    #[test]
    fn test_seal_open() {
        let cipher = TokenCipher::from_hex(KEY).expect("valid key");
        let sealed = cipher.seal("bearer-token-123").expect("seal failed");

        assert_eq!(cipher.open(&sealed).expect("open failed"), "bearer-token-123");
    }

    #[test]
    fn test_nonces_differ() {
        let cipher = TokenCipher::from_hex(KEY).unwrap();
        let first = cipher.seal("token").unwrap();
        let second = cipher.seal("token").unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn test_wrong_key_fails() {
        let sealed = TokenCipher::from_hex(KEY).unwrap().seal("token").unwrap();
        let other = TokenCipher::from_hex(&"ab".repeat(32)).unwrap();

        assert!(matches!(other.open(&sealed), Err(CryptoError::Decryption(_))));
    }

    #[test]
    fn test_short_key_rejected() {
        assert!(matches!(
            TokenCipher::from_hex("abcd"),
            Err(CryptoError::InvalidKey(_))
        ));
    }
}
