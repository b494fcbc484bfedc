//! Encryption of OAuth tokens at rest and HMAC signing helpers.
//!
//! Tokens are sealed with AES-256-GCM. The stored form is base64 of
//! `nonce (12 bytes) || ciphertext`. The key is SHA-256 of the configured
//! secret so any secret length is accepted.

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::{Digest, Sha256};

use crate::error::CoreError;

/// AES-GCM nonce length in bytes.
const NONCE_LEN: usize = 12;

/// Symmetric cipher for third-party tokens.
#[derive(Clone)]
pub struct TokenCipher {
    cipher: Aes256Gcm,
}

impl std::fmt::Debug for TokenCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TokenCipher(..)")
    }
}

impl TokenCipher {
    /// Build a cipher whose key is derived from `secret`.
    pub fn from_secret(secret: &str) -> Self {
        let digest = Sha256::digest(secret.as_bytes());
        let key = Key::<Aes256Gcm>::from_slice(&digest);
        Self {
            cipher: Aes256Gcm::new(key),
        }
    }

    /// Encrypt `plaintext` with a fresh random nonce.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, CoreError> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|_| CoreError::Internal("Token encryption failed".into()))?;

        let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        sealed.extend_from_slice(&nonce);
        sealed.extend_from_slice(&ciphertext);
        Ok(STANDARD.encode(sealed))
    }

    /// Decrypt a value produced by [`TokenCipher::encrypt`].
    pub fn decrypt(&self, sealed: &str) -> Result<String, CoreError> {
        let bytes = STANDARD
            .decode(sealed)
            .map_err(|_| CoreError::Internal("Sealed token is not valid base64".into()))?;
        if bytes.len() <= NONCE_LEN {
            return Err(CoreError::Internal("Sealed token is truncated".into()));
        }
        let (nonce, ciphertext) = bytes.split_at(NONCE_LEN);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| CoreError::Internal("Token decryption failed".into()))?;
        String::from_utf8(plaintext)
            .map_err(|_| CoreError::Internal("Decrypted token is not UTF-8".into()))
    }
}

// ---------------------------------------------------------------------------
// HMAC signing
// ---------------------------------------------------------------------------

type HmacSha256 = Hmac<Sha256>;

/// Compute a URL-safe base64 HMAC-SHA256 signature of `payload`.
pub fn sign(secret: &str, payload: &str) -> String {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts any key length");
    mac.update(payload.as_bytes());
    URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes())
}

/// Verify a signature produced by [`sign`] in constant time.
pub fn verify(secret: &str, payload: &str, signature: &str) -> bool {
    let Ok(expected) = URL_SAFE_NO_PAD.decode(signature) else {
        return false;
    };
    let mut mac = <HmacSha256 as Mac>::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts any key length");
    mac.update(payload.as_bytes());
    mac.verify_slice(&expected).is_ok()
}

/// Generate a random alphanumeric string of `len` characters.
pub fn random_token(len: usize) -> String {
    rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encrypt_then_decrypt_returns_plaintext() {
        let cipher = TokenCipher::from_secret("test-encryption-secret");
        let sealed = cipher.encrypt("oauth-access-token").unwrap();
        assert_ne!(sealed, "oauth-access-token");
        assert_eq!(cipher.decrypt(&sealed).unwrap(), "oauth-access-token");
    }

    #[test]
    fn same_plaintext_gets_fresh_nonce() {
        let cipher = TokenCipher::from_secret("k");
        let a = cipher.encrypt("same").unwrap();
        let b = cipher.encrypt("same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn wrong_key_fails() {
        let sealed = TokenCipher::from_secret("alpha").encrypt("secret").unwrap();
        assert!(TokenCipher::from_secret("bravo").decrypt(&sealed).is_err());
    }

    #[test]
    fn tampered_ciphertext_fails() {
        let cipher = TokenCipher::from_secret("k");
        let sealed = cipher.encrypt("secret").unwrap();
        let mut bytes = STANDARD.decode(&sealed).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;
        assert!(cipher.decrypt(&STANDARD.encode(bytes)).is_err());
    }

    #[test]
    fn garbage_input_fails() {
        let cipher = TokenCipher::from_secret("k");
        assert!(cipher.decrypt("not base64!").is_err());
        assert!(cipher.decrypt(&STANDARD.encode([0u8; 4])).is_err());
    }

    #[test]
    fn signature_verifies() {
        let sig = sign("secret", "payload");
        assert!(verify("secret", "payload", &sig));
        assert!(!verify("secret", "payload2", &sig));
        assert!(!verify("other", "payload", &sig));
        assert!(!verify("secret", "payload", "%%%"));
    }

    #[test]
    fn random_token_has_requested_length() {
        let token = random_token(24);
        assert_eq!(token.len(), 24);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
