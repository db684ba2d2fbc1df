//! Confidentiality vault.
//!
//! Seals serializable records into opaque blobs with AES-256-GCM before they
//! reach the record store, and opens them again on the way out. The cipher
//! key is derived from a fixed shared secret; rotation is out of scope.

use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, KeyInit, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::StoreError;

const NONCE_LEN: usize = 12;

/// On-the-wire shape of a sealed record. The nonce travels with the
/// ciphertext so any holder of the shared secret can open the blob.
#[derive(Debug, Serialize, Deserialize)]
struct SealedBlob {
    nonce_b64: String,
    ciphertext_b64: String,
}

/// Symmetric seal/open of serializable records.
pub struct Vault {
    cipher: Aes256Gcm,
}

impl Vault {
    /// Build a vault from the configured shared secret.
    ///
    /// The AES-256 key is the SHA-256 digest of the secret, so equal secrets
    /// always yield interoperable vaults.
    pub fn new(shared_key: &str) -> Result<Self, StoreError> {
        let digest = Sha256::digest(shared_key.as_bytes());
        let cipher = Aes256Gcm::new_from_slice(digest.as_slice())
            .map_err(|_| StoreError::Crypto("invalid derived key length".to_string()))?;
        Ok(Self { cipher })
    }

    /// Serialize `value` and seal it into an opaque blob.
    pub fn seal<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, StoreError> {
        let plain = serde_json::to_vec(value)?;

        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, plain.as_ref())
            .map_err(|_| StoreError::Crypto("encryption failed".to_string()))?;

        let blob = SealedBlob {
            nonce_b64: BASE64.encode(nonce_bytes),
            ciphertext_b64: BASE64.encode(&ciphertext),
        };
        Ok(serde_json::to_vec(&blob)?)
    }

    /// Open a sealed blob back into its original value.
    pub fn open<T: DeserializeOwned>(&self, sealed: &[u8]) -> Result<T, StoreError> {
        let blob: SealedBlob = serde_json::from_slice(sealed)?;

        let nonce_raw = BASE64
            .decode(blob.nonce_b64.as_bytes())
            .map_err(|e| StoreError::Crypto(format!("invalid nonce encoding: {}", e)))?;
        if nonce_raw.len() != NONCE_LEN {
            return Err(StoreError::Crypto("invalid nonce length".to_string()));
        }
        let ciphertext = BASE64
            .decode(blob.ciphertext_b64.as_bytes())
            .map_err(|e| StoreError::Crypto(format!("invalid ciphertext encoding: {}", e)))?;

        let plain = self
            .cipher
            .decrypt(Nonce::from_slice(&nonce_raw), ciphertext.as_ref())
            .map_err(|_| StoreError::Crypto("decryption failed".to_string()))?;

        Ok(serde_json::from_slice(&plain)?)
    }
}

impl std::fmt::Debug for Vault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vault").finish()
    }
}
