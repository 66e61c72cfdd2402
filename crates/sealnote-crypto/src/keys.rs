//! Master key generation and wrapping
//!
//! The master key is the key that actually encrypts content. It is
//! generated once at registration and persisted server-side only in
//! wrapped form, so the password (and thus the KEK) can change later
//! without re-encrypting every note.
//!
//! Wrapped key format: `base64(nonce[12] || ciphertext || tag)`.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use rand::RngCore;
use zeroize::Zeroize;

use sealnote_core::{CryptoError, Result};

use crate::encoding::{decode_blob, encode_blob};
use crate::kdf::Kek;
use crate::{KEY_SIZE, NONCE_SIZE, TAG_SIZE};

/// The per-user 256-bit content-encryption key.
///
/// Zeroized on drop, redacted in `Debug`, raw bytes crate-private. `Clone`
/// is deliberate: in-flight decryption captures an immutable copy of the
/// key, so a logout that clears the session cannot race with work that
/// already started (captured-key semantics, not live-lookup).
#[derive(Clone)]
pub struct MasterKey {
    bytes: [u8; KEY_SIZE],
}

impl MasterKey {
    pub(crate) fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    pub(crate) fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl Drop for MasterKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MasterKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Generate a fresh random master key. Called exactly once per user, at
/// registration.
pub fn generate_master_key() -> MasterKey {
    let mut bytes = [0u8; KEY_SIZE];
    rand::thread_rng().fill_bytes(&mut bytes);
    MasterKey::from_bytes(bytes)
}

/// Wrap (encrypt) the master key under the KEK.
///
/// Uses AES-256-GCM with a fresh random nonce, so wrapping the same key
/// twice yields different blobs. Never compare wrapped blobs to decide
/// key identity.
pub fn wrap_master_key(mk: &MasterKey, kek: &Kek) -> Result<String> {
    let cipher = Aes256Gcm::new(kek.as_bytes().into());

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    rand::thread_rng().fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, mk.as_bytes().as_ref())
        .map_err(|_| CryptoError::Encoding("key wrap failed".into()))?;

    Ok(encode_blob(&nonce_bytes, &ciphertext))
}

/// Unwrap (decrypt) the master key with the KEK.
///
/// Fails closed: a wrong KEK (wrong password) or a tampered blob yields
/// [`CryptoError::Unwrap`], never a partial or garbage key.
pub fn unwrap_master_key(blob: &str, kek: &Kek) -> Result<MasterKey> {
    let (nonce_bytes, ciphertext) = decode_blob(blob, KEY_SIZE + TAG_SIZE)?;
    let nonce = Nonce::from_slice(&nonce_bytes);
    let cipher = Aes256Gcm::new(kek.as_bytes().into());

    let mut plaintext = cipher
        .decrypt(nonce, ciphertext.as_ref())
        .map_err(|_| CryptoError::Unwrap)?;

    if plaintext.len() != KEY_SIZE {
        plaintext.zeroize();
        return Err(CryptoError::Unwrap);
    }

    let mut key_bytes = [0u8; KEY_SIZE];
    key_bytes.copy_from_slice(&plaintext);
    plaintext.zeroize();

    Ok(MasterKey::from_bytes(key_bytes))
}
