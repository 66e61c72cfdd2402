//! Per-field AES-256-GCM encryption/decryption
//!
//! One blob per sensitive field (note title, note body, tag name):
//! `base64(nonce[12] || ciphertext || tag[16])`. Each blob carries its
//! own random nonce, so equal plaintexts never produce equal blobs.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use rand::RngCore;

use sealnote_core::{CryptoError, Result};

use crate::encoding::{decode_blob, encode_blob};
use crate::keys::MasterKey;
use crate::{NONCE_SIZE, TAG_SIZE};

/// Encrypt a single field under the master key.
pub fn encrypt_field(plaintext: &str, mk: &MasterKey) -> Result<String> {
    let cipher = Aes256Gcm::new(mk.as_bytes().into());

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    rand::thread_rng().fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext.as_bytes())
        .map_err(|_| CryptoError::Encoding("field encryption failed".into()))?;

    Ok(encode_blob(&nonce_bytes, &ciphertext))
}

/// Decrypt a single field blob with the master key.
///
/// Fails closed on a failed tag check ([`CryptoError::Decryption`]); a
/// malformed blob (bad base64, shorter than nonce + tag) is reported as
/// [`CryptoError::Encoding`] before any cryptography runs.
pub fn decrypt_field(blob: &str, mk: &MasterKey) -> Result<String> {
    // An empty plaintext still carries the 16-byte tag.
    let (nonce_bytes, ciphertext) = decode_blob(blob, TAG_SIZE)?;
    let nonce = Nonce::from_slice(&nonce_bytes);
    let cipher = Aes256Gcm::new(mk.as_bytes().into());

    let plaintext = cipher
        .decrypt(nonce, ciphertext.as_ref())
        .map_err(|_| CryptoError::Decryption)?;

    String::from_utf8(plaintext)
        .map_err(|_| CryptoError::Encoding("decrypted field is not valid UTF-8".into()))
}
