//! Transport encoding for cipher blobs: `base64(nonce[12] || ciphertext)`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use sealnote_core::{CryptoError, Result};

use crate::NONCE_SIZE;

/// Serialize a nonce + ciphertext pair into a transport-safe string.
pub(crate) fn encode_blob(nonce: &[u8; NONCE_SIZE], ciphertext: &[u8]) -> String {
    let mut combined = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    combined.extend_from_slice(nonce);
    combined.extend_from_slice(ciphertext);
    STANDARD.encode(&combined)
}

/// Split a transport blob back into nonce and ciphertext.
///
/// `min_ciphertext_len` is the smallest ciphertext the caller will accept
/// (the GCM tag alone for an empty field, nonce + key + tag for a wrapped
/// key). Anything shorter is malformed, not merely undecryptable.
pub(crate) fn decode_blob(
    blob: &str,
    min_ciphertext_len: usize,
) -> Result<([u8; NONCE_SIZE], Vec<u8>)> {
    let combined = STANDARD
        .decode(blob)
        .map_err(|e| CryptoError::Encoding(format!("base64 decode: {e}")))?;

    if combined.len() < NONCE_SIZE + min_ciphertext_len {
        return Err(CryptoError::Encoding(format!(
            "blob too short: {} bytes (expected at least {})",
            combined.len(),
            NONCE_SIZE + min_ciphertext_len
        )));
    }

    let (nonce_bytes, ciphertext) = combined.split_at(NONCE_SIZE);
    let mut nonce = [0u8; NONCE_SIZE];
    nonce.copy_from_slice(nonce_bytes);
    Ok((nonce, ciphertext.to_vec()))
}
