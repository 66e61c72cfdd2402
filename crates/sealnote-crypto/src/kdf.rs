//! Key derivation: password + per-user salt → key-encryption-key (KEK)
//!
//! PBKDF2-HMAC-SHA256 with a deliberately expensive iteration count. The
//! KEK never encrypts content; it only wraps and unwraps the master key,
//! and it never outlives the login/registration call that derived it.

use pbkdf2::pbkdf2_hmac;
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use zeroize::Zeroize;

use sealnote_core::{CryptoError, Result};

use crate::KEY_SIZE;

/// A 256-bit key-encryption-key derived from the user's password.
///
/// Zeroized on drop. The raw bytes are crate-private: a KEK is usable only
/// by [`wrap_master_key`](crate::wrap_master_key) and
/// [`unwrap_master_key`](crate::unwrap_master_key), never for general
/// encryption and never exportable through the public API.
pub struct Kek {
    bytes: [u8; KEY_SIZE],
}

impl Kek {
    pub(crate) fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    pub(crate) fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl Drop for Kek {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl std::fmt::Debug for Kek {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Kek").field("bytes", &"[REDACTED]").finish()
    }
}

/// PBKDF2 parameters.
#[derive(Debug, Clone)]
pub struct KdfParams {
    /// Iteration count (default: 100 000)
    pub iterations: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            iterations: 100_000,
        }
    }
}

/// Derive a KEK from a password and the per-user salt.
///
/// Deterministic: the same `(password, salt)` pair always yields the same
/// KEK, which is what lets a fresh login unwrap a master key wrapped in an
/// earlier session. The salt comes from the server's user record; it is
/// public but unique per user.
pub fn derive_key(password: &SecretString, salt: &str, params: &KdfParams) -> Result<Kek> {
    if password.expose_secret().is_empty() {
        return Err(CryptoError::KeyDerivation("empty password".into()));
    }
    if salt.is_empty() {
        return Err(CryptoError::KeyDerivation("empty salt".into()));
    }
    if params.iterations == 0 {
        return Err(CryptoError::KeyDerivation(
            "iteration count must be non-zero".into(),
        ));
    }

    let mut key = [0u8; KEY_SIZE];
    pbkdf2_hmac::<Sha256>(
        password.expose_secret().as_bytes(),
        salt.as_bytes(),
        params.iterations,
        &mut key,
    );

    Ok(Kek::from_bytes(key))
}
