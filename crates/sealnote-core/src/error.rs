use thiserror::Error;

pub type Result<T> = std::result::Result<T, CryptoError>;

/// Failures surfaced by the encryption core.
///
/// Every cryptographic failure is typed so the caller can distinguish
/// "prompt for the password again" (`NotAuthenticated`, `Unwrap`) from
/// "this record is damaged" (`Decryption`, `Encoding`). Nothing is ever
/// swallowed into a generic error-and-log path.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// KDF inputs invalid (empty password or salt) or the underlying
    /// primitive rejected its parameters. Not retryable without fixing
    /// the input.
    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    /// An encrypt/decrypt operation was attempted with no master key in
    /// the session (logged out, or page reloaded without re-auth).
    /// Recoverable by re-authenticating.
    #[error("not authenticated: no master key in session")]
    NotAuthenticated,

    /// Authentication-tag check failed while unwrapping the master key:
    /// wrong password-derived key, or a corrupted wrapped-key blob.
    #[error("master key unwrap failed: wrong key or corrupted blob")]
    Unwrap,

    /// Authentication-tag check failed on a content field: wrong master
    /// key, or tampered/corrupted ciphertext.
    #[error("field decryption failed: wrong key or corrupted ciphertext")]
    Decryption,

    /// Malformed blob encountered before any cryptography ran: bad
    /// base64, a blob shorter than its nonce, or authenticated plaintext
    /// that is not valid UTF-8.
    #[error("malformed cipher blob: {0}")]
    Encoding(String),
}
