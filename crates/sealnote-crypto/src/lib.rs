//! sealnote-crypto: client-side zero-knowledge encryption for sealnote
//!
//! The server stores notes, folder trees, and tags without ever seeing
//! plaintext or long-term key material. Everything sensitive is encrypted
//! on the client before it leaves the session.
//!
//! Key hierarchy:
//! ```text
//! Password + per-user salt
//!   └── KEK (256-bit, PBKDF2-HMAC-SHA256, 100k iterations)
//!         └── wraps → Master Key (256-bit random, generated at registration)
//!               └── Field AEAD: AES-256-GCM (nonce=random_96bit)
//!                     note titles, note bodies, tag names
//! ```
//!
//! The KEK exists only for the duration of a login/registration; the master
//! key is persisted server-side exclusively in wrapped form and lives in a
//! [`Session`] for the duration of an authenticated session.
//!
//! Wire format for every blob, field or wrapped key:
//! `base64(nonce[12] || ciphertext || tag[16])`.

mod encoding;

pub mod field;
pub mod kdf;
pub mod keys;
pub mod session;
pub mod tree;

pub use field::{decrypt_field, encrypt_field};
pub use kdf::{derive_key, KdfParams, Kek};
pub use keys::{generate_master_key, unwrap_master_key, wrap_master_key, MasterKey};
pub use session::Session;
pub use tree::{
    decrypt_folder_tree, decrypt_tag_tree, encrypt_note_create, encrypt_note_update,
    encrypt_tag_create, encrypt_tag_update, DecryptedFolderTree, DecryptedTags, EntityKind,
    FieldFailure,
};

pub use sealnote_core::{CryptoError, Result};

/// Size of a symmetric key in bytes (256-bit)
pub const KEY_SIZE: usize = 32;

/// Size of an AES-GCM nonce (96-bit)
pub const NONCE_SIZE: usize = 12;

/// Size of a GCM authentication tag
pub const TAG_SIZE: usize = 16;
