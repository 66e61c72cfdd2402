//! Session: the master key's home for the lifetime of a login
//!
//! An explicit context object, passed to whatever layer needs to encrypt
//! or decrypt, instead of an ambient global store. Two states:
//!
//! ```text
//! Locked ──register(password)──▶ Unlocked(MK)   (fresh MK, wrapped for the server)
//! Locked ──unlock(password, salt, wrapped)──▶ Unlocked(MK)
//! Unlocked ──lock()──▶ Locked                   (MK zeroized)
//! ```
//!
//! The KEK derived inside `register`/`unlock` lives only for the duration
//! of that call. The master key is never serialized and never written to
//! durable storage by this type; a "remember me" feature may persist the
//! authentication flag, but after a reload the session starts `Locked`
//! and content stays unreadable until the password is supplied again.

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;
use uuid::Uuid;

use sealnote_core::{CryptoError, RegistrationKeys, Result};

use crate::field;
use crate::kdf::{derive_key, KdfParams};
use crate::keys::{generate_master_key, unwrap_master_key, wrap_master_key, MasterKey};
use crate::tree;

/// Holds the in-memory master key between login and logout.
#[derive(Debug, Default)]
pub struct Session {
    master_key: Option<MasterKey>,
    params: KdfParams,
}

impl Session {
    /// A locked session with production KDF parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// A locked session with explicit KDF parameters (tests lower the
    /// iteration count; production code should not).
    pub fn with_params(params: KdfParams) -> Self {
        Self {
            master_key: None,
            params,
        }
    }

    /// Register: generate a fresh master key and a random per-user salt,
    /// wrap the key under the password-derived KEK, and unlock the
    /// session. The returned salt and wrapped blob go into the server's
    /// user record; neither reveals anything without the password.
    pub async fn register(&mut self, password: &SecretString) -> Result<RegistrationKeys> {
        let mk = generate_master_key();
        let salt = Uuid::new_v4().to_string();

        let kek = self.derive_kek(password, &salt).await?;
        let wrapped_master_key = wrap_master_key(&mk, &kek)?;

        self.master_key = Some(mk);
        debug!("session unlocked (registration)");

        Ok(RegistrationKeys {
            salt,
            wrapped_master_key,
        })
    }

    /// Login: re-derive the KEK from the password and the stored salt,
    /// unwrap the stored master key, and unlock the session. A wrong
    /// password surfaces as [`CryptoError::Unwrap`].
    pub async fn unlock(
        &mut self,
        password: &SecretString,
        salt: &str,
        wrapped_master_key: &str,
    ) -> Result<()> {
        let kek = self.derive_kek(password, salt).await?;
        let mk = unwrap_master_key(wrapped_master_key, &kek)?;

        self.master_key = Some(mk);
        debug!("session unlocked");
        Ok(())
    }

    /// Logout: discard the master key (zeroized on drop). Clones handed
    /// out earlier by [`master_key`](Self::master_key) stay valid, so
    /// in-flight decryption finishes with the key it captured.
    pub fn lock(&mut self) {
        self.master_key = None;
        debug!("session locked");
    }

    pub fn is_unlocked(&self) -> bool {
        self.master_key.is_some()
    }

    /// A captured copy of the session master key, or
    /// [`CryptoError::NotAuthenticated`] when locked.
    pub fn master_key(&self) -> Result<MasterKey> {
        self.master_key
            .clone()
            .ok_or(CryptoError::NotAuthenticated)
    }

    /// Encrypt one field, failing fast with
    /// [`CryptoError::NotAuthenticated`] when no master key is present
    /// (expired session, reloaded page) rather than attempting
    /// encryption with an absent key.
    pub fn encrypt_field(&self, plaintext: &str) -> Result<String> {
        let mk = self
            .master_key
            .as_ref()
            .ok_or(CryptoError::NotAuthenticated)?;
        field::encrypt_field(plaintext, mk)
    }

    /// Decrypt one field, failing fast when locked.
    pub fn decrypt_field(&self, blob: &str) -> Result<String> {
        let mk = self
            .master_key
            .as_ref()
            .ok_or(CryptoError::NotAuthenticated)?;
        field::decrypt_field(blob, mk)
    }

    /// Decrypt a whole folder tree, failing fast when locked. Per-field
    /// failures inside the tree are isolated, not fatal; see
    /// [`tree::decrypt_folder_tree`](crate::tree::decrypt_folder_tree).
    pub async fn decrypt_folder_tree(
        &self,
        tree: sealnote_core::FolderTree,
    ) -> Result<tree::DecryptedFolderTree> {
        let mk = self.master_key()?;
        Ok(tree::decrypt_folder_tree(tree, &mk).await)
    }

    /// Decrypt and assemble the tag hierarchy, failing fast when locked.
    pub async fn decrypt_tag_tree(
        &self,
        tags: Vec<sealnote_core::Tag>,
    ) -> Result<tree::DecryptedTags> {
        let mk = self.master_key()?;
        Ok(tree::decrypt_tag_tree(tags, &mk).await)
    }

    /// PBKDF2 is deliberately slow; run it off the async executor.
    async fn derive_kek(&self, password: &SecretString, salt: &str) -> Result<crate::kdf::Kek> {
        let password = SecretString::from(password.expose_secret().to_owned());
        let salt = salt.to_string();
        let params = self.params.clone();

        tokio::task::spawn_blocking(move || derive_key(&password, &salt, &params))
            .await
            .map_err(|e| CryptoError::KeyDerivation(format!("KDF task failed: {e}")))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_session() -> Session {
        Session::with_params(KdfParams { iterations: 10 })
    }

    #[tokio::test]
    async fn locked_session_fails_fast() {
        let session = Session::new();

        assert!(!session.is_unlocked());
        assert!(matches!(
            session.encrypt_field("anything"),
            Err(CryptoError::NotAuthenticated)
        ));
        assert!(matches!(
            session.decrypt_field("anything"),
            Err(CryptoError::NotAuthenticated)
        ));
        assert!(matches!(
            session.master_key(),
            Err(CryptoError::NotAuthenticated)
        ));
    }

    #[tokio::test]
    async fn register_then_relogin_restores_content_access() {
        let password = SecretString::from("hunter2, but longer");

        let mut session = test_session();
        let keys = session.register(&password).await.unwrap();
        let blob = session.encrypt_field("first note").unwrap();

        // Fresh session, as after a page reload
        let mut relogin = test_session();
        assert!(matches!(
            relogin.decrypt_field(&blob),
            Err(CryptoError::NotAuthenticated)
        ));

        relogin
            .unlock(&password, &keys.salt, &keys.wrapped_master_key)
            .await
            .unwrap();

        assert_eq!(relogin.decrypt_field(&blob).unwrap(), "first note");
    }

    #[tokio::test]
    async fn wrong_password_is_unwrap_error() {
        let mut session = test_session();
        let keys = session
            .register(&SecretString::from("right password"))
            .await
            .unwrap();

        let mut relogin = test_session();
        let result = relogin
            .unlock(
                &SecretString::from("wrong password"),
                &keys.salt,
                &keys.wrapped_master_key,
            )
            .await;

        assert!(matches!(result, Err(CryptoError::Unwrap)));
        assert!(!relogin.is_unlocked());
    }

    #[tokio::test]
    async fn lock_discards_key_but_not_captured_copies() {
        let mut session = test_session();
        session
            .register(&SecretString::from("password"))
            .await
            .unwrap();

        let blob = session.encrypt_field("in flight").unwrap();
        let captured = session.master_key().unwrap();

        session.lock();
        assert!(matches!(
            session.decrypt_field(&blob),
            Err(CryptoError::NotAuthenticated)
        ));

        // The captured key is an immutable value, not a live reference to
        // session state: work that grabbed it before logout completes.
        assert_eq!(
            crate::field::decrypt_field(&blob, &captured).unwrap(),
            "in flight"
        );
    }

    #[tokio::test]
    async fn salts_are_unique_per_registration() {
        let password = SecretString::from("same password");

        let mut s1 = test_session();
        let mut s2 = test_session();
        let k1 = s1.register(&password).await.unwrap();
        let k2 = s2.register(&password).await.unwrap();

        assert_ne!(k1.salt, k2.salt);
        assert_ne!(k1.wrapped_master_key, k2.wrapped_master_key);
    }
}
