//! [`SharedSecret`] and the [`DerivedKey`] hashed from it.

use sha2::{Digest, Sha256};
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use super::KEY_LEN;

/// Errors produced while preparing key material.
#[derive(Debug, Error)]
pub enum KeyError {
    /// The shared secret was empty or whitespace only.
    #[error("shared secret is required and must not be empty")]
    EmptySecret,
}

/// Pre-agreed secret string, identical on client and server.
///
/// Read once at startup and never transmitted. The string is wiped on drop.
#[derive(Clone)]
pub struct SharedSecret(Zeroizing<String>);

impl SharedSecret {
    /// Wrap a secret string.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::EmptySecret`] if `secret` is empty or only whitespace.
    pub fn new(secret: impl Into<String>) -> Result<Self, KeyError> {
        let mut secret = secret.into();
        if secret.trim().is_empty() {
            secret.zeroize();
            return Err(KeyError::EmptySecret);
        }
        Ok(Self(Zeroizing::new(secret)))
    }
}

impl ZeroizeOnDrop for SharedSecret {}

impl std::fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SharedSecret([REDACTED])")
    }
}

/// 256-bit AES key derived from a [`SharedSecret`].
///
/// The bytes are only reachable from the `crypto` module, so the key can be
/// used for AES-256-CBC and nothing else. The buffer is wiped on drop.
pub struct DerivedKey {
    bytes: Box<[u8; KEY_LEN]>,
}

impl DerivedKey {
    pub(super) fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

impl Drop for DerivedKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl ZeroizeOnDrop for DerivedKey {}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DerivedKey([REDACTED])")
    }
}

/// Derive the AES-256 key: a single SHA-256 pass over the UTF-8 secret.
///
/// No salt and no stretching. The secret is a shared configuration value, not
/// a user password, and the counterpart derives its key the same way.
pub fn derive_key(secret: &SharedSecret) -> DerivedKey {
    let mut digest = Sha256::digest(secret.0.as_bytes());
    let mut bytes = Box::new([0u8; KEY_LEN]);
    bytes.copy_from_slice(&digest);
    digest.as_mut_slice().zeroize();
    DerivedKey { bytes }
}
