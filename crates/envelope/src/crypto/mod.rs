//! AES-256-CBC primitives and shared-secret key derivation.
//!
//! # Ciphertext format
//!
//! ```text
//! base64(AES-256-CBC(key = SHA-256(secret), iv = 0^16, PKCS#7(json)))
//! ```
//!
//! There is no version prefix, nonce, or MAC on the wire; the counterpart
//! expects exactly this framing.

pub mod cipher;
pub mod key;

pub use cipher::{BLOCK_LEN, KEY_LEN};
