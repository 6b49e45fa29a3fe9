//! [`EnvelopeCodec`]: JSON payload ⇄ base64 ciphertext.
//!
//! # Failure reporting
//!
//! Opening an envelope can fail at three stages (see [`OpenStage`]). The stage
//! is kept in [`OpenError`] for debugging, but [`EnvelopeCodec::open_envelope`]
//! reports every failure as the single [`EnvelopeError::Decrypt`]. Telling a
//! caller whether padding or parsing failed would give an attacker a padding
//! oracle against the unauthenticated CBC ciphertext.

use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use common::protocol::EnvelopeRequest;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::crypto::cipher::{self, CipherError};
use crate::crypto::key::{derive_key, DerivedKey, SharedSecret};

/// Consumer-facing codec errors.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    /// The payload could not be serialised to JSON.
    #[error("failed to encode payload: {0}")]
    Encoding(#[source] serde_json::Error),

    /// The envelope could not be opened. The cause is deliberately dropped.
    #[error("failed to decrypt data")]
    Decrypt,
}

/// The stage at which opening an envelope failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenStage {
    /// Invalid base64 or invalid UTF-8.
    Decode,
    /// Bad ciphertext length or bad padding.
    Decrypt,
    /// Malformed JSON.
    Parse,
}

impl OpenStage {
    pub fn as_str(self) -> &'static str {
        match self {
            OpenStage::Decode => "decode",
            OpenStage::Decrypt => "decrypt",
            OpenStage::Parse => "parse",
        }
    }
}

/// Detailed open failure. Never crosses the client boundary.
#[derive(Debug, Error)]
pub enum OpenError {
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error(transparent)]
    Cipher(#[from] CipherError),

    #[error("plaintext is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("plaintext is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl OpenError {
    /// Which stage produced this error.
    pub fn stage(&self) -> OpenStage {
        match self {
            OpenError::Base64(_) | OpenError::Utf8(_) => OpenStage::Decode,
            OpenError::Cipher(_) => OpenStage::Decrypt,
            OpenError::Json(_) => OpenStage::Parse,
        }
    }
}

/// Seals and opens envelopes under one [`DerivedKey`].
///
/// The key is derived once in [`EnvelopeCodec::new`] and shared immutably, so
/// clones are cheap and concurrent use needs no locking.
#[derive(Clone, Debug)]
pub struct EnvelopeCodec {
    key: Arc<DerivedKey>,
}

impl EnvelopeCodec {
    /// Derive the key from `secret` and build a codec around it.
    pub fn new(secret: &SharedSecret) -> Self {
        Self {
            key: Arc::new(derive_key(secret)),
        }
    }

    /// Serialise `payload` to JSON, encrypt it, and base64-encode the result.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::Encoding`] if `payload` cannot be serialised
    /// (for example a map with non-string keys).
    pub fn seal_envelope<T>(&self, payload: &T) -> Result<String, EnvelopeError>
    where
        T: Serialize + ?Sized,
    {
        let json = serde_json::to_string(payload).map_err(EnvelopeError::Encoding)?;
        let ciphertext = cipher::encrypt(&self.key, json.as_bytes());
        Ok(STANDARD.encode(ciphertext))
    }

    /// Seal `payload` into an [`EnvelopeRequest`] ready to send.
    pub fn seal_request<T>(&self, payload: &T) -> Result<EnvelopeRequest, EnvelopeError>
    where
        T: Serialize + ?Sized,
    {
        self.seal_envelope(payload).map(EnvelopeRequest::new)
    }

    /// Open an envelope, keeping the failing stage.
    ///
    /// Prefer [`EnvelopeCodec::open_envelope`] anywhere the error may reach a
    /// caller outside this process.
    pub fn open_detailed(&self, ciphertext: &str) -> Result<serde_json::Value, OpenError> {
        let bytes = STANDARD.decode(ciphertext)?;
        let plaintext = cipher::decrypt(&self.key, &bytes)?;
        let text = String::from_utf8(plaintext)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Open an envelope, collapsing every failure into [`EnvelopeError::Decrypt`].
    pub fn open_envelope(&self, ciphertext: &str) -> Result<serde_json::Value, EnvelopeError> {
        self.open_detailed(ciphertext).map_err(collapse)
    }

    /// Open an envelope and deserialise it as `T`.
    ///
    /// A payload that is valid JSON but the wrong shape for `T` is reported
    /// the same way as any other open failure.
    pub fn open_as<T: DeserializeOwned>(&self, ciphertext: &str) -> Result<T, EnvelopeError> {
        let value = self.open_envelope(ciphertext)?;
        serde_json::from_value(value).map_err(|e| {
            debug!(stage = "shape", error = %e, "envelope payload has unexpected shape");
            EnvelopeError::Decrypt
        })
    }
}

fn collapse(err: OpenError) -> EnvelopeError {
    debug!(stage = err.stage().as_str(), error = %err, "failed to open envelope");
    EnvelopeError::Decrypt
}
