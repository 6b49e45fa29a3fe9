//! Consumer-facing error taxonomy for the request client.

use thiserror::Error;

/// Message reported for every failure to open a response envelope.
pub const DECRYPT_FAILED_MESSAGE: &str = "failed to decrypt data";

/// Top-level client error type.
///
/// Each variant has a stable machine-readable code (see [`ClientError::code`]):
/// - [`ClientError::Configuration`] → `configuration_error`
/// - [`ClientError::Encoding`] → `encoding_error`
/// - [`ClientError::Decrypt`] → `decrypt_error`
/// - [`ClientError::Transport`] → `transport_error`
/// - [`ClientError::Rejected`] → `rejected`
#[derive(Debug, Error)]
pub enum ClientError {
    /// The shared secret or another startup setting is missing or invalid.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The outgoing payload could not be serialised to JSON.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// A response envelope could not be opened.
    ///
    /// Carries no cause: malformed ciphertext, a wrong key, and tampering all
    /// look the same from here.
    #[error("{}", DECRYPT_FAILED_MESSAGE)]
    Decrypt,

    /// The network layer failed or the server replied with something that is
    /// not an envelope response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered `success: false` with a plaintext reason.
    #[error("{0}")]
    Rejected(String),
}

impl ClientError {
    /// Returns the stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            ClientError::Configuration(_) => "configuration_error",
            ClientError::Encoding(_) => "encoding_error",
            ClientError::Decrypt => "decrypt_error",
            ClientError::Transport(_) => "transport_error",
            ClientError::Rejected(_) => "rejected",
        }
    }

    /// Returns `true` if the failure happened before or outside the envelope layer.
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport(_))
    }
}
