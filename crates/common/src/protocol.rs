//! Envelope wire types exchanged with the weather/auth API.
//!
//! Request bodies carry only ciphertext. Responses carry a plaintext
//! `success` flag, an optional ciphertext `data` field, and an optional
//! plaintext failure description in `message` or `error`.

use serde::{Deserialize, Serialize};

/// Name of the ciphertext field in request bodies, response bodies, and GET
/// query strings.
pub const DATA_FIELD: &str = "data";

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// Outgoing envelope: `{"data": "<base64 ciphertext>"}`.
///
/// Serialised as the JSON body of a POST, or as the `data` query parameter of
/// a GET.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeRequest {
    /// Base64 ciphertext of the JSON payload.
    pub data: String,
}

impl EnvelopeRequest {
    /// Wrap an already-sealed ciphertext.
    pub fn new(data: impl Into<String>) -> Self {
        Self { data: data.into() }
    }
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// Incoming response body.
///
/// The failure channel (`message` / `error`) is plaintext; only `data` is
/// encrypted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeResponse {
    /// Whether the server handled the request successfully.
    pub success: bool,
    /// Base64 ciphertext of the JSON result, if the endpoint returns one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    /// Human-readable description, used by most endpoints on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Human-readable description, used by some endpoints instead of `message`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EnvelopeResponse {
    /// A successful response carrying sealed `data`.
    pub fn sealed(data: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data.into()),
            message: None,
            error: None,
        }
    }

    /// A failed response with a plaintext `message`.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
            error: None,
        }
    }

    /// The plaintext failure description, preferring `message` over `error`.
    pub fn failure_message(&self) -> Option<&str> {
        self.message.as_deref().or(self.error.as_deref())
    }
}
