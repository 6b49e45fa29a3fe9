//! Encrypted JSON envelopes under a pre-shared secret.
//!
//! The secret is hashed once into an AES-256 key ([`crypto::key`]); payloads
//! are serialised to JSON, encrypted with AES-256-CBC under a fixed all-zero
//! IV ([`crypto::cipher`]), and carried as standard base64 ([`codec`]).
//!
//! This crate has no HTTP dependencies. The request client wraps it around
//! each network call.

pub mod codec;
pub mod crypto;

pub use codec::{EnvelopeCodec, EnvelopeError, OpenError, OpenStage};
pub use crypto::key::{derive_key, DerivedKey, KeyError, SharedSecret};
