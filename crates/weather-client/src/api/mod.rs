//! Request client for the weather/auth API.
//!
//! # Responsibilities
//! - Seal each outgoing payload into an envelope and send it (POST body or GET query).
//! - Map the plaintext failure channel of responses to [`common::ClientError::Rejected`].
//! - Open the `data` envelope of successful responses.
//!
//! Retry policy, if any, belongs to callers; nothing here retries.

pub mod auth;
pub mod client;
pub mod weather;

#[cfg(test)]
pub(crate) mod testing;

pub use auth::AuthService;
pub use client::ApiClient;
pub use weather::WeatherService;
