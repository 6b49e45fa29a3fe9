//! Common types, wire definitions, and errors shared across the weather client crates.

pub mod error;
pub mod protocol;

pub use error::ClientError;
