//! Error types for the request helpers.
//!
//! # Design
//! A finished request ends in one of three ways the caller can tell apart:
//! success (status 200), a server answer with another status (`HttpError`),
//! or a transport failure reported by the host (`Transport`). The remaining
//! variants cover payload encoding and malformed host input.

use thiserror::Error;

/// Errors returned by `PostRequest` and the response helpers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request finished with a status other than 200.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The host could not complete the round-trip.
    #[error("transport failed: {0}")]
    Transport(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The host reported a ready state outside 0..=4.
    #[error("invalid ready state: {0}")]
    InvalidReadyState(u8),

    /// Factory configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),
}
