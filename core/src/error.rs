//! Error types for the todo API client.
//!
//! # Design
//! The store itself never reports errors: unusable input just comes back as
//! an unchanged list. Everything here is about the round trip failing, i.e.
//! no usable snapshot arrived. `NotFound` still gets its own variant since a
//! 404 means the base URL is wrong rather than the server misbehaving.

use thiserror::Error;

/// Errors returned by `TodoClient` and `MutationClient`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404; nothing is mounted at the todo route.
    #[error("resource not found")]
    NotFound,

    /// The server returned a status other than 200 or 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into a snapshot.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// No response was received at all.
    #[error("transport failed: {0}")]
    Transport(String),
}
