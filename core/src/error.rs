//! Error types for the contacts API client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers distinguish "the
//! contact does not exist" from "the server returned an unexpected status."
//! All other non-2xx responses land in `Http` with the raw status code and
//! body for debugging. Transport-level failures (connection refused, DNS,
//! timeouts) are kept apart from HTTP failures so the availability probe can
//! report them without inspecting strings.

use thiserror::Error;

use crate::types::ContactId;

/// Errors returned by `ContactClient` parse methods and `Transport`s.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The request never produced a response.
    #[error("transport failed: {0}")]
    Transport(String),

    /// No response arrived within the allotted time.
    #[error("request timed out after {0} ms")]
    Timeout(u128),

    /// The server answered with a contact that fails the contact schema.
    #[error("server returned an invalid contact {id}: {reason}")]
    InvalidContact { id: ContactId, reason: String },

    /// The server answered with an id other than the one requested, or a
    /// list that repeats an id.
    #[error("server returned conflicting id {0}")]
    ConflictingId(ContactId),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

/// Errors raised while reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}
