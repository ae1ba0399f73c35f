//! Error types for eventdesk
//!
//! This module defines the error type shared by the record codec and every
//! document store backend built on top of it.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use thiserror::Error;

/// Result type alias for eventdesk operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for eventdesk storage
#[derive(Debug, Error)]
pub enum Error {
    /// A write was addressed to a collection that has no backing map
    #[error("collection not initialized: {path}")]
    NotInitialized {
        /// Path of the collection the write was addressed to
        path: String,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Caller supplied input that cannot be stored or queried
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Credentials or project settings could not be resolved
    #[error("Credentials error: {0}")]
    Credentials(String),

    /// The hosted database could not be reached
    #[error("Transport error: {0}")]
    Transport(String),

    /// The hosted database answered with a non-success status
    #[error("Backend returned {code}: {message}")]
    Status {
        /// HTTP status code
        code: u16,
        /// Response body or status text
        message: String,
    },

    /// The hosted database answered with a payload we could not interpret
    #[error("Protocol error: {0}")]
    Protocol(String),
}

impl Error {
    /// Build a `NotInitialized` error for the given collection path
    pub fn not_initialized(path: impl Into<String>) -> Self {
        Error::NotInitialized { path: path.into() }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
