//! Error types for the routegen generator.
//!
//! Only failures that happen *around* generation live here. Schema shapes the
//! compiler does not understand are never errors; they degrade to a permissive
//! `z.unknown()` validator instead.

use thiserror::Error;

/// Errors that can occur while fetching, generating, or writing a client.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// The introspection payload is not an array of well-formed operations.
    ///
    /// Raised before any compilation starts and never retried.
    #[error("Invalid introspection payload: {0}")]
    Shape(String),

    /// The introspection endpoint could not be reached, or answered with a
    /// non-success status, on every attempt of the retry budget.
    #[error("Failed to fetch introspection data from '{url}' after {attempts} attempt(s): {message}")]
    Transport {
        url: String,
        attempts: u32,
        message: String,
    },

    /// The introspection payload is not valid JSON.
    #[error("Introspection payload is not valid JSON: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
    },

    /// Failed to read an input file (introspection file or config file).
    #[error("Failed to read '{path}': {source}")]
    ReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Invalid or missing configuration.
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Failed to write output file
    #[error("Failed to write output file '{path}': {source}")]
    WriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience Result type for generator operations.
pub type Result<T> = std::result::Result<T, GeneratorError>;
