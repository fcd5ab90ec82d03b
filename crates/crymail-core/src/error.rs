//! Error types for the core library.

use std::path::PathBuf;
use thiserror::Error;

use crate::config::ValidationError;

/// Errors that can occur in core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Message could not be built.
    #[error("MIME error: {0}")]
    Mime(#[from] crymail_mime::Error),

    /// Signing or key handling failed inside OpenSSL.
    #[error("Crypto error: {0}")]
    Crypto(#[from] openssl::error::ErrorStack),

    /// A key file could not be read or written.
    #[error("Key file '{}': {source}", .path.display())]
    KeyFile {
        /// Path of the key file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed.
    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration could not be serialized.
    #[error("Configuration write error: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration failed validation.
    #[error("Invalid configuration: {}", join_messages(.0))]
    Validation(Vec<ValidationError>),

    /// A mail address was missing or unusable.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Transport rejected or could not perform a request.
    #[error("Transport error: {0}")]
    Transport(String),
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ValidationError::message)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
