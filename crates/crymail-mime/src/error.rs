//! Error types for MIME operations.

/// Result type alias for MIME operations.
pub type Result<T> = std::result::Result<T, Error>;

/// MIME error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Header value that cannot be written to a message.
    #[error("Invalid MIME header: {0}")]
    InvalidHeader(String),

    /// A signature was attached but holds no bytes.
    #[error("Signature is empty")]
    EmptySignature,

    /// Invalid content type.
    #[error("Invalid content type: {0}")]
    InvalidContentType(String),

    /// Base64 input whose length is not a multiple of four.
    #[error("Invalid base64 length: {0} is not a multiple of 4")]
    InvalidBase64Length(usize),

    /// Base64 decode error.
    #[error("Base64 decode error: {0}")]
    Base64Decode(#[from] base64::DecodeError),
}
