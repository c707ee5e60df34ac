//! Error taxonomy for every imaging operation.
//!
//! Every failure is local to the call that raised it. Nothing is retried and
//! no operation leaves a half-written buffer behind: argument validation runs
//! before any allocation.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImageError {
    /// Requested output format or file extension is not registered.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Input does not carry a known image signature, or the file is missing.
    /// The message tells the two cases apart.
    #[error("{0}")]
    UnknownImageFormat(String),

    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// A dimension was given as neither an integer nor a `NN%` percentage.
    #[error("Expected dimension as integer or percentage, '{0}' given")]
    InvalidDimensionType(String),

    /// The codec recognized the header but rejected the payload.
    #[error("Decode failed: {0}")]
    DecodeError(String),

    /// The codec failed to produce output bytes.
    #[error("Encode failed: {0}")]
    EncodeError(String),

    /// The codec for this format is not compiled into the binary.
    #[error("Imaging capability unavailable: {0}")]
    CapabilityUnavailable(String),

    /// A named operation was called with arguments of the wrong shape.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Call to undefined operation {name}(){}", suggestion_hint(.suggestion))]
    UnsupportedOperation {
        name: String,
        suggestion: Option<String>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn suggestion_hint(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(", did you mean {s}()?"),
        None => ".".to_string(),
    }
}

impl ImageError {
    pub fn invalid_dimensions(msg: impl Into<String>) -> Self {
        Self::InvalidDimensions(msg.into())
    }

    pub fn decode(msg: impl std::fmt::Display) -> Self {
        Self::DecodeError(msg.to_string())
    }

    pub fn encode(msg: impl std::fmt::Display) -> Self {
        Self::EncodeError(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ImageError>;
