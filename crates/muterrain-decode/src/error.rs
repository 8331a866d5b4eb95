//! Error types for decoding operations.

use std::fmt;

/// Errors that can occur while decoding terrain and texture files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Decrypted buffer is shorter than the fixed payload it must carry.
    TooSmall { expected: usize, actual: usize },
    /// Attribute buffer length matches neither the word nor the byte layout.
    UnsupportedAttributeLayout { len: usize, grid_size: usize },
    /// Invalid data format or structure.
    InvalidFormat {
        context: &'static str,
        detail: String,
    },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooSmall { expected, actual } => {
                write!(
                    f,
                    "buffer too small: expected at least {expected} bytes, got {actual}"
                )
            }
            Self::UnsupportedAttributeLayout { len, grid_size } => {
                write!(
                    f,
                    "unsupported attribute layout: {len} bytes for a {grid_size}x{grid_size} grid"
                )
            }
            Self::InvalidFormat { context, detail } => {
                write!(f, "invalid format in {context}: {detail}")
            }
        }
    }
}

impl std::error::Error for DecodeError {}

/// Result type for decoding operations.
pub type DecodeResult<T> = Result<T, DecodeError>;
