//! Error types for the codec crate.

use thiserror::Error;

/// Errors raised while reading or writing properties text.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The underlying reader or writer failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A `\uXXXX` escape without exactly four hex digits.
    #[error("malformed \\uXXXX escape on line {line}")]
    MalformedEscape { line: usize },

    /// Escapes decoding to an unpaired UTF-16 surrogate.
    #[error("unpaired surrogate escape on line {line}")]
    UnpairedSurrogate { line: usize },
}

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;
