//! Error types for the mapping engine.

use propmap_codec::CodecError;
use thiserror::Error;

/// Failure of a single value conversion (default string conversion or a
/// [`Converter`](crate::Converter)).
///
/// Carries only the reason; the engine wraps it in
/// [`PropmapError::Conversion`] together with the key, type and field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ConversionError {
    message: String,
}

impl ConversionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors raised by schema resolution, marshalling and unmarshalling.
#[derive(Debug, Error)]
pub enum PropmapError {
    /// Two fields of one type resolve to the same external key.
    #[error("multiple definitions for property '{key}' in {type_name}")]
    DuplicateField { key: String, type_name: String },

    /// The key has no `.` after the root, or an empty instance segment.
    #[error("cannot extract instance name from '{key}' for {type_name}")]
    MissingInstanceName { key: String, type_name: String },

    /// The key has nothing after the instance segment.
    #[error("cannot extract field name from '{key}' for {type_name}")]
    MissingFieldName { key: String, type_name: String },

    /// An in-namespace key names a field the type does not declare.
    #[error("no field found for property '{key}' in {type_name}")]
    NoSuchField { key: String, type_name: String },

    /// An instance name that cannot be written as a single key segment.
    #[error("invalid instance name '{name}' for {type_name}: must be non-empty and contain no '.'")]
    InvalidInstanceName { name: String, type_name: String },

    /// A field value could not be converted to or from text.
    #[error("cannot convert field '{field}' of {type_name} (property '{key}'): {source}")]
    Conversion {
        key: String,
        type_name: String,
        field: String,
        source: ConversionError,
    },

    /// The byte source or sink failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The properties text could not be decoded.
    #[error("codec error: {0}")]
    Codec(CodecError),

    /// The configuration file is not valid TOML for [`PropmapConfig`](crate::PropmapConfig).
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}

impl From<CodecError> for PropmapError {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::Io(io) => Self::Io(io),
            other => Self::Codec(other),
        }
    }
}

/// Result type for mapping operations.
pub type PropmapResult<T> = Result<T, PropmapError>;
