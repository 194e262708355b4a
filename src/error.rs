//! Error handling for the chainmap library
//!
//! Absence of a key is never an error. The error type only covers keys that
//! cannot be canonically serialized and configuration problems.

use thiserror::Error;

/// Main error type for the chainmap library
#[derive(Error, Debug)]
pub enum ChainMapError {
    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A key or value has no canonical serialization
    #[error("Unserializable {item}: {message}")]
    Unserializable {
        /// What failed to serialize, `"key"` or `"value"`
        item: &'static str,
        /// Error message from the serializer
        message: String,
    },

    /// Configuration or parameter errors
    #[error("Invalid configuration: {message}")]
    Configuration {
        /// Configuration error message
        message: String,
    },
}

impl ChainMapError {
    /// Create an unserializable key error
    pub fn unserializable<S: Into<String>>(message: S) -> Self {
        Self::Unserializable { item: "key", message: message.into() }
    }

    /// Create an unserializable value error
    pub fn unserializable_value<S: Into<String>>(message: S) -> Self {
        Self::Unserializable { item: "value", message: message.into() }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration { message: message.into() }
    }

    /// Check if this is a recoverable error
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Io(_) => true,
            Self::Unserializable { .. } => false,
            Self::Configuration { .. } => false,
        }
    }

    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Unserializable { .. } => "serialization",
            Self::Configuration { .. } => "config",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, ChainMapError>;
