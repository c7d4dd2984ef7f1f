//! Error types for redis-model
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Absence of a value is never an error: accessors report it as `None`, zero
//! or an empty collection depending on the data type.

use crate::types::DataType;
use thiserror::Error;

/// Result type alias for redis-model operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for redis-model
#[derive(Debug, Error)]
pub enum Error {
    /// Data-type tag outside the recognized set
    #[error("Unknown data type: {0}")]
    UnknownType(String),

    /// A schema already exists on the type or one of its ancestors
    #[error("Duplicate definition for {type_name}: already defined on {defined_on}")]
    DuplicateDefinition {
        /// Type the registration was attempted on
        type_name: String,
        /// Type in the ancestor chain holding the existing registration
        defined_on: String,
    },

    /// No schema is registered for the type or any of its ancestors
    #[error("No schema registered for {0}")]
    NotRegistered(String),

    /// The resolved schema belongs to another accessor family
    #[error("Data type mismatch for {type_name}: expected {expected}, found {actual}")]
    DataTypeMismatch {
        /// Type being accessed
        type_name: String,
        /// Family the caller asked for
        expected: DataType,
        /// Family the schema declares
        actual: DataType,
    },

    /// Type id not issued by this arena
    #[error("Unknown type id: {0}")]
    UnknownTypeId(usize),

    /// Operation against a key holding the wrong kind of value
    #[error("WRONGTYPE Operation against a key holding the wrong kind of value: {0}")]
    WrongType(String),

    /// Stored value could not be interpreted for the operation
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// Configuration could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport or server failure, passed through unchanged
    #[error("Transport error: {0}")]
    Transport(#[from] redis::RedisError),
}

impl Error {
    /// Check whether this error came from the connection or server
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}
