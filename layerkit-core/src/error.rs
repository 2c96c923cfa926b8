//! Error types for layerkit

use thiserror::Error;

/// Result type alias for layerkit operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for layerkit
///
/// Absence of a match during traversal is reported with `Option`, never
/// with this type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The receiver does not support the requested operation
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),
}

impl Error {
    /// Create an unsupported operation error with a custom message
    pub fn unsupported<S: Into<String>>(msg: S) -> Self {
        Error::UnsupportedOperation(msg.into())
    }
}
