//! Session error types

use std::fmt;

use crate::client::DocumentError;

/// Errors that can occur during session operations
#[derive(Debug, Clone)]
pub enum SessionError {
    /// Error from the backing document store
    Store(DocumentError),
    /// Error during serialization/deserialization
    Serialization(String),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Store(e) => write!(f, "Document store error: {}", e),
            SessionError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Store(e) => Some(e),
            SessionError::Serialization(_) => None,
        }
    }
}

impl From<DocumentError> for SessionError {
    fn from(err: DocumentError) -> Self {
        SessionError::Store(err)
    }
}

impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        SessionError::Serialization(err.to_string())
    }
}
