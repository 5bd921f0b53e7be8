//! Document store client abstraction
//!
//! The session store talks to its backing Cloudant/CouchDB style database
//! through this trait. The wire protocol stays on the other side of the
//! seam; implementations report outcomes as [`DocumentError`] values so
//! callers branch on a typed discriminant instead of status codes.

mod memory;

pub use memory::MemoryDocumentClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::document::SessionDocument;

/// Errors reported by a document store client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// The database or document does not exist
    NotFound,
    /// A stale or missing revision token, or the target already exists
    Conflict,
    /// Rate limiting or connectivity trouble; never retried at this layer
    Unavailable(String),
    /// Any other failure, including malformed responses
    Service { status: u16, message: String },
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentError::NotFound => write!(f, "not found"),
            DocumentError::Conflict => write!(f, "conflict"),
            DocumentError::Unavailable(msg) => write!(f, "service unavailable: {}", msg),
            DocumentError::Service { status, message } => {
                write!(f, "service error ({}): {}", status, message)
            }
        }
    }
}

impl std::error::Error for DocumentError {}

/// A single map-only view inside a design document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewDefinition {
    /// JavaScript map function source
    pub map: String,
}

/// Design document body holding named views
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignDocument {
    pub views: HashMap<String, ViewDefinition>,
}

/// Trait for versioned document store backends
///
/// Modeled on the CRUD+HEAD surface of the Cloudant/CouchDB document API.
/// Documents are versioned: every successful write returns a fresh
/// revision token, and updates and deletes must present the current one
/// or fail with [`DocumentError::Conflict`].
#[async_trait]
pub trait DocumentClient: Send + Sync + 'static {
    /// Create a database
    ///
    /// Returns `Conflict` if the database already exists.
    async fn create_database(&self, db: &str) -> Result<(), DocumentError>;

    /// Create a design document in a database
    ///
    /// Returns `Conflict` if the design document already exists.
    async fn put_design_document(
        &self,
        db: &str,
        ddoc: &str,
        design: &DesignDocument,
    ) -> Result<(), DocumentError>;

    /// Fetch a document by id
    ///
    /// The returned document carries its current revision token.
    async fn get_document(&self, db: &str, id: &str) -> Result<SessionDocument, DocumentError>;

    /// Probe a document's current revision token without fetching the body
    async fn head_document(&self, db: &str, id: &str) -> Result<String, DocumentError>;

    /// Write a document and return its new revision token
    ///
    /// `doc.rev` must carry the current revision when the document already
    /// exists, and must be None when it does not.
    async fn put_document(&self, db: &str, doc: &SessionDocument) -> Result<String, DocumentError>;

    /// Delete a document at a specific revision
    async fn delete_document(&self, db: &str, id: &str, rev: &str) -> Result<(), DocumentError>;
}
