//! In-memory document store client
//!
//! This is primarily for development and testing.
//! It enforces the same revision discipline as the real document store:
//! writes and deletes must present the current revision token.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::{DesignDocument, DocumentClient, DocumentError};
use crate::document::SessionDocument;

#[derive(Default)]
struct Database {
    docs: HashMap<String, SessionDocument>,
    design_docs: HashMap<String, DesignDocument>,
}

/// In-memory document store client
///
/// Warning: not suitable for production use. Documents are lost on
/// restart and are not shared across processes.
pub struct MemoryDocumentClient {
    databases: Arc<RwLock<HashMap<String, Database>>>,
    rev_seq: Arc<AtomicU64>,
}

impl MemoryDocumentClient {
    /// Create a new empty client
    pub fn new() -> Self {
        Self {
            databases: Arc::new(RwLock::new(HashMap::new())),
            rev_seq: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Build the next revision token for a document
    ///
    /// Follows the CouchDB `generation-suffix` shape.
    fn next_rev(&self, prev: Option<&str>) -> String {
        let generation = prev
            .and_then(|rev| rev.split('-').next())
            .and_then(|gen| gen.parse::<u64>().ok())
            .unwrap_or(0)
            + 1;
        let suffix = self.rev_seq.fetch_add(1, Ordering::Relaxed);
        format!("{}-{:08x}", generation, suffix)
    }
}

impl Default for MemoryDocumentClient {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for MemoryDocumentClient {
    fn clone(&self) -> Self {
        Self {
            databases: Arc::clone(&self.databases),
            rev_seq: Arc::clone(&self.rev_seq),
        }
    }
}

#[async_trait]
impl DocumentClient for MemoryDocumentClient {
    async fn create_database(&self, db: &str) -> Result<(), DocumentError> {
        let mut databases = self.databases.write();
        if databases.contains_key(db) {
            return Err(DocumentError::Conflict);
        }
        databases.insert(db.to_string(), Database::default());
        Ok(())
    }

    async fn put_design_document(
        &self,
        db: &str,
        ddoc: &str,
        design: &DesignDocument,
    ) -> Result<(), DocumentError> {
        let mut databases = self.databases.write();
        let database = databases.get_mut(db).ok_or(DocumentError::NotFound)?;
        if database.design_docs.contains_key(ddoc) {
            return Err(DocumentError::Conflict);
        }
        database.design_docs.insert(ddoc.to_string(), design.clone());
        Ok(())
    }

    async fn get_document(&self, db: &str, id: &str) -> Result<SessionDocument, DocumentError> {
        let databases = self.databases.read();
        let database = databases.get(db).ok_or(DocumentError::NotFound)?;
        database
            .docs
            .get(id)
            .cloned()
            .ok_or(DocumentError::NotFound)
    }

    async fn head_document(&self, db: &str, id: &str) -> Result<String, DocumentError> {
        let databases = self.databases.read();
        let database = databases.get(db).ok_or(DocumentError::NotFound)?;
        let doc = database.docs.get(id).ok_or(DocumentError::NotFound)?;
        doc.rev.clone().ok_or(DocumentError::NotFound)
    }

    async fn put_document(&self, db: &str, doc: &SessionDocument) -> Result<String, DocumentError> {
        let mut databases = self.databases.write();
        let database = databases.get_mut(db).ok_or(DocumentError::NotFound)?;

        match database.docs.get(&doc.id) {
            Some(stored) => {
                if doc.rev.is_none() || doc.rev != stored.rev {
                    return Err(DocumentError::Conflict);
                }
            }
            None => {
                if doc.rev.is_some() {
                    return Err(DocumentError::Conflict);
                }
            }
        }

        let rev = self.next_rev(doc.rev.as_deref());
        let mut stored = doc.clone();
        stored.rev = Some(rev.clone());
        database.docs.insert(stored.id.clone(), stored);
        Ok(rev)
    }

    async fn delete_document(&self, db: &str, id: &str, rev: &str) -> Result<(), DocumentError> {
        let mut databases = self.databases.write();
        let database = databases.get_mut(db).ok_or(DocumentError::NotFound)?;
        let stored = database.docs.get(id).ok_or(DocumentError::NotFound)?;
        if stored.rev.as_deref() != Some(rev) {
            return Err(DocumentError::Conflict);
        }
        database.docs.remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionData;

    fn doc(id: &str) -> SessionDocument {
        SessionDocument::from_session(id, &SessionData::default(), 60, 1_000)
    }

    #[tokio::test]
    async fn create_database_twice_conflicts() {
        let client = MemoryDocumentClient::new();
        client.create_database("sessions").await.unwrap();
        assert_eq!(
            client.create_database("sessions").await,
            Err(DocumentError::Conflict)
        );
    }

    #[tokio::test]
    async fn design_document_twice_conflicts() {
        let client = MemoryDocumentClient::new();
        client.create_database("sessions").await.unwrap();
        let design = DesignDocument::default();
        client
            .put_design_document("sessions", "expired", &design)
            .await
            .unwrap();
        assert_eq!(
            client.put_design_document("sessions", "expired", &design).await,
            Err(DocumentError::Conflict)
        );
    }

    #[tokio::test]
    async fn missing_database_and_document_are_not_found() {
        let client = MemoryDocumentClient::new();
        assert_eq!(
            client.get_document("nope", "sess:a").await,
            Err(DocumentError::NotFound)
        );

        client.create_database("sessions").await.unwrap();
        assert_eq!(
            client.head_document("sessions", "sess:a").await,
            Err(DocumentError::NotFound)
        );
    }

    #[tokio::test]
    async fn put_enforces_revision_tokens() {
        let client = MemoryDocumentClient::new();
        client.create_database("sessions").await.unwrap();

        let rev1 = client.put_document("sessions", &doc("sess:a")).await.unwrap();

        // A second write without the current revision is a lost-update attempt
        assert_eq!(
            client.put_document("sessions", &doc("sess:a")).await,
            Err(DocumentError::Conflict)
        );

        let mut stale = doc("sess:a");
        stale.rev = Some("1-ffffffff".to_string());
        assert_eq!(
            client.put_document("sessions", &stale).await,
            Err(DocumentError::Conflict)
        );

        let mut current = doc("sess:a");
        current.rev = Some(rev1.clone());
        let rev2 = client.put_document("sessions", &current).await.unwrap();
        assert_ne!(rev1, rev2);
        assert_eq!(client.head_document("sessions", "sess:a").await.unwrap(), rev2);
    }

    #[tokio::test]
    async fn put_with_revision_for_new_document_conflicts() {
        let client = MemoryDocumentClient::new();
        client.create_database("sessions").await.unwrap();

        let mut phantom = doc("sess:a");
        phantom.rev = Some("1-00000000".to_string());
        assert_eq!(
            client.put_document("sessions", &phantom).await,
            Err(DocumentError::Conflict)
        );
    }

    #[tokio::test]
    async fn delete_requires_current_revision() {
        let client = MemoryDocumentClient::new();
        client.create_database("sessions").await.unwrap();
        let rev = client.put_document("sessions", &doc("sess:a")).await.unwrap();

        assert_eq!(
            client.delete_document("sessions", "sess:a", "1-ffffffff").await,
            Err(DocumentError::Conflict)
        );

        client.delete_document("sessions", "sess:a", &rev).await.unwrap();
        assert_eq!(
            client.get_document("sessions", "sess:a").await,
            Err(DocumentError::NotFound)
        );
    }
}
