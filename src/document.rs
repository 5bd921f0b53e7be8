//! Persisted session document and its codec
//!
//! The document layout matches the Node.js connect cloudant store:
//! `session_ttl` seconds and a `session_modified` epoch-millisecond stamp
//! stored next to the flattened session fields, so documents written by
//! either implementation are interchangeable.

use serde::{Deserialize, Serialize};

use crate::session::SessionData;

/// A session as stored in the document database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionDocument {
    /// Storage key: `prefix + session_id`
    #[serde(rename = "_id")]
    pub id: String,

    /// Revision token assigned by the store; None only before the first write
    #[serde(rename = "_rev", skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,

    /// TTL in effect for this document at last write, in seconds
    pub session_ttl: u64,

    /// Last write time in epoch milliseconds, stamped by the store
    pub session_modified: i64,

    /// The session payload, flattened at the same level as the metadata
    #[serde(flatten)]
    pub session: SessionData,
}

impl SessionDocument {
    /// Encode a session for storage
    ///
    /// The payload is cloned so the persisted snapshot is frozen here;
    /// the caller may keep mutating its live session afterwards. `rev` is
    /// left unset for the store to thread through.
    pub fn from_session(
        id: impl Into<String>,
        session: &SessionData,
        ttl_secs: u64,
        now_ms: i64,
    ) -> Self {
        Self {
            id: id.into(),
            rev: None,
            session_ttl: ttl_secs,
            session_modified: now_ms,
            session: session.clone(),
        }
    }

    /// Decode back to the middleware-facing session, dropping storage metadata
    pub fn into_session(self) -> SessionData {
        self.session
    }
}
