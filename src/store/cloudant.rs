//! Cloudant/CouchDB session store
//!
//! Each session lives in one document at `prefix + session_id`. Expiry is
//! lazy: a document past its TTL is only noticed, and removed, when it is
//! read. A design document with an expired-sessions view is provisioned by
//! [`CloudantStore::init`] so an external janitor can enumerate stale
//! documents; this store never queries it.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::broadcast;
use tracing::debug;

use crate::client::{DesignDocument, DocumentClient, DocumentError, ViewDefinition};
use crate::config::{StoreConfig, DEFAULT_TTL_SECS};
use crate::document::SessionDocument;
use crate::error::SessionError;
use crate::events::{StoreErrorEvent, ERROR_EVENT_CAPACITY};
use crate::session::SessionData;
use crate::store::SessionStore;

/// Map function for the expired-sessions view. Runs at index-build time,
/// so it captures staleness as of the last index refresh, not query time.
const EXPIRED_SESSIONS_MAP: &str = "function(doc) { if (doc.session_ttl && doc.session_modified && doc.session_modified + doc.session_ttl * 1000 < Date.now()) { emit(doc._id, doc._rev); } }";

/// TTL in effect for a write: the configured store-wide TTL if set, else
/// the session cookie's remaining max-age, else one day.
fn effective_ttl(configured: Option<u64>, session: &SessionData) -> u64 {
    if let Some(ttl) = configured {
        return ttl;
    }
    match session.cookie.max_age() {
        Some(ms) if ms > 0 => (ms / 1000) as u64,
        _ => DEFAULT_TTL_SECS,
    }
}

/// Evaluated on the read path only; writes never check expiry.
fn is_expired(modified_ms: i64, ttl_secs: u64, now_ms: i64) -> bool {
    modified_ms + (ttl_secs as i64) * 1000 < now_ms
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Session store backed by a Cloudant/CouchDB style document database
///
/// Storage format is the same as the Node.js connect cloudant store, so
/// sessions can be shared with an express application pointed at the same
/// database.
///
/// # Example
///
/// ```rust,ignore
/// use cloudant_session_store::{CloudantStore, MemoryDocumentClient, SessionStore};
///
/// let store = CloudantStore::new(MemoryDocumentClient::new());
/// store.init().await?;
/// store.set("sid", &session).await?;
/// ```
pub struct CloudantStore<C> {
    client: C,
    config: StoreConfig,
    events: broadcast::Sender<StoreErrorEvent>,
}

impl<C: DocumentClient> CloudantStore<C> {
    /// Create a store with default configuration
    pub fn new(client: C) -> Self {
        Self::with_config(client, StoreConfig::default())
    }

    /// Create a store with the given configuration
    pub fn with_config(client: C, config: StoreConfig) -> Self {
        let (events, _) = broadcast::channel(ERROR_EVENT_CAPACITY);
        Self {
            client,
            config,
            events,
        }
    }

    /// The store configuration
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Subscribe to out-of-band error events
    ///
    /// Every operation failure is both returned to its caller and sent
    /// here. Subscribers that lag behind lose the oldest events.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreErrorEvent> {
        self.events.subscribe()
    }

    /// Idempotently provision the session database and the expiry view
    ///
    /// Safe to call on every process start: an already existing database
    /// or design document counts as success, any other failure aborts.
    pub async fn init(&self) -> Result<(), SessionError> {
        match self.client.create_database(&self.config.database).await {
            Ok(()) => debug!("created {} database for sessions", self.config.database),
            Err(DocumentError::Conflict) => {
                debug!("session database {:?} exists", self.config.database)
            }
            Err(e) => return Err(e.into()),
        }

        let mut views = HashMap::new();
        views.insert(
            self.config.expiry_view_name.clone(),
            ViewDefinition {
                map: EXPIRED_SESSIONS_MAP.to_string(),
            },
        );
        let design = DesignDocument { views };
        match self
            .client
            .put_design_document(&self.config.database, &self.config.expiry_ddoc_name, &design)
            .await
        {
            Ok(()) => debug!("created {} expired view", self.config.expiry_ddoc_name),
            Err(DocumentError::Conflict) => {
                debug!("design doc {:?} exists", self.config.expiry_ddoc_name)
            }
            Err(e) => return Err(e.into()),
        }

        Ok(())
    }

    /// Make a storage key from session ID
    fn make_key(&self, sid: &str) -> String {
        format!("{}{}", self.config.prefix, sid)
    }

    fn emit(&self, operation: &'static str, sid: &str, error: &SessionError) {
        let _ = self.events.send(StoreErrorEvent {
            operation,
            sid: sid.to_string(),
            error: error.clone(),
        });
    }

    fn report(&self, operation: &'static str, sid: &str, error: DocumentError) -> SessionError {
        let err = SessionError::from(error);
        debug!("{} session error {:?} err {}", operation, sid, err);
        self.emit(operation, sid, &err);
        err
    }
}

#[async_trait]
impl<C: DocumentClient> SessionStore for CloudantStore<C> {
    async fn get(&self, sid: &str) -> Result<Option<SessionData>, SessionError> {
        debug!("GET {:?}", sid);
        match self
            .client
            .get_document(&self.config.database, &self.make_key(sid))
            .await
        {
            Ok(doc) => {
                if is_expired(doc.session_modified, doc.session_ttl, now_millis()) {
                    debug!("GET {:?} expired session", sid);
                    // destroy broadcasts its own failures; the session is
                    // reported absent either way
                    let _ = self.destroy(sid).await;
                    Ok(None)
                } else {
                    debug!("GET {:?} found rev {:?}", sid, doc.rev);
                    Ok(Some(doc.into_session()))
                }
            }
            Err(DocumentError::NotFound) => {
                debug!("GET - session not found {:?}", sid);
                Ok(None)
            }
            Err(e) => Err(self.report("get", sid, e)),
        }
    }

    async fn set(&self, sid: &str, session: &SessionData) -> Result<(), SessionError> {
        let key = self.make_key(sid);

        // Get the latest revision if the document exists
        let rev = match self
            .client
            .head_document(&self.config.database, &key)
            .await
        {
            Ok(rev) => Some(rev),
            Err(DocumentError::NotFound) => None,
            Err(e) => return Err(self.report("set", sid, e)),
        };

        debug!("SET session {:?} rev {:?}", sid, rev);
        let ttl = effective_ttl(self.config.ttl, session);
        let mut doc = SessionDocument::from_session(key, session, ttl, now_millis());
        doc.rev = rev;

        match self.client.put_document(&self.config.database, &doc).await {
            Ok(_) => Ok(()),
            Err(e) => Err(self.report("set", sid, e)),
        }
    }

    async fn destroy(&self, sid: &str) -> Result<(), SessionError> {
        debug!("DESTROY session {:?}", sid);
        let key = self.make_key(sid);

        // The store requires the current revision to authorize deletion
        let doc = match self.client.get_document(&self.config.database, &key).await {
            Ok(doc) => doc,
            Err(e) => return Err(self.report("destroy", sid, e)),
        };
        let rev = match doc.rev {
            Some(rev) => rev,
            None => {
                let err = SessionError::Serialization(
                    "stored document is missing its revision".to_string(),
                );
                self.emit("destroy", sid, &err);
                return Err(err);
            }
        };

        match self
            .client
            .delete_document(&self.config.database, &key, &rev)
            .await
        {
            Ok(()) => Ok(()),
            Err(e) => Err(self.report("destroy", sid, e)),
        }
    }

    async fn touch(&self, sid: &str, session: &SessionData) -> Result<(), SessionError> {
        let key = self.make_key(sid);

        let stored = match self.client.get_document(&self.config.database, &key).await {
            Ok(doc) => doc,
            Err(e) => return Err(self.report("touch", sid, e)),
        };

        debug!("TOUCH session {:?} rev {:?}", sid, stored.rev);
        // The stored payload is rewritten as-is; only the TTL (from the
        // caller's cookie) and the modified stamp change
        let ttl = effective_ttl(self.config.ttl, session);
        let rev = stored.rev.clone();
        let mut doc = SessionDocument::from_session(key, &stored.session, ttl, now_millis());
        doc.rev = rev;

        if let Err(e) = self.client.put_document(&self.config.database, &doc).await {
            // The rewrite is best-effort: observers hear about the failure,
            // the caller's session stays valid until its old deadline
            let _ = self.report("touch", sid, e);
        }
        Ok(())
    }
}
