//! # cloudant-session-store
//!
//! Express-session compatible session persistence for IBM Cloudant and
//! CouchDB style versioned document stores.
//!
//! Each session is one document at `prefix + session_id`, carrying the
//! same `session_ttl`/`session_modified` metadata as the Node.js connect
//! cloudant store, so a Rust application and an express application can
//! share one session database.
//!
//! ## Features
//!
//! - **Lazy TTL expiry**: a session past its TTL is noticed, and removed,
//!   when it is read - there is no background sweeper in this crate
//! - **Optimistic concurrency**: the store threads the document's current
//!   revision token through every write and delete
//! - **Idempotent provisioning**: [`CloudantStore::init`] creates the
//!   database and an expired-sessions view, and is safe to call on every
//!   process start
//! - **Pluggable backend**: any document store behind the
//!   [`DocumentClient`] trait; [`MemoryDocumentClient`] ships for
//!   development and testing
//! - **Error observers**: failures are returned to the caller and also
//!   broadcast on the store's error channel
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cloudant_session_store::{
//!     CloudantStore, MemoryDocumentClient, SessionData, SessionStore, StoreConfig,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = StoreConfig::new().with_database("sessions").with_ttl(3600);
//!     let store = CloudantStore::with_config(MemoryDocumentClient::new(), config);
//!     store.init().await?;
//!
//!     let mut session = SessionData::new(3600);
//!     session.set("user", "alice");
//!     store.set("sid-from-middleware", &session).await?;
//!
//!     let found = store.get("sid-from-middleware").await?;
//!     assert!(found.is_some());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod document;
pub mod error;
pub mod events;
pub mod session;
pub mod store;

pub use client::{DesignDocument, DocumentClient, DocumentError, MemoryDocumentClient, ViewDefinition};
pub use config::{StoreConfig, DEFAULT_TTL_SECS};
pub use document::SessionDocument;
pub use error::SessionError;
pub use events::StoreErrorEvent;
pub use session::{SessionCookie, SessionData};
pub use store::{CloudantStore, SessionStore};
