//! Session store trait

use async_trait::async_trait;
use crate::error::SessionError;
use crate::session::SessionData;

/// Trait for session storage backends
///
/// This trait is designed to be compatible with the express-session store
/// interface. Implementations store session data under the key
/// `prefix + session_id` and compute the TTL themselves from their
/// configuration and the session cookie.
#[async_trait]
pub trait SessionStore: Send + Sync + 'static {
    /// Get a session by ID
    ///
    /// Returns None if the session doesn't exist or has expired.
    async fn get(&self, sid: &str) -> Result<Option<SessionData>, SessionError>;

    /// Set/update a session
    ///
    /// Handles both first writes and overwrites of an existing session
    /// without the caller managing revision tokens.
    async fn set(&self, sid: &str, session: &SessionData) -> Result<(), SessionError>;

    /// Destroy/delete a session
    async fn destroy(&self, sid: &str) -> Result<(), SessionError>;

    /// Touch a session - extend its lifetime without modifying data
    ///
    /// This is called when the session is accessed but not modified.
    async fn touch(&self, sid: &str, session: &SessionData) -> Result<(), SessionError>;
}
