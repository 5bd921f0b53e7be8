//! Out-of-band store error events
//!
//! Every failed session operation is returned to its caller and, in
//! addition, broadcast to any subscribed observers on a channel owned by
//! the store.

use crate::error::SessionError;

/// How many unconsumed events a subscriber may lag behind before older
/// ones are dropped.
pub const ERROR_EVENT_CAPACITY: usize = 16;

/// An error raised by a session operation, as seen by observers
#[derive(Debug, Clone)]
pub struct StoreErrorEvent {
    /// The lifecycle operation that failed: "get", "set", "destroy" or "touch"
    pub operation: &'static str,

    /// The session identifier the operation was acting on
    pub sid: String,

    /// The failure itself
    pub error: SessionError,
}
