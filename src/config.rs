//! Store configuration

/// Default TTL when neither the store nor the session cookie carries one.
/// One day in seconds.
pub const DEFAULT_TTL_SECS: u64 = 86400;

/// Configuration for the Cloudant session store
///
/// Immutable once the store is constructed. The document store client is
/// not part of the configuration; it is passed to the store directly.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Name of the database holding session documents (default: "sessions")
    pub database: String,

    /// Document id prefix for session keys (default: "sess:")
    pub prefix: String,

    /// Explicit store-wide TTL in seconds.
    /// When None, the TTL falls back to the session cookie's remaining
    /// max-age, then to [`DEFAULT_TTL_SECS`].
    pub ttl: Option<u64>,

    /// Name of the expired-sessions view (default: "express_expired_sessions")
    pub expiry_view_name: String,

    /// Name of the design document holding the expired-sessions view
    /// (default: "expired_sessions")
    pub expiry_ddoc_name: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database: "sessions".to_string(),
            prefix: "sess:".to_string(),
            ttl: None,
            expiry_view_name: "express_expired_sessions".to_string(),
            expiry_ddoc_name: "expired_sessions".to_string(),
        }
    }
}

impl StoreConfig {
    /// Create a configuration with all defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the session database name (default: "sessions")
    pub fn with_database<S: Into<String>>(mut self, database: S) -> Self {
        self.database = database.into();
        self
    }

    /// Set the document id prefix (default: "sess:")
    pub fn with_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Set an explicit store-wide TTL in seconds
    ///
    /// Pass None to derive the TTL from each session's cookie instead.
    pub fn with_ttl(mut self, ttl: impl Into<Option<u64>>) -> Self {
        self.ttl = ttl.into();
        self
    }

    /// Set the expired-sessions view name (default: "express_expired_sessions")
    pub fn with_expiry_view_name<S: Into<String>>(mut self, name: S) -> Self {
        self.expiry_view_name = name.into();
        self
    }

    /// Set the expiry design document name (default: "expired_sessions")
    pub fn with_expiry_ddoc_name<S: Into<String>>(mut self, name: S) -> Self {
        self.expiry_ddoc_name = name.into();
        self
    }
}
