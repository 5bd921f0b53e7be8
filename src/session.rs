//! Session data structures compatible with express-session

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Cookie data structure compatible with express-session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCookie {
    /// Original max age in milliseconds (as set initially)
    pub original_max_age: Option<i64>,

    /// Expiration time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires: Option<DateTime<Utc>>,

    /// Secure flag
    #[serde(default)]
    pub secure: bool,

    /// HttpOnly flag
    #[serde(default = "default_http_only")]
    pub http_only: bool,

    /// Cookie path
    #[serde(default = "default_path")]
    pub path: String,

    /// Cookie domain
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,

    /// SameSite attribute
    #[serde(skip_serializing_if = "Option::is_none")]
    pub same_site: Option<String>,
}

fn default_http_only() -> bool {
    true
}

fn default_path() -> String {
    "/".to_string()
}

impl Default for SessionCookie {
    fn default() -> Self {
        Self {
            original_max_age: None,
            expires: None,
            secure: false,
            http_only: true,
            path: "/".to_string(),
            domain: None,
            same_site: None,
        }
    }
}

impl SessionCookie {
    /// Create a new session cookie with the given max age in seconds
    pub fn new(max_age_secs: u64) -> Self {
        let max_age_ms = (max_age_secs * 1000) as i64;
        let expires = Utc::now() + chrono::Duration::seconds(max_age_secs as i64);

        Self {
            original_max_age: Some(max_age_ms),
            expires: Some(expires),
            ..Default::default()
        }
    }

    /// Get remaining time in milliseconds
    pub fn max_age(&self) -> Option<i64> {
        self.expires.map(|exp| {
            let now = Utc::now();
            (exp - now).num_milliseconds()
        })
    }
}

/// Session data structure compatible with express-session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    /// Cookie information
    pub cookie: SessionCookie,

    /// Additional session data (flattened at same level as cookie)
    #[serde(flatten)]
    pub data: HashMap<String, Value>,
}

impl Default for SessionData {
    fn default() -> Self {
        Self {
            cookie: SessionCookie::default(),
            data: HashMap::new(),
        }
    }
}

impl SessionData {
    /// Create a new session data with the given max age in seconds
    pub fn new(max_age_secs: u64) -> Self {
        Self {
            cookie: SessionCookie::new(max_age_secs),
            data: HashMap::new(),
        }
    }

    /// Get a value from session data
    pub fn get<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Option<T> {
        self.data.get(key).and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Set a value in session data
    pub fn set<T: Serialize>(&mut self, key: &str, value: T) {
        if let Ok(v) = serde_json::to_value(value) {
            self.data.insert(key.to_string(), v);
        }
    }

    /// Remove a value from session data
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.data.remove(key)
    }

    /// Check if a key exists
    pub fn contains(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Check if session data is empty (no user data)
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
