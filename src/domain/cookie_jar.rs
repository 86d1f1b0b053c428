//! Cookie Jar Interface
//!
//! The cookie jar is supplied by the HTTP layer: a mapping from cookie name
//! to value with plain and signed/verified channels. Writes and deletes are
//! external effects that succeed or degrade per the jar's own contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Cookie expiry: an absolute instant, or session-only (the cookie dies
/// with the browser session).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CookieExpiry {
    #[default]
    Session,
    At(DateTime<Utc>),
}

impl CookieExpiry {
    pub fn is_session_only(&self) -> bool {
        matches!(self, CookieExpiry::Session)
    }
}

/// Attributes attached to a cookie write
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieAttributes {
    pub domain: Option<String>,
    pub expiry: CookieExpiry,
    pub secure: bool,
    pub http_only: bool,
    pub signed: bool,
}

/// Cookie jar trait
pub trait CookieJar: Send + Sync {
    /// Read a cookie value. With `signed`, the value is read through the
    /// verified channel; tampered values read as absent.
    fn read(&self, name: &str, signed: bool) -> Option<String>;

    /// Write a cookie, replacing any prior value in full.
    fn write(&self, name: &str, value: &str, attributes: &CookieAttributes);

    /// Delete a cookie. Deleting an absent cookie is not an error.
    fn delete(&self, name: &str, domain: Option<&str>);

    /// Whether this jar can sign and verify cookie values.
    fn supports_signed(&self) -> bool;
}
