//! Domain Layer
//!
//! Contains the cookie wire format and the collaborator traits
//! (record store, cookie jar, validation hook).

pub mod cookie_jar;
pub mod cookie_value;
pub mod record;

// Re-exports
pub use cookie_jar::{CookieAttributes, CookieExpiry, CookieJar};
pub use cookie_value::CookieValue;
pub use record::{LookupField, Record, RecordStore, RecordValidator};
