//! Credential Cookie Persistence ("remember me")
//!
//! Stateless, cookie-carried re-authentication: enough information is
//! encoded in a client-side cookie to re-identify a user on a later request
//! without credentials, while resisting tampering and respecting expiry.
//!
//! Clean Architecture structure:
//! - `domain/` - cookie wire format and collaborator traits
//! - `application/` - configuration, normalization, and the codec
//! - `infra/` - in-memory reference collaborators
//!
//! ## Lifecycle
//! The session host wires the codec in with three direct calls:
//! - [`CookiePersistence::restore`] while constructing a session
//! - [`CookiePersistence::save_cookie`] after confirmed authentication
//! - [`CookiePersistence::destroy_cookie`] on teardown
//!
//! ## Security Model
//! - Cookie carries `persistence_token::record_key[::remember_until]`
//! - A restored record is accepted only when its own persistence token
//!   matches the cookie's, defeating tampered record keys
//! - Optional signed channel; enabling it against a jar without signing
//!   support fails at configuration time
//! - Every restoration failure collapses to an anonymous session

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;

// Re-exports for convenience
pub use application::config::{
    ConfigOverrides, InstanceConfig, PersistenceConfig, derive_cookie_key,
};
pub use application::credentials::{harvest_remember_preference, remember_preference_from};
pub use application::session::{CookiePersistence, RestoreOutcome};
pub use domain::cookie_jar::{CookieAttributes, CookieExpiry, CookieJar};
pub use domain::cookie_value::CookieValue;
pub use domain::record::{
    AcceptAll, LookupField, Record, RecordStore, RecordValidator, ValidateFn,
};
pub use error::{PersistError, PersistResult};
pub use infra::memory::{MemoryCookieJar, MemoryRecord, MemoryRecordStore};
