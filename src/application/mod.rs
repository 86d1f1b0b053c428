//! Application Layer
//!
//! Configuration resolution, credential-input normalization, and the
//! cookie persistence component itself.

pub mod config;
pub mod credentials;
pub mod session;

// Re-exports
pub use config::{ConfigOverrides, InstanceConfig, PersistenceConfig};
pub use credentials::harvest_remember_preference;
pub use session::{CookiePersistence, RestoreOutcome};
