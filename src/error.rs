//! Persistence Error Types
//!
//! Only configuration problems and collaborator infrastructure failures are
//! errors. Restoration failures (missing cookie, malformed value, lookup
//! miss, token mismatch, validation failure) are expected outcomes and never
//! surface here; they collapse into a non-accepted
//! [`RestoreOutcome`](crate::application::session::RestoreOutcome).

use thiserror::Error;

/// Persistence-specific result type alias
pub type PersistResult<T> = Result<T, PersistError>;

/// Persistence error variants
#[derive(Debug, Error)]
pub enum PersistError {
    /// Signing was enabled against a cookie jar that cannot sign.
    ///
    /// Raised at configuration time, before any request is served.
    #[error("sign_cookie is enabled but the cookie jar does not support signed cookies")]
    SigningUnsupported,

    /// Record store failure
    #[error("record store error: {0}")]
    Store(String),
}

impl PersistError {
    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            PersistError::SigningUnsupported => {
                tracing::error!("Signed cookies enabled without jar support");
            }
            PersistError::Store(msg) => {
                tracing::error!(message = %msg, "Record store error");
            }
        }
    }
}
