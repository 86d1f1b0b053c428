//! Record Store Interfaces
//!
//! Traits for the external record store and for the validation hook the
//! session host runs on a restored candidate. Implementations live outside
//! the core (an in-memory reference lives in `infra/`).

use derive_more::Display;

use crate::error::PersistResult;

/// Field a record can be looked up by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum LookupField {
    #[display("persistence_token")]
    PersistenceToken,
    #[display("primary_key")]
    PrimaryKey,
}

/// A user record as the persistence core sees it.
pub trait Record {
    /// Opaque per-record secret proving identity without a password.
    fn persistence_token(&self) -> &str;

    /// Primary-key value in its natural string representation.
    fn primary_key_value(&self) -> String;
}

/// Record store trait
#[trait_variant::make(RecordStore: Send)]
pub trait LocalRecordStore {
    type Record: Record + Send;

    /// Find at most one record by the given field.
    async fn find_by(&self, field: LookupField, value: &str)
    -> PersistResult<Option<Self::Record>>;
}

/// Validation hook run on a restored candidate record.
///
/// Stands in for the session's standard validation path; errors are
/// surfaced to the host on the restore outcome, never raised.
pub trait RecordValidator<R>: Send + Sync {
    fn validate(&self, record: &R) -> Result<(), Vec<String>>;
}

/// Default validator: every candidate passes.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl<R> RecordValidator<R> for AcceptAll {
    fn validate(&self, _record: &R) -> Result<(), Vec<String>> {
        Ok(())
    }
}

/// Adapts a plain function to the validation hook.
pub struct ValidateFn<F>(pub F);

impl<R, F> RecordValidator<R> for ValidateFn<F>
where
    F: Fn(&R) -> Result<(), Vec<String>> + Send + Sync,
{
    fn validate(&self, record: &R) -> Result<(), Vec<String>> {
        (self.0)(record)
    }
}
