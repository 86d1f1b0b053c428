//! Cookie-Carried Credential Persistence
//!
//! The codec behind stateless "remember me": enough information lives in a
//! client-side cookie to re-authenticate a later request without
//! credentials. One `CookiePersistence` instance is scoped to one inbound
//! request and one session instance; the session lifecycle host calls
//! [`restore`](CookiePersistence::restore) while constructing a session,
//! [`save_cookie`](CookiePersistence::save_cookie) after the session is
//! confirmed authenticated, and
//! [`destroy_cookie`](CookiePersistence::destroy_cookie) on teardown.

use std::sync::Arc;

use chrono::{DateTime, Duration as ChronoDuration, Utc};

use crate::application::config::InstanceConfig;
use crate::domain::cookie_jar::{CookieAttributes, CookieExpiry, CookieJar};
use crate::domain::cookie_value::CookieValue;
use crate::domain::record::{AcceptAll, LookupField, Record, RecordStore, RecordValidator};
use crate::error::PersistResult;

/// Outcome of a restoration attempt.
///
/// Every failure mode collapses here; restoration never raises to the host.
/// The host proceeds as an anonymous session when nothing was accepted.
#[derive(Debug)]
pub struct RestoreOutcome<R> {
    /// The record accepted as the session's authenticated identity.
    pub record: Option<R>,
    /// Validation errors, populated only when a candidate was found but
    /// failed the session's validation path.
    pub errors: Vec<String>,
}

impl<R> RestoreOutcome<R> {
    pub fn accepted(&self) -> bool {
        self.record.is_some()
    }

    fn rejected() -> Self {
        Self {
            record: None,
            errors: Vec::new(),
        }
    }

    fn invalid(errors: Vec<String>) -> Self {
        Self {
            record: None,
            errors,
        }
    }
}

/// Credential cookie codec for one session instance.
pub struct CookiePersistence<S, J, V = AcceptAll>
where
    S: RecordStore,
    J: CookieJar,
    V: RecordValidator<S::Record>,
{
    store: Arc<S>,
    jar: Arc<J>,
    config: InstanceConfig,
    validator: V,
    /// Instance remember-preference; `None` falls through to config.
    remember: Option<bool>,
}

impl<S, J> CookiePersistence<S, J>
where
    S: RecordStore,
    J: CookieJar,
{
    /// Build the codec with the default accept-all validation hook.
    ///
    /// Fails fast with [`PersistError::SigningUnsupported`] when signing is
    /// configured against a jar that cannot sign.
    ///
    /// [`PersistError::SigningUnsupported`]: crate::error::PersistError::SigningUnsupported
    pub fn new(store: Arc<S>, jar: Arc<J>, config: InstanceConfig) -> PersistResult<Self> {
        Self::with_validator(store, jar, config, AcceptAll)
    }
}

impl<S, J, V> CookiePersistence<S, J, V>
where
    S: RecordStore,
    J: CookieJar,
    V: RecordValidator<S::Record>,
{
    pub fn with_validator(
        store: Arc<S>,
        jar: Arc<J>,
        config: InstanceConfig,
        validator: V,
    ) -> PersistResult<Self> {
        config.validate_jar(jar.as_ref())?;

        Ok(Self {
            store,
            jar,
            config,
            validator,
            remember: None,
        })
    }

    /// Set the instance remember-preference, e.g. harvested from
    /// credential input during an interactive login.
    pub fn set_remember_me(&mut self, remember: bool) {
        self.remember = Some(remember);
    }

    /// Effective remember-preference for this instance.
    pub fn remember_me(&self) -> bool {
        self.remember.unwrap_or_else(|| self.config.remember_me())
    }

    pub fn config(&self) -> &InstanceConfig {
        &self.config
    }

    /// Re-authenticate from the credential cookie.
    ///
    /// Missing cookie, malformed value, lookup miss, token mismatch and
    /// validation failure all collapse silently into a non-accepted
    /// outcome. Exactly one store lookup is made per attempt, with no
    /// fallback chaining between the two strategies. The embedded expiry
    /// field is ignored; expiry enforcement is the transport's job.
    pub async fn restore(&self) -> RestoreOutcome<S::Record> {
        let key = self.config.cookie_key();

        let Some(raw) = self.jar.read(key, self.config.sign_cookie()) else {
            tracing::debug!(cookie = key, "No credential cookie present");
            return RestoreOutcome::rejected();
        };

        let Some(value) = CookieValue::parse(&raw) else {
            tracing::debug!(cookie = key, "Malformed credential cookie");
            return RestoreOutcome::rejected();
        };

        let lookup = match &value.record_key {
            Some(record_key) => self.store.find_by(LookupField::PrimaryKey, record_key),
            None => self
                .store
                .find_by(LookupField::PersistenceToken, &value.persistence_token),
        };

        let record = match lookup.await {
            Ok(Some(record)) => record,
            Ok(None) => {
                tracing::debug!(cookie = key, "Credential cookie referenced no record");
                return RestoreOutcome::rejected();
            }
            Err(e) => {
                // Infrastructure failures also yield an anonymous session
                tracing::warn!(cookie = key, error = %e, "Record store lookup failed");
                return RestoreOutcome::rejected();
            }
        };

        // The record's own token must match the cookie's. A tampered
        // record_key fails here even though its lookup succeeded.
        if record.persistence_token() != value.persistence_token {
            tracing::warn!(cookie = key, "Persistence token mismatch");
            return RestoreOutcome::rejected();
        }

        if let Err(errors) = self.validator.validate(&record) {
            tracing::debug!(
                cookie = key,
                error_count = errors.len(),
                "Restored record failed validation"
            );
            return RestoreOutcome::invalid(errors);
        }

        tracing::debug!(cookie = key, "Session restored from credential cookie");
        RestoreOutcome {
            record: Some(record),
            errors: Vec::new(),
        }
    }

    /// Write the credential cookie for a confirmed-authenticated record.
    ///
    /// Always emits `persistence_token::record_key`; with the remember
    /// preference on, a third field carries `now + remember_me_for`, which
    /// doubles as the cookie's own expiry. Exactly one write, replacing any
    /// prior value in full.
    pub fn save_cookie(&self, record: &S::Record) {
        let remember = self.remember_me();
        let remember_until = remember.then(|| self.remember_until());

        let value = CookieValue::new(
            record.persistence_token(),
            record.primary_key_value(),
            remember_until,
        );

        let attributes = CookieAttributes {
            domain: self.config.domain().map(str::to_string),
            expiry: match remember_until {
                Some(at) => CookieExpiry::At(at),
                None => CookieExpiry::Session,
            },
            secure: self.config.secure(),
            http_only: self.config.httponly(),
            signed: self.config.sign_cookie(),
        };

        self.jar
            .write(self.config.cookie_key(), &value.to_string(), &attributes);

        tracing::info!(
            cookie = self.config.cookie_key(),
            remember = remember,
            "Credential cookie saved"
        );
    }

    /// Delete the credential cookie. Deleting an absent cookie is a no-op.
    pub fn destroy_cookie(&self) {
        self.jar
            .delete(self.config.cookie_key(), self.config.domain());

        tracing::info!(cookie = self.config.cookie_key(), "Credential cookie destroyed");
    }

    fn remember_until(&self) -> DateTime<Utc> {
        // Out-of-range configured durations clamp to the stock three months
        let ttl = ChronoDuration::from_std(self.config.remember_me_for())
            .unwrap_or_else(|_| ChronoDuration::days(90));
        Utc::now() + ttl
    }
}
