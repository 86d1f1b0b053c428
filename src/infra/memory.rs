//! In-Memory Collaborator Implementations
//!
//! Reference record store and cookie jar backing the codec in tests and
//! small hosts. The jar serves the signed channel when configured with a
//! secret: values are stored as `value.signature` (HMAC-SHA256, base64url)
//! and verified on read.

use std::collections::HashMap;
use std::sync::Mutex;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;
use uuid::Uuid;

use crate::domain::cookie_jar::{CookieAttributes, CookieJar};
use crate::domain::record::{LookupField, Record, RecordStore};
use crate::error::PersistResult;

type HmacSha256 = Hmac<Sha256>;

/// Record held by the in-memory store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryRecord {
    pub id: Uuid,
    pub persistence_token: String,
}

impl Record for MemoryRecord {
    fn persistence_token(&self) -> &str {
        &self.persistence_token
    }

    fn primary_key_value(&self) -> String {
        self.id.to_string()
    }
}

/// Generate a fresh opaque persistence token
pub fn random_persistence_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// In-memory record store
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    records: Mutex<HashMap<Uuid, MemoryRecord>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record with a fresh id and persistence token.
    pub fn insert(&self) -> MemoryRecord {
        let record = MemoryRecord {
            id: Uuid::new_v4(),
            persistence_token: random_persistence_token(),
        };

        self.records
            .lock()
            .expect("record store lock poisoned")
            .insert(record.id, record.clone());
        record
    }

    /// Rotate a record's persistence token, invalidating outstanding
    /// credential cookies for it.
    pub fn reset_persistence_token(&self, id: Uuid) -> Option<MemoryRecord> {
        let mut records = self.records.lock().expect("record store lock poisoned");
        let record = records.get_mut(&id)?;
        record.persistence_token = random_persistence_token();
        Some(record.clone())
    }
}

impl RecordStore for MemoryRecordStore {
    type Record = MemoryRecord;

    async fn find_by(
        &self,
        field: LookupField,
        value: &str,
    ) -> PersistResult<Option<MemoryRecord>> {
        let records = self.records.lock().expect("record store lock poisoned");

        let found = match field {
            LookupField::PrimaryKey => match value.parse::<Uuid>() {
                Ok(id) => records.get(&id).cloned(),
                Err(_) => None,
            },
            LookupField::PersistenceToken => records
                .values()
                .find(|record| record.persistence_token == value)
                .cloned(),
        };

        Ok(found)
    }
}

#[derive(Debug, Clone)]
struct StoredCookie {
    value: String,
    attributes: CookieAttributes,
}

/// In-memory cookie jar
#[derive(Debug, Default)]
pub struct MemoryCookieJar {
    cookies: Mutex<HashMap<String, StoredCookie>>,
    secret: Option<[u8; 32]>,
}

impl MemoryCookieJar {
    /// Jar without signing support.
    pub fn new() -> Self {
        Self::default()
    }

    /// Jar that can sign and verify cookie values.
    pub fn with_secret(secret: [u8; 32]) -> Self {
        Self {
            cookies: Mutex::default(),
            secret: Some(secret),
        }
    }

    /// Raw stored value, signature included. Test hook.
    pub fn raw(&self, name: &str) -> Option<String> {
        self.cookies
            .lock()
            .expect("cookie jar lock poisoned")
            .get(name)
            .map(|stored| stored.value.clone())
    }

    /// Attributes the cookie was last written with. Test hook.
    pub fn attributes(&self, name: &str) -> Option<CookieAttributes> {
        self.cookies
            .lock()
            .expect("cookie jar lock poisoned")
            .get(name)
            .map(|stored| stored.attributes.clone())
    }

    /// Place a raw value directly, bypassing signing. Simulates a cookie
    /// crafted or tampered with client-side.
    pub fn set_raw(&self, name: &str, value: &str) {
        self.cookies
            .lock()
            .expect("cookie jar lock poisoned")
            .insert(
                name.to_string(),
                StoredCookie {
                    value: value.to_string(),
                    attributes: CookieAttributes {
                        domain: None,
                        expiry: Default::default(),
                        secure: false,
                        http_only: false,
                        signed: false,
                    },
                },
            );
    }

    fn signed_value(&self, value: &str) -> Option<String> {
        let secret = self.secret.as_ref()?;
        let mut mac =
            HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size");
        mac.update(value.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
        Some(format!("{value}.{signature}"))
    }

    fn verify(&self, stored: &str) -> Option<String> {
        let secret = self.secret.as_ref()?;
        let (value, signature_b64) = stored.rsplit_once('.')?;
        let signature = URL_SAFE_NO_PAD.decode(signature_b64).ok()?;

        let mut mac =
            HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size");
        mac.update(value.as_bytes());
        mac.verify_slice(&signature).ok()?;

        Some(value.to_string())
    }
}

impl CookieJar for MemoryCookieJar {
    fn read(&self, name: &str, signed: bool) -> Option<String> {
        let stored = self.raw(name)?;

        if signed { self.verify(&stored) } else { Some(stored) }
    }

    fn write(&self, name: &str, value: &str, attributes: &CookieAttributes) {
        let value = if attributes.signed {
            match self.signed_value(value) {
                Some(signed) => signed,
                None => {
                    tracing::error!(cookie = name, "Signed write requested without a secret");
                    return;
                }
            }
        } else {
            value.to_string()
        };

        self.cookies
            .lock()
            .expect("cookie jar lock poisoned")
            .insert(
                name.to_string(),
                StoredCookie {
                    value,
                    attributes: attributes.clone(),
                },
            );
    }

    fn delete(&self, name: &str, _domain: Option<&str>) {
        self.cookies
            .lock()
            .expect("cookie jar lock poisoned")
            .remove(name);
    }

    fn supports_signed(&self) -> bool {
        self.secret.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cookie_jar::CookieExpiry;

    fn plain_attributes(signed: bool) -> CookieAttributes {
        CookieAttributes {
            domain: None,
            expiry: CookieExpiry::Session,
            secure: true,
            http_only: true,
            signed,
        }
    }

    #[test]
    fn test_random_tokens_are_distinct() {
        let a = random_persistence_token();
        let b = random_persistence_token();
        assert_ne!(a, b);
        assert!(!a.is_empty());
    }

    #[tokio::test]
    async fn test_find_by_both_fields() {
        let store = MemoryRecordStore::new();
        let record = store.insert();

        let by_key = store
            .find_by(LookupField::PrimaryKey, &record.id.to_string())
            .await
            .unwrap();
        assert_eq!(by_key, Some(record.clone()));

        let by_token = store
            .find_by(LookupField::PersistenceToken, &record.persistence_token)
            .await
            .unwrap();
        assert_eq!(by_token, Some(record));

        let miss = store
            .find_by(LookupField::PrimaryKey, "not-a-uuid")
            .await
            .unwrap();
        assert!(miss.is_none());
    }

    #[tokio::test]
    async fn test_reset_token_invalidates_old_one() {
        let store = MemoryRecordStore::new();
        let record = store.insert();
        let old_token = record.persistence_token.clone();

        let rotated = store.reset_persistence_token(record.id).unwrap();
        assert_ne!(rotated.persistence_token, old_token);

        let by_old = store
            .find_by(LookupField::PersistenceToken, &old_token)
            .await
            .unwrap();
        assert!(by_old.is_none());
    }

    #[test]
    fn test_signed_write_and_verified_read() {
        let jar = MemoryCookieJar::with_secret([1u8; 32]);
        jar.write("key", "tok::42", &plain_attributes(true));

        // Stored with a signature appended, readable through the channel
        assert_ne!(jar.raw("key").unwrap(), "tok::42");
        assert_eq!(jar.read("key", true), Some("tok::42".to_string()));
    }

    #[test]
    fn test_tampered_signature_reads_as_absent() {
        let jar = MemoryCookieJar::with_secret([1u8; 32]);
        jar.write("key", "tok::42", &plain_attributes(true));

        let raw = jar.raw("key").unwrap();
        jar.set_raw("key", &raw.replace("42", "43"));
        assert!(jar.read("key", true).is_none());

        // A value never signed at all also fails verification
        jar.set_raw("key", "tok::43");
        assert!(jar.read("key", true).is_none());
    }

    #[test]
    fn test_unsigned_jar_has_no_signed_support() {
        let jar = MemoryCookieJar::new();
        assert!(!jar.supports_signed());
        assert!(MemoryCookieJar::with_secret([0u8; 32]).supports_signed());

        // A signed write against an unsigned jar is dropped, not downgraded
        jar.write("key", "tok::42", &plain_attributes(true));
        assert!(jar.raw("key").is_none());
    }

    #[test]
    fn test_delete_is_idempotent() {
        let jar = MemoryCookieJar::new();
        jar.write("key", "tok::42", &plain_attributes(false));

        jar.delete("key", None);
        assert!(jar.raw("key").is_none());
        jar.delete("key", None);
        assert!(jar.raw("key").is_none());
    }
}
