//! Credential Cookie Wire Format
//!
//! An ordered, `::`-delimited ASCII string with 2 or 3 fields:
//! `persistence_token::record_key[::remember_until]`. The third field is
//! present only when the remember preference was on at encode time.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};

const DELIMITER: &str = "::";

/// Parsed or freshly built credential cookie value.
///
/// Constructed fresh on every save and fully replaced, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieValue {
    pub persistence_token: String,
    /// Primary-key value of the record. Absent when the cookie only
    /// carries a token; lookup then falls back to token-only search.
    pub record_key: Option<String>,
    /// Raw third field. Carried verbatim and ignored during restoration:
    /// the cookie transport's own expiry keeps stale cookies from being
    /// delivered at all.
    pub remember_until: Option<String>,
}

impl CookieValue {
    /// Build a value for encoding. The timestamp is formatted RFC 3339
    /// at construction.
    pub fn new(
        persistence_token: impl Into<String>,
        record_key: impl Into<String>,
        remember_until: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            persistence_token: persistence_token.into(),
            record_key: Some(record_key.into()),
            remember_until: remember_until
                .map(|at| at.to_rfc3339_opts(SecondsFormat::Secs, true)),
        }
    }

    /// Parse a raw cookie value.
    ///
    /// Returns `None` for anything malformed: fewer than two fields, or an
    /// empty persistence token. An empty second field parses as a missing
    /// record key.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut fields = raw.splitn(3, DELIMITER);
        let token = fields.next()?;
        let record_key = fields.next()?;
        if token.is_empty() {
            return None;
        }

        Some(Self {
            persistence_token: token.to_string(),
            record_key: (!record_key.is_empty()).then(|| record_key.to_string()),
            remember_until: fields.next().map(str::to_string),
        })
    }
}

impl fmt::Display for CookieValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{DELIMITER}{}",
            self.persistence_token,
            self.record_key.as_deref().unwrap_or("")
        )?;
        if let Some(until) = &self.remember_until {
            write!(f, "{DELIMITER}{until}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_two_fields() {
        let value = CookieValue::parse("tok123::42").unwrap();
        assert_eq!(value.persistence_token, "tok123");
        assert_eq!(value.record_key.as_deref(), Some("42"));
        assert!(value.remember_until.is_none());
    }

    #[test]
    fn test_parse_three_fields() {
        let value = CookieValue::parse("tok123::42::2026-01-01T00:00:00Z").unwrap();
        assert_eq!(value.persistence_token, "tok123");
        assert_eq!(value.record_key.as_deref(), Some("42"));
        assert_eq!(value.remember_until.as_deref(), Some("2026-01-01T00:00:00Z"));
    }

    #[test]
    fn test_parse_empty_record_key_falls_back() {
        let value = CookieValue::parse("tok123::").unwrap();
        assert_eq!(value.persistence_token, "tok123");
        assert!(value.record_key.is_none());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(CookieValue::parse("").is_none());
        assert!(CookieValue::parse("just-a-token").is_none());
        assert!(CookieValue::parse("::42").is_none());
        assert!(CookieValue::parse("::").is_none());
    }

    #[test]
    fn test_parse_folds_extra_delimiters_into_third_field() {
        let value = CookieValue::parse("tok::42::a::b").unwrap();
        assert_eq!(value.remember_until.as_deref(), Some("a::b"));
    }

    #[test]
    fn test_display_without_remember() {
        let value = CookieValue::new("tok123", "42", None);
        assert_eq!(value.to_string(), "tok123::42");
    }

    #[test]
    fn test_display_with_remember_is_rfc3339() {
        let at = Utc.with_ymd_and_hms(2026, 1, 1, 12, 30, 0).unwrap();
        let value = CookieValue::new("tok123", "42", Some(at));
        assert_eq!(value.to_string(), "tok123::42::2026-01-01T12:30:00Z");
    }

    #[test]
    fn test_display_parse_round_trip() {
        let at = Utc.with_ymd_and_hms(2026, 6, 15, 8, 0, 0).unwrap();
        let value = CookieValue::new("tok123", "42", Some(at));
        let reparsed = CookieValue::parse(&value.to_string()).unwrap();
        assert_eq!(reparsed, value);
    }
}
