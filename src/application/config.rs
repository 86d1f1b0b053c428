//! Persistence Configuration
//!
//! Class-level defaults with optional per-instance overrides. Each setting
//! is resolved override-first-then-default exactly once per session instance
//! and cached for that instance's lifetime; the not-yet-resolved state is an
//! explicit `OnceLock`, not an existence check.

use std::sync::OnceLock;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::cookie_jar::CookieJar;
use crate::error::{PersistError, PersistResult};

/// Default remember-me horizon: three months.
const DEFAULT_REMEMBER_FOR: Duration = Duration::from_secs(90 * 24 * 3600);

/// Class-level persistence configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// Cookie name, before any instance prefix
    pub cookie_key: String,
    /// Default remember preference for new session instances
    pub remember_me: bool,
    /// How long a remembered cookie outlives the browsing session
    pub remember_me_for: Duration,
    /// Whether to require Secure cookie
    pub secure: bool,
    /// Whether to write through the jar's signed channel
    pub sign_cookie: bool,
    /// Whether to set HttpOnly
    pub httponly: bool,
    /// Cookie domain from the host's cookie-domain policy
    pub domain: Option<String>,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            cookie_key: derive_cookie_key("session", None),
            remember_me: false,
            remember_me_for: DEFAULT_REMEMBER_FOR,
            secure: true,
            sign_cookie: false,
            httponly: true,
            domain: None,
        }
    }
}

impl PersistenceConfig {
    /// Config keyed off a session subject name, e.g. `"UserSession"`
    /// becomes the `user_session_credentials` cookie.
    pub fn for_subject(subject: &str) -> Self {
        Self {
            cookie_key: derive_cookie_key(subject, None),
            ..Default::default()
        }
    }
}

/// Per-instance overrides; `None` falls through to the class default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigOverrides {
    pub cookie_key: Option<String>,
    pub remember_me: Option<bool>,
    pub remember_me_for: Option<Duration>,
    pub secure: Option<bool>,
    pub sign_cookie: Option<bool>,
    pub httponly: Option<bool>,
    pub domain: Option<String>,
}

/// One session instance's resolved view of the configuration.
///
/// Accessors resolve lazily and memoize; within one instance's lifetime a
/// setting is never recomputed after first access.
#[derive(Debug, Default)]
pub struct InstanceConfig {
    defaults: PersistenceConfig,
    overrides: ConfigOverrides,
    cookie_key: OnceLock<String>,
    remember_me: OnceLock<bool>,
    remember_me_for: OnceLock<Duration>,
    secure: OnceLock<bool>,
    sign_cookie: OnceLock<bool>,
    httponly: OnceLock<bool>,
    domain: OnceLock<Option<String>>,
}

impl InstanceConfig {
    pub fn new(defaults: PersistenceConfig, overrides: ConfigOverrides) -> Self {
        Self {
            defaults,
            overrides,
            ..Default::default()
        }
    }

    /// Config with no instance overrides.
    pub fn from_defaults(defaults: PersistenceConfig) -> Self {
        Self::new(defaults, ConfigOverrides::default())
    }

    pub fn cookie_key(&self) -> &str {
        self.cookie_key.get_or_init(|| {
            self.overrides
                .cookie_key
                .clone()
                .unwrap_or_else(|| self.defaults.cookie_key.clone())
        })
    }

    pub fn remember_me(&self) -> bool {
        *self
            .remember_me
            .get_or_init(|| self.overrides.remember_me.unwrap_or(self.defaults.remember_me))
    }

    pub fn remember_me_for(&self) -> Duration {
        *self.remember_me_for.get_or_init(|| {
            self.overrides
                .remember_me_for
                .unwrap_or(self.defaults.remember_me_for)
        })
    }

    pub fn secure(&self) -> bool {
        *self
            .secure
            .get_or_init(|| self.overrides.secure.unwrap_or(self.defaults.secure))
    }

    pub fn sign_cookie(&self) -> bool {
        *self
            .sign_cookie
            .get_or_init(|| self.overrides.sign_cookie.unwrap_or(self.defaults.sign_cookie))
    }

    pub fn httponly(&self) -> bool {
        *self
            .httponly
            .get_or_init(|| self.overrides.httponly.unwrap_or(self.defaults.httponly))
    }

    pub fn domain(&self) -> Option<&str> {
        self.domain
            .get_or_init(|| {
                self.overrides
                    .domain
                    .clone()
                    .or_else(|| self.defaults.domain.clone())
            })
            .as_deref()
    }

    /// Fail fast when signing is enabled against a jar that cannot sign.
    pub fn validate_jar<J: CookieJar>(&self, jar: &J) -> PersistResult<()> {
        if self.sign_cookie() && !jar.supports_signed() {
            return Err(PersistError::SigningUnsupported);
        }
        Ok(())
    }
}

/// Derive the cookie key for a session subject.
///
/// The base is the lowercase underscored form of the subject suffixed
/// `_credentials`; an instance-supplied `id` prefixes the key so concurrent
/// session types in one application do not collide on cookie names.
pub fn derive_cookie_key(subject: &str, id: Option<&str>) -> String {
    let base = snake_case(subject);
    match id {
        Some(id) => format!("{id}_{base}_credentials"),
        None => format!("{base}_credentials"),
    }
}

fn snake_case(subject: &str) -> String {
    let mut out = String::with_capacity(subject.len() + 4);
    let mut prev_lower = false;
    for c in subject.chars() {
        if c.is_uppercase() {
            if prev_lower && !out.ends_with('_') {
                out.push('_');
            }
            out.extend(c.to_lowercase());
            prev_lower = false;
        } else if c.is_alphanumeric() {
            out.push(c);
            prev_lower = true;
        } else {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            prev_lower = false;
        }
    }
    out.trim_matches('_').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_cookie_key() {
        assert_eq!(derive_cookie_key("UserSession", None), "user_session_credentials");
        assert_eq!(derive_cookie_key("Admin", None), "admin_credentials");
        assert_eq!(
            derive_cookie_key("UserSession", Some("api")),
            "api_user_session_credentials"
        );
        assert_eq!(derive_cookie_key("staff session", None), "staff_session_credentials");
    }

    #[test]
    fn test_default_config() {
        let config = PersistenceConfig::default();
        assert_eq!(config.cookie_key, "session_credentials");
        assert!(!config.remember_me);
        assert_eq!(config.remember_me_for, Duration::from_secs(90 * 24 * 3600));
        assert!(config.secure);
        assert!(config.httponly);
        assert!(!config.sign_cookie);
    }

    #[test]
    fn test_override_beats_default() {
        let overrides = ConfigOverrides {
            cookie_key: Some("admin_credentials".to_string()),
            secure: Some(false),
            ..Default::default()
        };
        let config = InstanceConfig::new(PersistenceConfig::default(), overrides);

        assert_eq!(config.cookie_key(), "admin_credentials");
        assert!(!config.secure());
        // Untouched settings fall through to class defaults
        assert!(config.httponly());
        assert!(!config.remember_me());
    }

    #[test]
    fn test_resolution_is_stable_across_accesses() {
        let config = InstanceConfig::from_defaults(PersistenceConfig::default());
        let first = config.cookie_key().to_string();
        assert_eq!(config.cookie_key(), first);
        assert_eq!(config.secure(), config.secure());
    }

    #[test]
    fn test_domain_override() {
        let overrides = ConfigOverrides {
            domain: Some(".example.com".to_string()),
            ..Default::default()
        };
        let config = InstanceConfig::new(PersistenceConfig::default(), overrides);
        assert_eq!(config.domain(), Some(".example.com"));
    }
}
