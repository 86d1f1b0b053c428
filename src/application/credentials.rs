//! Credential Input Normalization
//!
//! Harvests a remember-preference embedded in credential input without
//! altering any other semantics of the input it wraps. Input is modeled as
//! JSON: a mapping (e.g. a login form body) or a positional sequence.

use serde_json::Value;

/// Normalize a remember-preference value.
///
/// Truthy forms are `true` and the strings `"true"` / `"1"`; everything
/// else is false.
pub fn remember_preference_from(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s == "true" || s == "1",
        _ => false,
    }
}

/// Extract a remember-preference from credential input.
///
/// Precedence: an explicit `remember_me` key in a mapping wins outright;
/// otherwise the first boolean-typed element of a positional sequence;
/// otherwise `None`, leaving the class-level default in effect.
pub fn harvest_remember_preference(credentials: &Value) -> Option<bool> {
    match credentials {
        Value::Object(map) => map.get("remember_me").map(remember_preference_from),
        Value::Array(items) => items.iter().find_map(|item| match item {
            Value::Bool(b) => Some(*b),
            _ => None,
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalization_truthy_forms() {
        assert!(remember_preference_from(&json!(true)));
        assert!(remember_preference_from(&json!("true")));
        assert!(remember_preference_from(&json!("1")));

        assert!(!remember_preference_from(&json!(false)));
        assert!(!remember_preference_from(&json!("yes")));
        assert!(!remember_preference_from(&json!("0")));
        assert!(!remember_preference_from(&json!(1)));
        assert!(!remember_preference_from(&json!(null)));
    }

    #[test]
    fn test_mapping_key_wins() {
        assert_eq!(
            harvest_remember_preference(&json!({"login": "kim", "remember_me": true})),
            Some(true)
        );
        assert_eq!(
            harvest_remember_preference(&json!({"remember_me": "1"})),
            Some(true)
        );
        // An explicit falsy key still wins outright
        assert_eq!(
            harvest_remember_preference(&json!({"remember_me": "0"})),
            Some(false)
        );
    }

    #[test]
    fn test_positional_first_boolean() {
        assert_eq!(
            harvest_remember_preference(&json!(["s3cret", true])),
            Some(true)
        );
        assert_eq!(
            harvest_remember_preference(&json!(["s3cret", false, true])),
            Some(false)
        );
        // Strings are not boolean-typed in positional inputs
        assert_eq!(harvest_remember_preference(&json!(["s3cret", "true"])), None);
    }

    #[test]
    fn test_absent_leaves_default() {
        assert_eq!(harvest_remember_preference(&json!({"login": "kim"})), None);
        assert_eq!(harvest_remember_preference(&json!(["s3cret"])), None);
        assert_eq!(harvest_remember_preference(&json!("s3cret")), None);
    }
}
