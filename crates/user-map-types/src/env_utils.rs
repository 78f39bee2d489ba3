//! Environment variable parsing utilities.
//!
//! ```
//! use user_map_types::env_utils::{env_string, env_var_or};
//!
//! let attempts: usize = env_var_or("USER_MAP_RETRY_ATTEMPTS", 3);
//! let signer: Option<String> = env_string("USER_MAP_SIGNER_URL");
//! ```

use std::str::FromStr;

/// Parse an environment variable into a type that implements `FromStr`.
///
/// Returns `None` if the variable is not set or cannot be parsed.
pub fn env_var<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Parse an environment variable with a default value.
pub fn env_var_or<T: FromStr>(key: &str, default: T) -> T {
    env_var(key).unwrap_or(default)
}

/// Read a string variable, treating unset and blank values alike.
pub fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Check a boolean flag (`1`, `true`, `yes`, case-insensitive).
pub fn env_bool(key: &str) -> bool {
    std::env::var(key)
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_vars() {
        assert_eq!(env_var::<u64>("USER_MAP_TYPES_TEST_UNSET_1"), None);
        assert_eq!(env_var_or("USER_MAP_TYPES_TEST_UNSET_2", 7u64), 7);
        assert_eq!(env_string("USER_MAP_TYPES_TEST_UNSET_3"), None);
        assert!(!env_bool("USER_MAP_TYPES_TEST_UNSET_4"));
    }

    #[test]
    fn test_blank_string_is_none() {
        std::env::set_var("USER_MAP_TYPES_TEST_BLANK", "   ");
        assert_eq!(env_string("USER_MAP_TYPES_TEST_BLANK"), None);
        std::env::set_var("USER_MAP_TYPES_TEST_SET", " 42 ");
        assert_eq!(env_var::<u64>("USER_MAP_TYPES_TEST_SET"), Some(42));
        assert_eq!(env_string("USER_MAP_TYPES_TEST_SET").as_deref(), Some("42"));
    }
}
