//! Short code generation and validation utilities.
//!
//! Codes are drawn from the 62-character alphanumeric alphabet. Random codes
//! are always [`RANDOM_CODE_LENGTH`] characters; custom codes may be 6 to 8.

use std::sync::LazyLock;

use rand::Rng;
use rand::distr::Alphanumeric;
use regex::Regex;
use serde_json::json;

use crate::error::AppError;

/// Length of randomly generated codes.
pub const RANDOM_CODE_LENGTH: usize = 6;

/// Alphabet used for the time-derived fallback code. Same set as [`Alphanumeric`].
const BASE62_ALPHABET: &[u8; 62] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Compiled regex for custom code validation.
static CUSTOM_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]{6,8}$").expect("static regex"));

/// Codes shadowed by fixed routes and therefore unreachable as redirects.
const RESERVED_CODES: &[&str] = &["healthz"];

/// Generates a random short code of [`RANDOM_CODE_LENGTH`] characters.
///
/// Each character is drawn uniformly from `[A-Za-z0-9]`, giving 62^6 possible codes.
/// Uniqueness is not checked here; the store rejects duplicates on insert.
///
/// # Examples
///
/// ```ignore
/// let code = generate_code();
/// assert_eq!(code.len(), 6);
/// assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
pub fn generate_code() -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(RANDOM_CODE_LENGTH)
        .map(char::from)
        .collect()
}

/// Derives a last-resort code from a Unix timestamp in milliseconds.
///
/// The timestamp is base-62 encoded and the last [`RANDOM_CODE_LENGTH`] characters
/// are kept (left-padded with `0`). Two calls within the same millisecond, or
/// 62^6 ms apart, produce the same code, so callers must still expect a conflict.
pub fn fallback_code(unix_millis: u64) -> String {
    let mut digits = Vec::new();
    let mut n = unix_millis;

    loop {
        digits.push(BASE62_ALPHABET[(n % 62) as usize]);
        n /= 62;
        if n == 0 {
            break;
        }
    }

    while digits.len() < RANDOM_CODE_LENGTH {
        digits.push(b'0');
    }

    digits
        .iter()
        .take(RANDOM_CODE_LENGTH)
        .rev()
        .map(|&b| char::from(b))
        .collect()
}

/// Validates a user-provided custom short code.
///
/// # Rules
///
/// - Length: 6-8 characters
/// - Allowed characters: ASCII letters (case-sensitive) and digits
/// - Cannot be a reserved route name
///
/// # Errors
///
/// Returns [`AppError::InvalidCodeFormat`] if any rule is violated.
pub fn validate_custom_code(code: &str) -> Result<(), AppError> {
    if !CUSTOM_CODE_REGEX.is_match(code) {
        return Err(AppError::invalid_code_format(
            "Custom code must match [A-Za-z0-9]{6,8}",
            json!({ "code": code }),
        ));
    }

    if RESERVED_CODES.contains(&code) {
        return Err(AppError::invalid_code_format(
            "This code is reserved",
            json!({ "code": code }),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_code_has_correct_length() {
        let code = generate_code();
        assert_eq!(code.len(), RANDOM_CODE_LENGTH);
    }

    #[test]
    fn test_generate_code_alphanumeric_only() {
        for _ in 0..200 {
            let code = generate_code();
            assert!(code.chars().all(|c| c.is_ascii_alphanumeric()), "{code}");
        }
    }

    #[test]
    fn test_generated_codes_pass_custom_validation() {
        for _ in 0..200 {
            assert!(validate_custom_code(&generate_code()).is_ok());
        }
    }

    #[test]
    fn test_generate_code_produces_distinct_codes() {
        let codes: HashSet<String> = (0..1000).map(|_| generate_code()).collect();
        // 62^6 space; a handful of collisions in 1000 draws would be astronomically unlikely
        assert!(codes.len() >= 999);
    }

    #[test]
    fn test_fallback_code_is_six_alphanumeric_chars() {
        let code = fallback_code(1_760_000_000_000);
        assert_eq!(code.len(), 6);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_fallback_code_small_values_are_padded() {
        assert_eq!(fallback_code(0), "000000");
        assert_eq!(fallback_code(61), "00000z");
        assert_eq!(fallback_code(62), "000010");
    }

    #[test]
    fn test_fallback_code_keeps_low_order_digits() {
        // 62^6 and 62^6 + 1 differ only in the low digits once truncated
        let base = 62u64.pow(6);
        assert_eq!(fallback_code(base), "000000");
        assert_eq!(fallback_code(base + 1), "000001");
    }

    #[test]
    fn test_fallback_code_is_deterministic() {
        assert_eq!(fallback_code(123_456_789), fallback_code(123_456_789));
        assert_ne!(fallback_code(123_456_789), fallback_code(123_456_790));
    }

    #[test]
    fn test_validate_boundary_lengths() {
        assert!(validate_custom_code("abc123").is_ok());
        assert!(validate_custom_code("abcd1234").is_ok());
        assert!(validate_custom_code("abc12").is_err());
        assert!(validate_custom_code("abcd12345").is_err());
    }

    #[test]
    fn test_validate_mixed_case_allowed() {
        assert!(validate_custom_code("MyCode12").is_ok());
        assert!(validate_custom_code("ABCDEF").is_ok());
    }

    #[test]
    fn test_validate_rejects_non_alphanumeric() {
        for code in ["my-code", "my_code1", "code 12", "c@de123", "kód1234", "abc12\n"] {
            let result = validate_custom_code(code);
            assert!(
                matches!(result, Err(AppError::InvalidCodeFormat { .. })),
                "{code:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_validate_empty_string() {
        assert!(validate_custom_code("").is_err());
    }

    #[test]
    fn test_validate_reserved_codes() {
        for &reserved in RESERVED_CODES {
            let result = validate_custom_code(reserved);
            assert!(
                matches!(result, Err(AppError::InvalidCodeFormat { .. })),
                "Reserved code '{}' should be invalid",
                reserved
            );
        }
    }
}
