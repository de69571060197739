//! Short code drawing and name validation.
//!
//! The uniqueness loop lives in [`crate::application::services::CodeGenerator`];
//! this module only draws candidates and checks their shape.

use crate::error::AppError;
use rand::Rng;
use serde_json::json;

/// 62 symbols: lowercase, uppercase, digits.
pub const ALPHABET: &[u8; 62] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

pub const DEFAULT_CODE_LENGTH: usize = 6;
pub const MIN_CODE_LENGTH: usize = 4;
pub const MAX_CODE_LENGTH: usize = 20;

/// Names that would shadow service routes.
pub const RESERVED_NAMES: &[&str] = &["api", "health", "l", "static"];

/// Draws `length` characters uniformly from [`ALPHABET`].
///
/// Does not check uniqueness.
pub fn random_code(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Validates a user-chosen alias.
///
/// # Rules
///
/// - Matches `^[A-Za-z0-9_-]{3,50}$`
/// - Is not a reserved route segment
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_alias(alias: &str) -> Result<(), AppError> {
    if !super::validation::is_valid_slug(alias) {
        return Err(AppError::bad_request(
            "Alias must be 3-50 characters of letters, digits, '-' or '_'",
            json!({ "field": "alias", "alias": alias }),
        ));
    }

    if RESERVED_NAMES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(alias))
    {
        return Err(AppError::bad_request(
            "This alias is reserved",
            json!({ "field": "alias", "alias": alias }),
        ));
    }

    Ok(())
}

/// Validates a requested code length.
pub fn validate_code_length(length: usize) -> Result<(), AppError> {
    if !(MIN_CODE_LENGTH..=MAX_CODE_LENGTH).contains(&length) {
        return Err(AppError::bad_request(
            format!("Code length must be between {MIN_CODE_LENGTH} and {MAX_CODE_LENGTH}"),
            json!({ "length": length }),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_random_code_has_requested_length() {
        assert_eq!(random_code(6).len(), 6);
        assert_eq!(random_code(12).len(), 12);
    }

    #[test]
    fn test_random_code_uses_alphabet_only() {
        for _ in 0..200 {
            let code = random_code(DEFAULT_CODE_LENGTH);
            assert!(code.bytes().all(|b| ALPHABET.contains(&b)));
        }
    }

    #[test]
    fn test_random_code_produces_unique_codes() {
        let codes: HashSet<String> = (0..1000).map(|_| random_code(10)).collect();
        assert_eq!(codes.len(), 1000);
    }

    #[test]
    fn test_alphabet_has_no_duplicates() {
        let unique: HashSet<u8> = ALPHABET.iter().copied().collect();
        assert_eq!(unique.len(), 62);
    }

    #[test]
    fn test_validate_alias_accepts_valid() {
        assert!(validate_alias("nextjs").is_ok());
        assert!(validate_alias("My_Link-2024").is_ok());
        assert!(validate_alias("abc").is_ok());
    }

    #[test]
    fn test_validate_alias_rejects_invalid() {
        assert!(validate_alias("ab").is_err());
        assert!(validate_alias(&"a".repeat(51)).is_err());
        assert!(validate_alias("has space").is_err());
        assert!(validate_alias("slash/es").is_err());
    }

    #[test]
    fn test_validate_alias_rejects_reserved() {
        assert!(validate_alias("api").is_err());
        assert!(validate_alias("HEALTH").is_err());
    }

    #[test]
    fn test_validate_code_length_bounds() {
        assert!(validate_code_length(3).is_err());
        assert!(validate_code_length(4).is_ok());
        assert!(validate_code_length(20).is_ok());
        assert!(validate_code_length(21).is_err());
    }
}
