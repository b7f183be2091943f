//! Stateless security and formatting helpers
//!
//! Password hashing, `YYYY-MM-DD` date conversion and UUID shape checking,
//! consumed by column constraints and the authentication flow.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use sha2::{Digest, Sha256};

use crate::error::ValidationError;

/// Canonical text form of a UUID: lowercase hex, 8-4-4-4-12.
static UUID_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new("^[a-f0-9]{8}-([a-f0-9]{4}-){3}[a-f0-9]{12}$").expect("valid UUID regex")
});

/// Wire format for dates exchanged with clients and the store.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Hash a password with a single round of SHA-256, hex encoded.
///
/// This matches what the store already contains; switching to a salted KDF
/// would invalidate every stored credential and is a product decision.
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Compare a candidate password against a stored hash.
pub fn check_password(password: &str, hashed_password: &str) -> bool {
    hash_password(password) == hashed_password
}

/// Parse a `YYYY-MM-DD` string into a date.
pub fn date_from_string(raw: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| {
        ValidationError::new(
            "date",
            format!("La date {raw} est invalide (format attendu : AAAA-MM-JJ)."),
        )
    })
}

/// Format a date as `YYYY-MM-DD`.
pub fn date_to_string(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Check that a string has the canonical UUID text shape.
pub fn is_valid_uuid(raw: &str) -> bool {
    UUID_SHAPE.is_match(raw)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password_is_deterministic() {
        assert_eq!(hash_password("secret1"), hash_password("secret1"));
        assert_ne!(hash_password("secret1"), hash_password("secret2"));
    }

    #[test]
    fn test_hash_password_is_sha256_hex() {
        let digest = hash_password("pandamonium");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_check_password() {
        let stored = hash_password("secret1");
        assert!(check_password("secret1", &stored));
        assert!(!check_password("secret2", &stored));
    }

    #[test]
    fn test_date_round_trip() {
        let date = date_from_string("2000-01-01").unwrap();
        assert_eq!(date_to_string(date), "2000-01-01");
    }

    #[test]
    fn test_date_from_string_rejects_garbage() {
        let err = date_from_string("01/01/2000").unwrap_err();
        assert_eq!(err.field, "date");
        assert!(err.message.contains("01/01/2000"));
    }

    #[test]
    fn test_is_valid_uuid() {
        assert!(is_valid_uuid("123e4567-e89b-12d3-a456-426614174000"));
        assert!(is_valid_uuid(&uuid::Uuid::new_v4().to_string()));
        // Uppercase hex, wrong grouping and wrong length are all rejected.
        assert!(!is_valid_uuid("123E4567-E89B-12D3-A456-426614174000"));
        assert!(!is_valid_uuid("123e4567e89b12d3a456426614174000"));
        assert!(!is_valid_uuid("123e4567-e89b-12d3-a456-42661417400"));
        assert!(!is_valid_uuid(""));
    }
}

// =============================================================================
// PROPERTY-BASED TESTS
// =============================================================================
