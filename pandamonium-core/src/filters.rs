//! Column constraints for the concrete entities
//!
//! The free functions here plug into `Constraint::Check`; length and range
//! limits are declared inline in the schemas with `Constraint::MaxLen` and
//! friends. Rejection messages are the exact strings shown to users.

use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::record::FieldValue;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\w.-]{3,16}$").expect("valid username regex"));

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\w.-]+@([\w-]+\.)+[\w-]{2,4}$").expect("valid email regex"));

/// Minimum age to register, in days (365.25 days per year).
const MINIMUM_AGE_DAYS: f64 = 15.0 * 365.25;

/// 3 to 16 word characters, hyphens, dots or underscores.
pub fn username(value: &FieldValue) -> Result<(), String> {
    match value.as_text() {
        Some(name) if USERNAME_RE.is_match(name) => Ok(()),
        _ => Err(
            "Votre nom d'utilisateur doit faire entre 3 et 16 caractères alphanumériques \
             pouvant contenir des tirets (-), des points (.) ou des underscores (_)."
                .to_string(),
        ),
    }
}

/// Single `@`, dotted domain, 2-4 character TLD.
pub fn email(value: &FieldValue) -> Result<(), String> {
    match value.as_text() {
        Some(address) if EMAIL_RE.is_match(address) => Ok(()),
        _ => Err("Le format de votre adresse email est invalide.".to_string()),
    }
}

/// At least ~15 years before today.
pub fn date_of_birth(value: &FieldValue) -> Result<(), String> {
    let today = Utc::now().date_naive();

    match value.as_date() {
        Some(date) if (today - date).num_days() as f64 >= MINIMUM_AGE_DAYS => Ok(()),
        _ => Err("Vous êtes trop jeune pour inscrire sur PANDAMONIUM.".to_string()),
    }
}

// Messages reused by the length/range constraints declared in the schemas.

pub const PASSWORD_MESSAGE: &str = "Votre mot de passe doit faire entre 6 et 64 caractères.";
pub const PRONOUNS_MESSAGE: &str = "Vos pronoms sont trop longs.";
pub const PUBLIC_NAME_MESSAGE: &str = "Votre pseudo public est trop long.";
pub const PRIVATE_NAME_MESSAGE: &str = "Votre pseudo privé est trop long.";
pub const PUBLIC_BIO_MESSAGE: &str = "Votre bio publique est trop longue.";
pub const PRIVATE_BIO_MESSAGE: &str = "Votre bio privée est trop longue.";
pub const FRIENDS_MESSAGE: &str = "Vous avez trop d'amis (100 maximum).";
pub const RELATIONS_MESSAGE: &str = "Vous avez trop de connaissances (100 maximum).";
pub const BAMBOOS_MESSAGE: &str = "Vous avez trop de bambous (100 maximum).";
pub const BAMBOO_NAME_MESSAGE: &str = "Le nom de votre bambou est trop long.";
pub const BRANCH_NAME_MESSAGE: &str = "Le nom de votre branche est trop long.";
pub const MESSAGE_CONTENT_MESSAGE: &str = "Votre message est trop court pour être envoyé.";
pub const ROLE_NAME_MESSAGE: &str =
    "Le nom donné à ce rôle est trop long (50 caractères maximum).";
pub const ROLE_HIERARCHY_MESSAGE: &str =
    "La hiérarchie d'un rôle doit être comprise entre 0 et 100.";

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn test_username_shapes() {
        assert!(username(&"alice".into()).is_ok());
        assert!(username(&"al.ice-42_".into()).is_ok());
        assert!(username(&"ab".into()).is_err());
        assert!(username(&"seventeen-chars-x".into()).is_err());
        assert!(username(&"spaced name".into()).is_err());
    }

    #[test]
    fn test_email_shapes() {
        assert!(email(&"a@example.com".into()).is_ok());
        assert!(email(&"first.last@sub.example.org".into()).is_ok());
        assert!(email(&"no-at-sign".into()).is_err());
        assert!(email(&"a@nodot".into()).is_err());
        assert!(email(&"a@example.toolong".into()).is_err());
    }

    #[test]
    fn test_date_of_birth_minimum_age() {
        let adult = (Utc::now().date_naive() - Duration::days(20 * 366)).into();
        assert!(date_of_birth(&adult).is_ok());

        let child = (Utc::now().date_naive() - Duration::days(10 * 365)).into();
        let err = date_of_birth(&child).unwrap_err();
        assert!(err.contains("trop jeune"));
    }

    #[test]
    fn test_date_of_birth_exact_boundary() {
        // 15 * 365.25 rounds up to 5479 days; one day short is rejected.
        let boundary = Utc::now().date_naive() - Duration::days(5479);
        assert!(date_of_birth(&boundary.into()).is_ok());

        let short = Utc::now().date_naive() - Duration::days(5478);
        assert!(date_of_birth(&short.into()).is_err());
    }
}
