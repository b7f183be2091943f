//! User - one account on the network
//!
//! Carries the credentials, the profile (pronouns, public/private display
//! names and bios), the social lists (friends, professional relations,
//! joined bamboos) and the registration/last-connection dates. The column
//! order below mirrors the `users` table.

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::entities::Entity;
use crate::error::ValidationError;
use crate::filters;
use crate::record::{
    Constraint, FieldDef, FieldKind, FieldValue, Record, TableSchema, UUID_FIELD,
};
use crate::uuid_list::UuidList;

pub static USER_SCHEMA: TableSchema = TableSchema {
    table: "users",
    fields: &[
        UUID_FIELD,
        FieldDef::constrained(
            "username",
            FieldKind::Text,
            Constraint::Check(filters::username),
        )
        .unique(),
        FieldDef::constrained("email", FieldKind::Text, Constraint::Check(filters::email))
            .unique(),
        FieldDef::constrained(
            "password",
            FieldKind::Text,
            Constraint::LenRange {
                min: 6,
                max: 64,
                message: filters::PASSWORD_MESSAGE,
            },
        ),
        FieldDef::constrained(
            "date_of_birth",
            FieldKind::Date,
            Constraint::Check(filters::date_of_birth),
        ),
        FieldDef::constrained(
            "friends",
            FieldKind::UuidList,
            Constraint::MaxUuids {
                max: 100,
                message: filters::FRIENDS_MESSAGE,
            },
        ),
        FieldDef::constrained(
            "relations",
            FieldKind::UuidList,
            Constraint::MaxUuids {
                max: 100,
                message: filters::RELATIONS_MESSAGE,
            },
        ),
        FieldDef::constrained(
            "bamboos",
            FieldKind::UuidList,
            Constraint::MaxUuids {
                max: 100,
                message: filters::BAMBOOS_MESSAGE,
            },
        ),
        FieldDef::new("registration_date", FieldKind::Date),
        FieldDef::new("last_connection_date", FieldKind::Date),
        FieldDef::constrained(
            "pronouns",
            FieldKind::Text,
            Constraint::MaxLen {
                max: 50,
                message: filters::PRONOUNS_MESSAGE,
            },
        ),
        FieldDef::constrained(
            "public_display_name",
            FieldKind::Text,
            Constraint::MaxLen {
                max: 50,
                message: filters::PUBLIC_NAME_MESSAGE,
            },
        ),
        FieldDef::constrained(
            "public_bio",
            FieldKind::Text,
            Constraint::MaxLen {
                max: 300,
                message: filters::PUBLIC_BIO_MESSAGE,
            },
        ),
        FieldDef::constrained(
            "private_display_name",
            FieldKind::Text,
            Constraint::MaxLen {
                max: 50,
                message: filters::PRIVATE_NAME_MESSAGE,
            },
        ),
        FieldDef::constrained(
            "private_bio",
            FieldKind::Text,
            Constraint::MaxLen {
                max: 300,
                message: filters::PRIVATE_BIO_MESSAGE,
            },
        ),
    ],
};

/// One registered account.
#[derive(Debug, Clone)]
pub struct User {
    record: Record,
}

impl User {
    /// Build a fresh account. `password_hash` is the already-hashed
    /// credential; raw passwords are validated and hashed by the caller
    /// before they get anywhere near a record. Social lists start empty,
    /// both date columns start at today, profile columns start unset.
    pub fn new(username: &str, email: &str, password_hash: &str, date_of_birth: NaiveDate) -> Self {
        let today = Utc::now().date_naive();

        let record = Record::new(&USER_SCHEMA, None, vec![
            username.into(),
            email.into(),
            password_hash.into(),
            date_of_birth.into(),
            UuidList::new().into(),
            UuidList::new().into(),
            UuidList::new().into(),
            today.into(),
            today.into(),
            FieldValue::Null,
            FieldValue::Null,
            FieldValue::Null,
            FieldValue::Null,
            FieldValue::Null,
        ]);

        Self { record }
    }

    /// Set the pronouns shown on the profile.
    pub fn with_pronouns(mut self, pronouns: &str) -> Self {
        let _ = self.record.set("pronouns", pronouns.into());
        self
    }

    /// Set the publicly visible display name.
    pub fn with_public_display_name(mut self, name: &str) -> Self {
        let _ = self.record.set("public_display_name", name.into());
        self
    }

    /// Set the display name shown to friends.
    pub fn with_private_display_name(mut self, name: &str) -> Self {
        let _ = self.record.set("private_display_name", name.into());
        self
    }

    /// Set the publicly visible bio.
    pub fn with_public_bio(mut self, bio: &str) -> Self {
        let _ = self.record.set("public_bio", bio.into());
        self
    }

    /// Set the bio shown to friends.
    pub fn with_private_bio(mut self, bio: &str) -> Self {
        let _ = self.record.set("private_bio", bio.into());
        self
    }

    pub fn username(&self) -> Option<&str> {
        self.record.get("username").and_then(FieldValue::as_text)
    }

    pub fn email(&self) -> Option<&str> {
        self.record.get("email").and_then(FieldValue::as_text)
    }

    /// Stored password hash.
    pub fn password_hash(&self) -> Option<&str> {
        self.record.get("password").and_then(FieldValue::as_text)
    }

    pub fn date_of_birth(&self) -> Option<NaiveDate> {
        self.record.get("date_of_birth").and_then(FieldValue::as_date)
    }

    pub fn registration_date(&self) -> Option<NaiveDate> {
        self.record
            .get("registration_date")
            .and_then(FieldValue::as_date)
    }

    pub fn last_connection_date(&self) -> Option<NaiveDate> {
        self.record
            .get("last_connection_date")
            .and_then(FieldValue::as_date)
    }

    pub fn pronouns(&self) -> Option<&str> {
        self.record.get("pronouns").and_then(FieldValue::as_text)
    }

    pub fn public_display_name(&self) -> Option<&str> {
        self.record
            .get("public_display_name")
            .and_then(FieldValue::as_text)
    }

    pub fn public_bio(&self) -> Option<&str> {
        self.record.get("public_bio").and_then(FieldValue::as_text)
    }

    pub fn private_display_name(&self) -> Option<&str> {
        self.record
            .get("private_display_name")
            .and_then(FieldValue::as_text)
    }

    pub fn private_bio(&self) -> Option<&str> {
        self.record.get("private_bio").and_then(FieldValue::as_text)
    }

    fn uuid_list(&self, column: &str) -> UuidList {
        self.record
            .get(column)
            .and_then(FieldValue::as_uuid_list)
            .cloned()
            .unwrap_or_default()
    }

    pub fn friends(&self) -> UuidList {
        self.uuid_list("friends")
    }

    pub fn relations(&self) -> UuidList {
        self.uuid_list("relations")
    }

    pub fn bamboos(&self) -> UuidList {
        self.uuid_list("bamboos")
    }

    /// Record membership of a bamboo on the user side.
    pub fn join_bamboo(&mut self, bamboo_uuid: Uuid) -> Result<(), ValidationError> {
        let mut bamboos = self.bamboos();
        bamboos
            .append(&bamboo_uuid.to_string())
            .expect("canonical uuid text always appends");
        self.record.set("bamboos", bamboos.into())
    }
}

impl Entity for User {
    const SCHEMA: &'static TableSchema = &USER_SCHEMA;

    fn record(&self) -> &Record {
        &self.record
    }

    fn record_mut(&mut self) -> &mut Record {
        &mut self.record
    }

    fn from_record(record: Record) -> Self {
        Self { record }
    }
}

// =============================================================================
// TESTS
// =============================================================================
