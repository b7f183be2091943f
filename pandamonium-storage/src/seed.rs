//! Development seed data
//!
//! The default rows inserted by `reset(true)`: one account, one community
//! and its root branch. The SQLite backend gets the same rows from
//! `sql/schema_dev.sql`; this module is the source the in-memory backend
//! uses, and the two must stay in sync.

use chrono::NaiveDate;
use uuid::Uuid;

use pandamonium_core::entities::{BAMBOO_SCHEMA, BRANCH_SCHEMA, USER_SCHEMA};
use pandamonium_core::{FieldValue, Record, UuidList};

pub const DEV_USER_UUID: &str = "67454b23-5f2e-4680-8db8-df17be6c1461";
pub const DEV_BAMBOO_UUID: &str = "19fd9a17-d4d0-4bb3-a1bc-2bb4a715341c";
pub const DEV_BRANCH_UUID: &str = "09a4e319-4ce4-4723-8d01-b2cb41368ee0";

pub const DEV_USERNAME: &str = "panda";
pub const DEV_EMAIL: &str = "panda@pandamonium.net";
/// SHA-256 of "pandamonium".
pub const DEV_PASSWORD_HASH: &str =
    "0083b931d80dcb0792c7d6345f317a59e97d21414b5d80603de89d0412f465f7";

fn seed_uuid(text: &str) -> Uuid {
    Uuid::parse_str(text).expect("seed uuids are canonical")
}

fn seed_date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("seed dates are valid")
}

/// The default rows, in insertion order (users before the rows referencing
/// them).
pub fn default_records() -> Vec<Record> {
    let user_uuid = seed_uuid(DEV_USER_UUID);
    let bamboo_uuid = seed_uuid(DEV_BAMBOO_UUID);
    let epoch = seed_date(2024, 1, 1);

    let user = Record::new(&USER_SCHEMA, Some(user_uuid), vec![
        DEV_USERNAME.into(),
        DEV_EMAIL.into(),
        DEV_PASSWORD_HASH.into(),
        seed_date(1995, 5, 12).into(),
        UuidList::new().into(),
        UuidList::new().into(),
        UuidList::single(DEV_BAMBOO_UUID)
            .expect("seed uuids are canonical")
            .into(),
        epoch.into(),
        epoch.into(),
        FieldValue::Null,
        "Panda".into(),
        FieldValue::Null,
        FieldValue::Null,
        FieldValue::Null,
    ]);

    let bamboo = Record::new(&BAMBOO_SCHEMA, Some(bamboo_uuid), vec![
        "La Bambouseraie".into(),
        epoch.into(),
        UuidList::single(DEV_USER_UUID)
            .expect("seed uuids are canonical")
            .into(),
        user_uuid.into(),
    ]);

    let branch = Record::new(&BRANCH_SCHEMA, Some(seed_uuid(DEV_BRANCH_UUID)), vec![
        "racine".into(),
        bamboo_uuid.into(),
    ]);

    vec![user, bamboo, branch]
}
