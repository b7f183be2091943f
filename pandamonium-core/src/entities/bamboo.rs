//! Bamboo - one community space
//!
//! A bamboo is a virtual place where members discuss in branches. It knows
//! its owner and keeps its member list as a UUID chain; the owner is always
//! the first member.

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::entities::Entity;
use crate::error::ValidationError;
use crate::filters;
use crate::record::{Constraint, FieldDef, FieldKind, FieldValue, Record, TableSchema, UUID_FIELD};
use crate::uuid_list::UuidList;

pub static BAMBOO_SCHEMA: TableSchema = TableSchema {
    table: "bamboos",
    fields: &[
        UUID_FIELD,
        FieldDef::constrained(
            "name",
            FieldKind::Text,
            Constraint::MaxLen {
                max: 50,
                message: filters::BAMBOO_NAME_MESSAGE,
            },
        ),
        FieldDef::new("creation_date", FieldKind::Date),
        FieldDef::new("members", FieldKind::UuidList),
        FieldDef::new("owner_uuid", FieldKind::Uuid),
    ],
};

/// One community space.
#[derive(Debug, Clone)]
pub struct Bamboo {
    record: Record,
}

impl Bamboo {
    /// Build a fresh bamboo owned by `owner_uuid`. The member list starts
    /// with exactly the owner.
    pub fn new(name: &str, owner_uuid: Uuid) -> Self {
        let members = UuidList::single(&owner_uuid.to_string())
            .expect("canonical uuid text always appends");

        let record = Record::new(&BAMBOO_SCHEMA, None, vec![
            name.into(),
            Utc::now().date_naive().into(),
            members.into(),
            owner_uuid.into(),
        ]);

        Self { record }
    }

    pub fn name(&self) -> Option<&str> {
        self.record.get("name").and_then(FieldValue::as_text)
    }

    pub fn creation_date(&self) -> Option<NaiveDate> {
        self.record.get("creation_date").and_then(FieldValue::as_date)
    }

    pub fn owner_uuid(&self) -> Option<Uuid> {
        self.record.get("owner_uuid").and_then(FieldValue::as_uuid)
    }

    pub fn members(&self) -> UuidList {
        self.record
            .get("members")
            .and_then(FieldValue::as_uuid_list)
            .cloned()
            .unwrap_or_default()
    }

    /// Rename the bamboo; the new name goes through the name constraint.
    pub fn set_name(&mut self, name: &str) -> Result<(), ValidationError> {
        self.record.set("name", name.into())
    }

    /// Add a member. Adding an existing member is a no-op.
    pub fn add_member(&mut self, user_uuid: Uuid) -> Result<(), ValidationError> {
        let mut members = self.members();
        let text = user_uuid.to_string();

        if members.contains(&text) {
            return Ok(());
        }

        members
            .append(&text)
            .expect("canonical uuid text always appends");
        self.record.set("members", members.into())
    }
}

impl Entity for Bamboo {
    const SCHEMA: &'static TableSchema = &BAMBOO_SCHEMA;

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
