//! Branch - one discussion channel inside a bamboo

use uuid::Uuid;

use crate::entities::Entity;
use crate::error::ValidationError;
use crate::filters;
use crate::record::{Constraint, FieldDef, FieldKind, FieldValue, Record, TableSchema, UUID_FIELD};

pub static BRANCH_SCHEMA: TableSchema = TableSchema {
    table: "branches",
    fields: &[
        UUID_FIELD,
        FieldDef::constrained(
            "name",
            FieldKind::Text,
            Constraint::MaxLen {
                max: 50,
                message: filters::BRANCH_NAME_MESSAGE,
            },
        ),
        FieldDef::new("bamboo_uuid", FieldKind::Uuid),
    ],
};

/// One discussion channel, always attached to a parent bamboo.
#[derive(Debug, Clone)]
pub struct Branch {
    record: Record,
}

impl Branch {
    pub fn new(name: &str, bamboo_uuid: Uuid) -> Self {
        let record = Record::new(&BRANCH_SCHEMA, None, vec![
            name.into(),
            bamboo_uuid.into(),
        ]);

        Self { record }
    }

    pub fn name(&self) -> Option<&str> {
        self.record.get("name").and_then(FieldValue::as_text)
    }

    pub fn bamboo_uuid(&self) -> Option<Uuid> {
        self.record.get("bamboo_uuid").and_then(FieldValue::as_uuid)
    }

    /// Rename the branch; the new name goes through the name constraint.
    pub fn set_name(&mut self, name: &str) -> Result<(), ValidationError> {
        self.record.set("name", name.into())
    }
}

impl Entity for Branch {
    const SCHEMA: &'static TableSchema = &BRANCH_SCHEMA;

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
