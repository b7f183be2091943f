//! Message - one post in a branch
//!
//! A message knows its sender and its branch, and optionally the message it
//! replies to (threaded reply). Editing a message marks it as modified.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::entities::Entity;
use crate::error::ValidationError;
use crate::filters;
use crate::record::{Constraint, FieldDef, FieldKind, FieldValue, Record, TableSchema, UUID_FIELD};

pub static MESSAGE_SCHEMA: TableSchema = TableSchema {
    table: "messages",
    fields: &[
        UUID_FIELD,
        FieldDef::constrained(
            "content",
            FieldKind::Text,
            Constraint::MinLen {
                min: 1,
                message: filters::MESSAGE_CONTENT_MESSAGE,
            },
        ),
        FieldDef::new("date_sent", FieldKind::DateTime),
        FieldDef::new("modified", FieldKind::Bool),
        FieldDef::new("sender_uuid", FieldKind::Uuid),
        FieldDef::new("branch_uuid", FieldKind::Uuid),
        FieldDef::new("response_to_message_uuid", FieldKind::Uuid),
    ],
};

/// One message posted in a branch.
#[derive(Debug, Clone)]
pub struct Message {
    record: Record,
}

impl Message {
    pub fn new(
        content: &str,
        sender_uuid: Uuid,
        branch_uuid: Uuid,
        response_to: Option<Uuid>,
    ) -> Self {
        let record = Record::new(&MESSAGE_SCHEMA, None, vec![
            content.into(),
            Utc::now().into(),
            false.into(),
            sender_uuid.into(),
            branch_uuid.into(),
            response_to.into(),
        ]);

        Self { record }
    }

    pub fn content(&self) -> Option<&str> {
        self.record.get("content").and_then(FieldValue::as_text)
    }

    pub fn date_sent(&self) -> Option<DateTime<Utc>> {
        self.record.get("date_sent").and_then(FieldValue::as_datetime)
    }

    pub fn modified(&self) -> bool {
        self.record
            .get("modified")
            .and_then(FieldValue::as_bool)
            .unwrap_or(false)
    }

    pub fn sender_uuid(&self) -> Option<Uuid> {
        self.record.get("sender_uuid").and_then(FieldValue::as_uuid)
    }

    pub fn branch_uuid(&self) -> Option<Uuid> {
        self.record.get("branch_uuid").and_then(FieldValue::as_uuid)
    }

    pub fn response_to(&self) -> Option<Uuid> {
        self.record
            .get("response_to_message_uuid")
            .and_then(FieldValue::as_uuid)
    }

    /// Replace the content and mark the message as modified. A rejected
    /// content leaves both columns untouched.
    pub fn edit(&mut self, new_content: &str) -> Result<(), ValidationError> {
        self.record.set("content", new_content.into())?;
        self.record.set("modified", true.into())
    }
}

impl Entity for Message {
    const SCHEMA: &'static TableSchema = &MESSAGE_SCHEMA;

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
