//! Validated record framework
//!
//! Every persisted entity is one `Record`: an ordered set of column values
//! checked against a declarative `TableSchema`. The schema fixes the column
//! order (position 0 is always `uuid`, mirroring the backing table), marks
//! unique columns, and attaches one `Constraint` per column. Backends build
//! SQL from the same schema, so the declaration here is the single source
//! of truth for column names, ordinals and storable kinds.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::uuid_list::UuidList;

// ============================================================================
// VALUES
// ============================================================================

/// Storable payload kinds. Backends use the kind to decode rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Int,
    Bool,
    Date,
    DateTime,
    Uuid,
    UuidList,
}

/// One column value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Text(String),
    Int(i64),
    Bool(bool),
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
    Uuid(Uuid),
    UuidList(UuidList),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::DateTime(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            FieldValue::Uuid(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_uuid_list(&self) -> Option<&UuidList> {
        match self {
            FieldValue::UuidList(value) => Some(value),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        FieldValue::Date(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::DateTime(value)
    }
}

impl From<Uuid> for FieldValue {
    fn from(value: Uuid) -> Self {
        FieldValue::Uuid(value)
    }
}

impl From<UuidList> for FieldValue {
    fn from(value: UuidList) -> Self {
        FieldValue::UuidList(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => value.into(),
            None => FieldValue::Null,
        }
    }
}

// ============================================================================
// CONSTRAINTS
// ============================================================================

/// Declarative column constraint, evaluated on every assignment.
///
/// A `Null` candidate always passes: absent values are only rejected where
/// they become required (the store's NOT NULL columns), not here.
#[derive(Debug, Clone, Copy)]
pub enum Constraint {
    /// Accept any value.
    None,
    /// Custom check; `Err` carries the user-facing message.
    Check(fn(&FieldValue) -> Result<(), String>),
    /// Maximum text length in characters.
    MaxLen { max: usize, message: &'static str },
    /// Minimum text length in characters.
    MinLen { min: usize, message: &'static str },
    /// Inclusive text length range.
    LenRange {
        min: usize,
        max: usize,
        message: &'static str,
    },
    /// Maximum number of UUIDs in a chain column.
    MaxUuids { max: usize, message: &'static str },
    /// Inclusive integer range.
    IntRange {
        min: i64,
        max: i64,
        message: &'static str,
    },
}

impl Constraint {
    /// Run the constraint against a candidate value.
    pub fn check(&self, value: &FieldValue) -> Result<(), String> {
        if value.is_null() {
            return Ok(());
        }

        match *self {
            Constraint::None => Ok(()),
            Constraint::Check(check) => check(value),
            Constraint::MaxLen { max, message } => match value.as_text() {
                Some(text) if text.chars().count() <= max => Ok(()),
                _ => Err(message.to_string()),
            },
            Constraint::MinLen { min, message } => match value.as_text() {
                Some(text) if text.chars().count() >= min => Ok(()),
                _ => Err(message.to_string()),
            },
            Constraint::LenRange { min, max, message } => match value.as_text() {
                Some(text) => {
                    let len = text.chars().count();
                    if len >= min && len <= max {
                        Ok(())
                    } else {
                        Err(message.to_string())
                    }
                }
                None => Err(message.to_string()),
            },
            Constraint::MaxUuids { max, message } => match value.as_uuid_list() {
                Some(list) if list.len() <= max => Ok(()),
                _ => Err(message.to_string()),
            },
            Constraint::IntRange { min, max, message } => match value.as_int() {
                Some(n) if n >= min && n <= max => Ok(()),
                _ => Err(message.to_string()),
            },
        }
    }
}

// ============================================================================
// SCHEMA
// ============================================================================

/// Declarative description of one column.
#[derive(Debug, Clone, Copy)]
pub struct FieldDef {
    pub name: &'static str,
    pub kind: FieldKind,
    pub unique: bool,
    pub constraint: Constraint,
}

impl FieldDef {
    /// Unconstrained, non-unique column.
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            unique: false,
            constraint: Constraint::None,
        }
    }

    /// Column with a constraint.
    pub const fn constrained(name: &'static str, kind: FieldKind, constraint: Constraint) -> Self {
        Self {
            name,
            kind,
            unique: false,
            constraint,
        }
    }

    /// Mark the column unique in the backing table.
    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}

/// The `uuid` primary-key column every schema starts with.
pub const UUID_FIELD: FieldDef = FieldDef::new("uuid", FieldKind::Uuid);

/// Declarative description of one table.
///
/// Column order is significant: the slice position is the column ordinal in
/// the backing table, and position 0 is always `uuid`.
#[derive(Debug)]
pub struct TableSchema {
    pub table: &'static str,
    pub fields: &'static [FieldDef],
}

impl TableSchema {
    /// Ordinal of a column, if it exists.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|def| def.name == name)
    }

    /// Definition of a column, if it exists.
    pub fn field(&self, name: &str) -> Option<&'static FieldDef> {
        self.fields.iter().find(|def| def.name == name)
    }

    /// Column names in table order.
    pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|def| def.name)
    }

    /// Unique columns in table order.
    pub fn unique_columns(&self) -> impl Iterator<Item = &'static FieldDef> + '_ {
        self.fields.iter().filter(|def| def.unique)
    }
}

// ============================================================================
// RUNTIME FIELDS
// ============================================================================

/// One runtime slot: a column definition bound to a current value.
#[derive(Debug, Clone)]
pub struct Field {
    def: &'static FieldDef,
    value: FieldValue,
    valid: bool,
}

impl Field {
    /// Build a field from an initial value. A rejected value is not kept:
    /// the slot holds `Null` and the rejection is returned alongside.
    fn build(def: &'static FieldDef, value: FieldValue) -> (Self, Option<ValidationError>) {
        match def.constraint.check(&value) {
            Ok(()) => (
                Self {
                    def,
                    value,
                    valid: true,
                },
                None,
            ),
            Err(message) => (
                Self {
                    def,
                    value: FieldValue::Null,
                    valid: false,
                },
                Some(ValidationError::new(def.name, message)),
            ),
        }
    }

    pub fn name(&self) -> &'static str {
        self.def.name
    }

    pub fn kind(&self) -> FieldKind {
        self.def.kind
    }

    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Replace the value. On rejection the previously stored value is kept
    /// and only the validity flag drops; a later accepted assignment brings
    /// this field back to valid.
    pub fn set(&mut self, value: FieldValue) -> Result<(), ValidationError> {
        match self.def.constraint.check(&value) {
            Ok(()) => {
                self.value = value;
                self.valid = true;
                Ok(())
            }
            Err(message) => {
                self.valid = false;
                Err(ValidationError::new(self.def.name, message))
            }
        }
    }
}

// ============================================================================
// RECORDS
// ============================================================================

/// An ordered, validated row image for one table.
///
/// Construction validates every column - there is no short-circuit on the
/// first failure - and aggregate validity is the AND of all column
/// validities. All rejections raised while building are kept for
/// diagnostics.
#[derive(Debug, Clone)]
pub struct Record {
    schema: &'static TableSchema,
    fields: Vec<Field>,
    build_errors: Vec<ValidationError>,
}

impl Record {
    /// Build a record. `values` supplies every column except `uuid`, in
    /// schema order; a missing `uuid` means a fresh one is generated
    /// (creation path) while a supplied one rebuilds a stored row
    /// (hydration path).
    pub fn new(schema: &'static TableSchema, uuid: Option<Uuid>, values: Vec<FieldValue>) -> Self {
        debug_assert_eq!(
            values.len() + 1,
            schema.fields.len(),
            "value count must match the schema of {}",
            schema.table
        );

        let mut fields = Vec::with_capacity(schema.fields.len());
        let mut build_errors = Vec::new();

        let (uuid_field, _) = Field::build(
            &schema.fields[0],
            FieldValue::Uuid(uuid.unwrap_or_else(Uuid::new_v4)),
        );
        fields.push(uuid_field);

        for (def, value) in schema.fields[1..].iter().zip(values) {
            let (field, error) = Field::build(def, value);
            fields.push(field);
            if let Some(error) = error {
                build_errors.push(error);
            }
        }

        Self {
            schema,
            fields,
            build_errors,
        }
    }

    /// Rebuild a record from a full stored row (`uuid` first, schema
    /// order). Backends guarantee the first column decodes as a UUID.
    pub fn from_row(schema: &'static TableSchema, mut row: Vec<FieldValue>) -> Self {
        let uuid = if row.is_empty() {
            None
        } else {
            row.remove(0).as_uuid()
        };
        debug_assert!(uuid.is_some(), "stored rows of {} carry a uuid", schema.table);

        Self::new(schema, uuid, row)
    }

    pub fn schema(&self) -> &'static TableSchema {
        self.schema
    }

    pub fn table(&self) -> &'static str {
        self.schema.table
    }

    /// Primary key of this record.
    pub fn uuid(&self) -> Uuid {
        self.fields[0]
            .value()
            .as_uuid()
            .expect("a record always holds a uuid column")
    }

    /// Aggregate validity: true iff every column holds an accepted value.
    pub fn is_valid(&self) -> bool {
        self.fields.iter().all(Field::is_valid)
    }

    /// Rejections collected while the record was built.
    pub fn build_errors(&self) -> &[ValidationError] {
        &self.build_errors
    }

    /// First rejection collected while the record was built.
    pub fn first_error(&self) -> Option<&ValidationError> {
        self.build_errors.first()
    }

    /// Column value by name.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.field(name).map(Field::value)
    }

    /// Column slot by name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name() == name)
    }

    /// Overwrite a column by name. An unknown name is a no-op; a known name
    /// re-runs that column's constraint, and a rejection drops aggregate
    /// validity without touching the stored value.
    pub fn set(&mut self, name: &str, value: FieldValue) -> Result<(), ValidationError> {
        match self.fields.iter_mut().find(|field| field.name() == name) {
            Some(field) => field.set(value),
            None => Ok(()),
        }
    }

    /// Column values in table order, `uuid` first.
    pub fn values(&self) -> impl Iterator<Item = &FieldValue> {
        self.fields.iter().map(Field::value)
    }

    /// Ordered `(column, value)` pairs where this record differs from an
    /// authoritative copy of the same table, skipping `uuid`.
    pub fn changed_fields(&self, authoritative: &Record) -> Vec<(&'static str, FieldValue)> {
        debug_assert_eq!(self.table(), authoritative.table());

        self.fields
            .iter()
            .skip(1)
            .filter(|field| {
                authoritative
                    .get(field.name())
                    .map(|other| other != field.value())
                    .unwrap_or(true)
            })
            .map(|field| (field.name(), field.value().clone()))
            .collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn short_name(value: &FieldValue) -> Result<(), String> {
        match value.as_text() {
            Some(text) if text.len() <= 5 => Ok(()),
            _ => Err("trop long".to_string()),
        }
    }

    static TEST_SCHEMA: TableSchema = TableSchema {
        table: "widgets",
        fields: &[
            UUID_FIELD,
            FieldDef::constrained("name", FieldKind::Text, Constraint::Check(short_name)),
            FieldDef::constrained(
                "label",
                FieldKind::Text,
                Constraint::MaxLen {
                    max: 3,
                    message: "étiquette trop longue",
                },
            ),
            FieldDef::new("count", FieldKind::Int),
        ],
    };

    fn build(name: &str, label: &str, count: i64) -> Record {
        Record::new(
            &TEST_SCHEMA,
            None,
            vec![name.into(), label.into(), count.into()],
        )
    }

    #[test]
    fn test_valid_record() {
        let record = build("ok", "ab", 3);
        assert!(record.is_valid());
        assert!(record.build_errors().is_empty());
        assert_eq!(record.get("name").unwrap().as_text(), Some("ok"));
        assert_eq!(record.get("count").unwrap().as_int(), Some(3));
    }

    #[test]
    fn test_uuid_column_is_first_and_generated() {
        let record = build("ok", "ab", 0);
        assert_eq!(TEST_SCHEMA.index_of("uuid"), Some(0));
        assert!(!record.uuid().is_nil());
        assert_eq!(
            record.values().next().unwrap().as_uuid(),
            Some(record.uuid())
        );
    }

    #[test]
    fn test_all_columns_validated_no_short_circuit() {
        let record = build("much too long", "also long", 0);
        assert!(!record.is_valid());
        // Both rejections are collected, not just the first.
        assert_eq!(record.build_errors().len(), 2);
        assert_eq!(record.build_errors()[0].field, "name");
        assert_eq!(record.build_errors()[1].field, "label");
        // Rejected construction values are not kept.
        assert!(record.get("name").unwrap().is_null());
    }

    #[test]
    fn test_null_passes_constraints() {
        let record = Record::new(
            &TEST_SCHEMA,
            None,
            vec![FieldValue::Null, FieldValue::Null, FieldValue::Null],
        );
        assert!(record.is_valid());
    }

    #[test]
    fn test_set_rejection_keeps_previous_value() {
        let mut record = build("ok", "ab", 1);
        let err = record.set("name", "much too long".into()).unwrap_err();
        assert_eq!(err.field, "name");
        assert_eq!(err.message, "trop long");
        assert!(!record.is_valid());
        // The previously accepted value is still stored.
        assert_eq!(record.get("name").unwrap().as_text(), Some("ok"));
    }

    #[test]
    fn test_set_recovers_validity_per_column() {
        let mut record = build("ok", "ab", 1);
        record.set("name", "much too long".into()).unwrap_err();
        assert!(!record.is_valid());
        record.set("name", "fine".into()).unwrap();
        assert!(record.is_valid());
    }

    #[test]
    fn test_set_unknown_column_is_a_no_op() {
        let mut record = build("ok", "ab", 1);
        record.set("ghost", "anything".into()).unwrap();
        assert!(record.is_valid());
        assert!(record.get("ghost").is_none());
    }

    #[test]
    fn test_hydration_keeps_supplied_uuid() {
        let uuid = Uuid::new_v4();
        let record = Record::new(&TEST_SCHEMA, Some(uuid), vec![
            "ok".into(),
            "ab".into(),
            1i64.into(),
        ]);
        assert_eq!(record.uuid(), uuid);
    }

    #[test]
    fn test_from_row() {
        let uuid = Uuid::new_v4();
        let record = Record::from_row(&TEST_SCHEMA, vec![
            FieldValue::Uuid(uuid),
            "ok".into(),
            "ab".into(),
            2i64.into(),
        ]);
        assert_eq!(record.uuid(), uuid);
        assert_eq!(record.get("count").unwrap().as_int(), Some(2));
    }

    #[test]
    fn test_changed_fields() {
        let uuid = Uuid::new_v4();
        let stored = Record::new(&TEST_SCHEMA, Some(uuid), vec![
            "ok".into(),
            "ab".into(),
            1i64.into(),
        ]);
        let mut edited = stored.clone();
        edited.set("label", "xyz".into()).unwrap();
        edited.set("count", 2i64.into()).unwrap();

        let changes = edited.changed_fields(&stored);
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].0, "label");
        assert_eq!(changes[1].0, "count");
        assert_eq!(changes[1].1.as_int(), Some(2));
    }

    #[test]
    fn test_changed_fields_empty_when_identical() {
        let record = build("ok", "ab", 1);
        assert!(record.changed_fields(&record.clone()).is_empty());
    }

    #[test]
    fn test_constraint_int_range() {
        let constraint = Constraint::IntRange {
            min: 0,
            max: 100,
            message: "hors limites",
        };
        assert!(constraint.check(&FieldValue::Int(0)).is_ok());
        assert!(constraint.check(&FieldValue::Int(100)).is_ok());
        assert!(constraint.check(&FieldValue::Int(101)).is_err());
        assert!(constraint.check(&FieldValue::Int(-1)).is_err());
        assert!(constraint.check(&FieldValue::Null).is_ok());
    }

    #[test]
    fn test_constraint_len_range_counts_chars() {
        let constraint = Constraint::LenRange {
            min: 2,
            max: 4,
            message: "longueur invalide",
        };
        assert!(constraint.check(&"éé".into()).is_ok());
        assert!(constraint.check(&"é".into()).is_err());
        assert!(constraint.check(&"ééééé".into()).is_err());
    }
}
