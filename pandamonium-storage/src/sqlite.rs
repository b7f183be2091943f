//! SQLite-backed store
//!
//! Binds the generic statements from `sql` against a rusqlite connection.
//! Rows are decoded positionally: the SELECT column order is the schema
//! order, and each column decodes according to its declared `FieldKind`.
//! Dates, timestamps, UUIDs and UUID chains are stored as TEXT; booleans as
//! INTEGER 0/1.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::types::{Value, ValueRef};
use rusqlite::{params_from_iter, Connection, ErrorCode};
use uuid::Uuid;

use pandamonium_core::{
    date_from_string, date_to_string, FieldDef, FieldKind, FieldValue, PandaError, PandaResult,
    Record, StorageError, TableSchema, UuidList,
};

use crate::sql;
use crate::Store;

const SCHEMA_SQL: &str = include_str!("../sql/schema.sql");
const SCHEMA_DEV_SQL: &str = include_str!("../sql/schema_dev.sql");

/// Store backed by one SQLite database.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database file at `path`.
    pub fn open(path: &Path) -> PandaResult<Self> {
        let conn = Connection::open(path).map_err(backend_error)?;
        tracing::info!(path = %path.display(), "connected to database");

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> PandaResult<Self> {
        let conn = Connection::open_in_memory().map_err(backend_error)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().expect("store mutex")
    }
}

fn backend_error(error: rusqlite::Error) -> PandaError {
    PandaError::Storage(StorageError::Backend {
        reason: error.to_string(),
    })
}

/// Remap a unique-constraint failure onto the schema's unique column.
fn constraint_error(schema: &'static TableSchema, error: rusqlite::Error) -> PandaError {
    if let rusqlite::Error::SqliteFailure(failure, Some(message)) = &error {
        if failure.code == ErrorCode::ConstraintViolation {
            for def in schema.unique_columns() {
                if message.contains(def.name) {
                    return PandaError::Storage(StorageError::Duplicate {
                        table: schema.table,
                        column: def.name,
                    });
                }
            }
        }
    }

    backend_error(error)
}

fn bind_value(value: &FieldValue) -> Value {
    match value {
        FieldValue::Null => Value::Null,
        FieldValue::Text(text) => Value::Text(text.clone()),
        FieldValue::Int(n) => Value::Integer(*n),
        FieldValue::Bool(flag) => Value::Integer(i64::from(*flag)),
        FieldValue::Date(date) => Value::Text(date_to_string(*date)),
        FieldValue::DateTime(at) => Value::Text(at.to_rfc3339()),
        FieldValue::Uuid(uuid) => Value::Text(uuid.to_string()),
        FieldValue::UuidList(list) => Value::Text(list.to_string()),
    }
}

fn decode_error(def: &FieldDef, reason: impl ToString) -> PandaError {
    PandaError::Storage(StorageError::Backend {
        reason: format!("cannot decode column {}: {}", def.name, reason.to_string()),
    })
}

fn decode_value(def: &'static FieldDef, raw: ValueRef<'_>) -> PandaResult<FieldValue> {
    if matches!(raw, ValueRef::Null) {
        return Ok(FieldValue::Null);
    }

    match def.kind {
        FieldKind::Text => raw
            .as_str()
            .map(FieldValue::from)
            .map_err(|error| decode_error(def, error)),
        FieldKind::Int => raw
            .as_i64()
            .map(FieldValue::Int)
            .map_err(|error| decode_error(def, error)),
        FieldKind::Bool => raw
            .as_i64()
            .map(|n| FieldValue::Bool(n != 0))
            .map_err(|error| decode_error(def, error)),
        FieldKind::Date => {
            let text = raw.as_str().map_err(|error| decode_error(def, error))?;
            date_from_string(text)
                .map(FieldValue::Date)
                .map_err(|error| decode_error(def, error))
        }
        FieldKind::DateTime => {
            let text = raw.as_str().map_err(|error| decode_error(def, error))?;
            DateTime::parse_from_rfc3339(text)
                .map(|at| FieldValue::DateTime(at.with_timezone(&Utc)))
                .map_err(|error| decode_error(def, error))
        }
        FieldKind::Uuid => {
            let text = raw.as_str().map_err(|error| decode_error(def, error))?;
            Uuid::parse_str(text)
                .map(FieldValue::Uuid)
                .map_err(|error| decode_error(def, error))
        }
        FieldKind::UuidList => {
            let text = raw.as_str().map_err(|error| decode_error(def, error))?;
            UuidList::parse(text)
                .map(FieldValue::UuidList)
                .map_err(|error| decode_error(def, error))
        }
    }
}

fn decode_row(schema: &'static TableSchema, row: &rusqlite::Row<'_>) -> PandaResult<Record> {
    let mut values = Vec::with_capacity(schema.fields.len());

    for (index, def) in schema.fields.iter().enumerate() {
        let raw = row.get_ref(index).map_err(backend_error)?;
        values.push(decode_value(def, raw)?);
    }

    Ok(Record::from_row(schema, values))
}

fn unknown_column(schema: &'static TableSchema, column: &str) -> PandaError {
    PandaError::Storage(StorageError::UnknownColumn {
        table: schema.table,
        column: column.to_string(),
    })
}

impl Store for SqliteStore {
    fn insert(&self, record: &Record) -> PandaResult<()> {
        let schema = record.schema();
        let statement = sql::insert_statement(schema);
        let values: Vec<Value> = record.values().map(bind_value).collect();

        self.lock()
            .execute(&statement, params_from_iter(values))
            .map_err(|error| constraint_error(schema, error))?;

        tracing::debug!(table = schema.table, uuid = %record.uuid(), "row inserted");
        Ok(())
    }

    fn fetch_by(
        &self,
        schema: &'static TableSchema,
        column: &str,
        key: &FieldValue,
    ) -> PandaResult<Option<Record>> {
        if schema.index_of(column).is_none() {
            return Err(unknown_column(schema, column));
        }

        let statement = sql::select_by_statement(schema, column);
        let conn = self.lock();
        let mut stmt = conn.prepare(&statement).map_err(backend_error)?;
        let mut rows = stmt
            .query(params_from_iter([bind_value(key)]))
            .map_err(backend_error)?;

        match rows.next().map_err(backend_error)? {
            Some(row) => Ok(Some(decode_row(schema, row)?)),
            None => Ok(None),
        }
    }

    fn list_by(
        &self,
        schema: &'static TableSchema,
        column: &str,
        key: &FieldValue,
    ) -> PandaResult<Vec<Record>> {
        if schema.index_of(column).is_none() {
            return Err(unknown_column(schema, column));
        }

        let statement = sql::select_by_statement(schema, column);
        let conn = self.lock();
        let mut stmt = conn.prepare(&statement).map_err(backend_error)?;
        let mut rows = stmt
            .query(params_from_iter([bind_value(key)]))
            .map_err(backend_error)?;

        let mut records = Vec::new();
        while let Some(row) = rows.next().map_err(backend_error)? {
            records.push(decode_row(schema, row)?);
        }

        Ok(records)
    }

    fn update(
        &self,
        schema: &'static TableSchema,
        uuid: Uuid,
        changes: &[(&'static str, FieldValue)],
    ) -> PandaResult<()> {
        if changes.is_empty() {
            return Err(PandaError::Storage(StorageError::EmptyUpdate {
                table: schema.table,
            }));
        }

        let mut columns = Vec::with_capacity(changes.len());
        let mut values = Vec::with_capacity(changes.len() + 1);

        for (column, value) in changes {
            if schema.index_of(column).is_none() {
                return Err(unknown_column(schema, column));
            }
            columns.push(*column);
            values.push(bind_value(value));
        }
        values.push(Value::Text(uuid.to_string()));

        let statement = sql::update_statement(schema, &columns);
        let affected = self
            .lock()
            .execute(&statement, params_from_iter(values))
            .map_err(|error| constraint_error(schema, error))?;

        if affected == 0 {
            return Err(PandaError::Storage(StorageError::RowNotFound {
                table: schema.table,
                uuid,
            }));
        }

        tracing::debug!(table = schema.table, %uuid, columns = columns.len(), "row updated");
        Ok(())
    }

    fn reset(&self, seed: bool) -> PandaResult<()> {
        let script = if seed { SCHEMA_DEV_SQL } else { SCHEMA_SQL };

        self.lock().execute_batch(script).map_err(backend_error)?;
        tracing::info!(seed, "database schema reset");
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pandamonium_core::entities::{Bamboo, Branch, Entity, Message, User};
    use pandamonium_core::hash_password;

    fn store() -> SqliteStore {
        let store = SqliteStore::open_in_memory().unwrap();
        store.reset(false).unwrap();
        store
    }

    fn alice() -> User {
        User::new(
            "alice",
            "a@example.com",
            &hash_password("secret1"),
            NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
        )
    }

    #[test]
    fn test_user_insert_and_fetch_round_trip() {
        let store = store();
        let user = alice().with_pronouns("elle");
        store.insert(user.record()).unwrap();

        let record = store
            .fetch_by(User::SCHEMA, "username", &"alice".into())
            .unwrap()
            .expect("row expected");
        let fetched = User::from_record(record);

        assert_eq!(fetched.uuid(), user.uuid());
        assert_eq!(fetched.email(), Some("a@example.com"));
        assert_eq!(fetched.pronouns(), Some("elle"));
        assert_eq!(fetched.date_of_birth(), user.date_of_birth());
        assert!(fetched.friends().is_empty());
        assert!(fetched.is_valid());
    }

    #[test]
    fn test_fetch_missing_row_is_none() {
        let store = store();
        let found = store
            .fetch_by(User::SCHEMA, "username", &"ghost".into())
            .unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn test_duplicate_username_maps_to_duplicate_error() {
        let store = store();
        store.insert(alice().record()).unwrap();

        let twin = User::new(
            "alice",
            "other@example.com",
            &hash_password("secret1"),
            NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
        );
        let error = store.insert(twin.record()).unwrap_err();

        assert_eq!(
            error,
            PandaError::Storage(StorageError::Duplicate {
                table: "users",
                column: "username",
            })
        );
    }

    #[test]
    fn test_duplicate_email_maps_to_duplicate_error() {
        let store = store();
        store.insert(alice().record()).unwrap();

        let twin = User::new(
            "alice2",
            "a@example.com",
            &hash_password("secret1"),
            NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
        );
        let error = store.insert(twin.record()).unwrap_err();

        assert!(matches!(
            error,
            PandaError::Storage(StorageError::Duplicate { column: "email", .. })
        ));
    }

    #[test]
    fn test_update_writes_only_given_columns() {
        let store = store();
        let user = alice();
        store.insert(user.record()).unwrap();

        store
            .update(User::SCHEMA, user.uuid(), &[("pronouns", "iel".into())])
            .unwrap();

        let record = store
            .fetch_by(User::SCHEMA, "uuid", &user.uuid().into())
            .unwrap()
            .expect("row expected");
        let fetched = User::from_record(record);
        assert_eq!(fetched.pronouns(), Some("iel"));
        assert_eq!(fetched.email(), Some("a@example.com"));
    }

    #[test]
    fn test_update_with_no_changes_is_an_error() {
        let store = store();
        let user = alice();
        store.insert(user.record()).unwrap();

        let error = store.update(User::SCHEMA, user.uuid(), &[]).unwrap_err();
        assert_eq!(
            error,
            PandaError::Storage(StorageError::EmptyUpdate { table: "users" })
        );
    }

    #[test]
    fn test_update_missing_row_is_an_error() {
        let store = store();
        let uuid = Uuid::new_v4();
        let error = store
            .update(User::SCHEMA, uuid, &[("pronouns", "iel".into())])
            .unwrap_err();
        assert_eq!(
            error,
            PandaError::Storage(StorageError::RowNotFound {
                table: "users",
                uuid,
            })
        );
    }

    #[test]
    fn test_unknown_column_is_an_error() {
        let store = store();
        let error = store
            .fetch_by(User::SCHEMA, "ghost", &"x".into())
            .unwrap_err();
        assert!(matches!(
            error,
            PandaError::Storage(StorageError::UnknownColumn { .. })
        ));
    }

    #[test]
    fn test_message_round_trip_keeps_timestamp_and_flags() {
        let store = store();
        let sender = Uuid::new_v4();
        let branch = Uuid::new_v4();
        let parent = Uuid::new_v4();
        let message = Message::new("salut", sender, branch, Some(parent));
        store.insert(message.record()).unwrap();

        let record = store
            .fetch_by(Message::SCHEMA, "uuid", &message.uuid().into())
            .unwrap()
            .expect("row expected");
        let fetched = Message::from_record(record);

        assert_eq!(fetched.content(), Some("salut"));
        assert_eq!(fetched.date_sent(), message.date_sent());
        assert_eq!(fetched.response_to(), Some(parent));
        assert!(!fetched.modified());
    }

    #[test]
    fn test_list_by_returns_all_matches() {
        let store = store();
        let bamboo = Bamboo::new("Tea House", Uuid::new_v4());
        store.insert(bamboo.record()).unwrap();

        for name in ["racine", "thé", "potins"] {
            let branch = Branch::new(name, bamboo.uuid());
            store.insert(branch.record()).unwrap();
        }
        let elsewhere = Branch::new("ailleurs", Uuid::new_v4());
        store.insert(elsewhere.record()).unwrap();

        let records = store
            .list_by(Branch::SCHEMA, "bamboo_uuid", &bamboo.uuid().into())
            .unwrap();
        assert_eq!(records.len(), 3);
    }

    #[test]
    fn test_reset_with_seed_creates_default_rows() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.reset(true).unwrap();

        let record = store
            .fetch_by(User::SCHEMA, "username", &"panda".into())
            .unwrap()
            .expect("seed user expected");
        let panda = User::from_record(record);
        assert_eq!(panda.email(), Some("panda@pandamonium.net"));

        let bamboo = store
            .fetch_by(Bamboo::SCHEMA, "name", &"La Bambouseraie".into())
            .unwrap()
            .expect("seed bamboo expected");
        assert_eq!(
            Bamboo::from_record(bamboo).owner_uuid(),
            Some(panda.uuid())
        );
    }

    #[test]
    fn test_reset_without_seed_leaves_tables_empty() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.reset(true).unwrap();
        store.reset(false).unwrap();

        assert!(store
            .fetch_by(User::SCHEMA, "username", &"panda".into())
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_open_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pandamonium.db");
        let store = SqliteStore::open(&path).unwrap();
        store.reset(false).unwrap();

        let user = alice();
        store.insert(user.record()).unwrap();
        drop(store);

        let reopened = SqliteStore::open(&path).unwrap();
        assert!(reopened
            .fetch_by(User::SCHEMA, "username", &"alice".into())
            .unwrap()
            .is_some());
    }
}
