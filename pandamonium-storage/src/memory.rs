//! In-memory store for tests
//!
//! Keeps rows as value vectors in per-table hash maps behind an `RwLock`.
//! Unique columns are enforced by scanning, which is plenty at test scale.

use std::collections::HashMap;
use std::sync::RwLock;

use uuid::Uuid;

use pandamonium_core::{
    FieldValue, PandaError, PandaResult, Record, StorageError, TableSchema,
};

use crate::{seed, Store};

type Table = HashMap<Uuid, Vec<FieldValue>>;

/// In-memory mock store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<&'static str, Table>>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows currently held for a table.
    pub fn rows(&self, table: &str) -> usize {
        self.tables
            .read()
            .expect("store lock")
            .get(table)
            .map(Table::len)
            .unwrap_or(0)
    }

    /// Drop every row of every table.
    pub fn clear(&self) {
        self.tables.write().expect("store lock").clear();
    }

    fn unique_collision(
        schema: &'static TableSchema,
        table: &Table,
        row: &[FieldValue],
        skip: Option<Uuid>,
    ) -> Option<&'static str> {
        for (index, def) in schema.fields.iter().enumerate() {
            if !def.unique || row[index].is_null() {
                continue;
            }

            let taken = table
                .iter()
                .filter(|(uuid, _)| Some(**uuid) != skip)
                .any(|(_, existing)| existing[index] == row[index]);

            if taken {
                return Some(def.name);
            }
        }

        None
    }
}

impl Store for MemoryStore {
    fn insert(&self, record: &Record) -> PandaResult<()> {
        let schema = record.schema();
        let row: Vec<FieldValue> = record.values().cloned().collect();

        let mut tables = self.tables.write().expect("store lock");
        let table = tables.entry(schema.table).or_default();

        if table.contains_key(&record.uuid()) {
            return Err(PandaError::Storage(StorageError::InsertFailed {
                table: schema.table,
                reason: "row already exists".to_string(),
            }));
        }

        if let Some(column) = Self::unique_collision(schema, table, &row, None) {
            return Err(PandaError::Storage(StorageError::Duplicate {
                table: schema.table,
                column,
            }));
        }

        table.insert(record.uuid(), row);
        Ok(())
    }

    fn fetch_by(
        &self,
        schema: &'static TableSchema,
        column: &str,
        key: &FieldValue,
    ) -> PandaResult<Option<Record>> {
        let index = schema.index_of(column).ok_or_else(|| {
            PandaError::Storage(StorageError::UnknownColumn {
                table: schema.table,
                column: column.to_string(),
            })
        })?;

        let tables = self.tables.read().expect("store lock");
        let row = tables
            .get(schema.table)
            .and_then(|table| table.values().find(|row| row[index] == *key))
            .cloned();

        Ok(row.map(|row| Record::from_row(schema, row)))
    }

    fn list_by(
        &self,
        schema: &'static TableSchema,
        column: &str,
        key: &FieldValue,
    ) -> PandaResult<Vec<Record>> {
        let index = schema.index_of(column).ok_or_else(|| {
            PandaError::Storage(StorageError::UnknownColumn {
                table: schema.table,
                column: column.to_string(),
            })
        })?;

        let tables = self.tables.read().expect("store lock");
        let records = tables
            .get(schema.table)
            .map(|table| {
                table
                    .values()
                    .filter(|row| row[index] == *key)
                    .cloned()
                    .map(|row| Record::from_row(schema, row))
                    .collect()
            })
            .unwrap_or_default();

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

        let mut tables = self.tables.write().expect("store lock");
        let table = tables.entry(schema.table).or_default();

        let mut row = table
            .get(&uuid)
            .cloned()
            .ok_or(PandaError::Storage(StorageError::RowNotFound {
                table: schema.table,
                uuid,
            }))?;

        for (column, value) in changes {
            let index = schema.index_of(column).ok_or_else(|| {
                PandaError::Storage(StorageError::UnknownColumn {
                    table: schema.table,
                    column: column.to_string(),
                })
            })?;
            row[index] = value.clone();
        }

        if let Some(column) = Self::unique_collision(schema, table, &row, Some(uuid)) {
            return Err(PandaError::Storage(StorageError::Duplicate {
                table: schema.table,
                column,
            }));
        }

        table.insert(uuid, row);
        Ok(())
    }

    fn reset(&self, seed: bool) -> PandaResult<()> {
        self.clear();

        if seed {
            for record in seed::default_records() {
                self.insert(&record)?;
            }
        }

        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
