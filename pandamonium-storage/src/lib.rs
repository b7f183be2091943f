//! PANDAMONIUM Storage - Store Trait and Backends
//!
//! Persistence layer for the validated records defined in
//! `pandamonium-core`. One schema-driven `Store` trait covers every table;
//! statements are built by a single generic SQL builder instead of
//! per-entity hand-written queries. Two backends implement the trait: a
//! SQLite store for real persistence and an in-memory store for tests. The
//! `repository` module layers the entity-level operations (create, fetch,
//! diff-update) on top.

pub mod memory;
pub mod repository;
pub mod seed;
pub mod sql;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use uuid::Uuid;

use pandamonium_core::{FieldValue, PandaResult, Record, TableSchema};

/// Schema-driven persistence for validated records.
///
/// Fetching a missing row is `Ok(None)`, not an error. An `update` with an
/// empty change set is a caller error and fails with
/// `StorageError::EmptyUpdate`; a collision on a unique column surfaces as
/// `StorageError::Duplicate`.
pub trait Store: Send + Sync {
    /// Insert one record as a new row.
    fn insert(&self, record: &Record) -> PandaResult<()>;

    /// Fetch the first row whose `column` equals `key`.
    fn fetch_by(
        &self,
        schema: &'static TableSchema,
        column: &str,
        key: &FieldValue,
    ) -> PandaResult<Option<Record>>;

    /// Fetch every row whose `column` equals `key`. No ordering guarantee.
    fn list_by(
        &self,
        schema: &'static TableSchema,
        column: &str,
        key: &FieldValue,
    ) -> PandaResult<Vec<Record>>;

    /// Write `changes` to the row keyed by `uuid`.
    fn update(
        &self,
        schema: &'static TableSchema,
        uuid: Uuid,
        changes: &[(&'static str, FieldValue)],
    ) -> PandaResult<()>;

    /// Reinitialize the schema, optionally seeding the default rows.
    fn reset(&self, seed: bool) -> PandaResult<()>;
}
