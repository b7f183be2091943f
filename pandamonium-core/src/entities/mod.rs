//! Concrete entities
//!
//! Typed wrappers over the validated-record framework, one per persisted
//! table. Each module declares the table schema (column order, constraints,
//! unique columns) and exposes typed constructors and accessors; the
//! generic `Record` underneath carries the actual values and validity.

mod bamboo;
mod branch;
mod message;
mod role;
mod user;

pub use bamboo::{Bamboo, BAMBOO_SCHEMA};
pub use branch::{Branch, BRANCH_SCHEMA};
pub use message::{Message, MESSAGE_SCHEMA};
pub use role::{Role, RolePermissions, ROLE_SCHEMA};
pub use user::{User, USER_SCHEMA};

use uuid::Uuid;

use crate::error::ValidationError;
use crate::record::{Record, TableSchema};

/// Common surface of the typed entity wrappers.
pub trait Entity: Sized {
    /// Schema of the backing table.
    const SCHEMA: &'static TableSchema;

    /// The underlying validated record.
    fn record(&self) -> &Record;

    /// Mutable access to the underlying record (storage integration point).
    fn record_mut(&mut self) -> &mut Record;

    /// Wrap a record hydrated from the store.
    fn from_record(record: Record) -> Self;

    /// Primary key.
    fn uuid(&self) -> Uuid {
        self.record().uuid()
    }

    /// Aggregate validity of all columns.
    fn is_valid(&self) -> bool {
        self.record().is_valid()
    }

    /// First rejection collected at construction, if any.
    fn first_error(&self) -> Option<&ValidationError> {
        self.record().first_error()
    }

    /// Backing table name.
    fn table(&self) -> &'static str {
        Self::SCHEMA.table
    }
}
