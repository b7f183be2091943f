//! PANDAMONIUM Core - Validated Entity Records
//!
//! Data layer of the PANDAMONIUM social network: a generic validated-record
//! mechanism (declarative table schemas, per-column constraints, aggregate
//! validity), the concrete entities built on it (users, bamboos, branches,
//! messages, roles), and the stateless security helpers their constraints
//! rely on. This crate holds no persistence logic - storage backends live
//! in `pandamonium-storage`.

pub mod entities;
pub mod error;
pub mod filters;
pub mod record;
pub mod security;
pub mod uuid_list;

pub use entities::{Bamboo, Branch, Entity, Message, Role, RolePermissions, User};
pub use error::{
    AuthError, ConfigError, PandaError, PandaResult, StorageError, UuidListError,
    ValidationError,
};
pub use record::{Constraint, Field, FieldDef, FieldKind, FieldValue, Record, TableSchema};
pub use security::{check_password, date_from_string, date_to_string, hash_password, is_valid_uuid};
pub use uuid_list::UuidList;

use uuid::Uuid;

/// Entity identifier. Every persisted row is keyed by a v4 UUID stored in
/// canonical lowercase text form.
pub type EntityId = Uuid;

/// Generate a fresh entity identifier.
pub fn new_entity_id() -> EntityId {
    Uuid::new_v4()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_entity_id_is_v4() {
        let id = new_entity_id();
        assert_eq!(id.get_version_num(), 4);
    }

    #[test]
    fn test_entity_id_text_form_is_uuid_shaped() {
        let id = new_entity_id();
        assert!(is_valid_uuid(&id.to_string()));
    }
}
