//! Role operations

use uuid::Uuid;

use pandamonium_core::entities::{Bamboo, Entity, Role, RolePermissions};
use pandamonium_core::{PandaError, PandaResult, StorageError};

use crate::Store;

/// Create a role inside `bamboo`.
pub fn create(
    store: &dyn Store,
    name: &str,
    color: &str,
    hierarchy: i64,
    bamboo: &Bamboo,
    permissions: RolePermissions,
) -> PandaResult<Role> {
    let role = super::create(
        store,
        Role::new(name, color, hierarchy, bamboo.uuid(), permissions),
    )?;
    tracing::info!(name, bamboo = %bamboo.uuid(), uuid = %role.uuid(), "role created");
    Ok(role)
}

/// Fetch a role by UUID.
pub fn fetch(store: &dyn Store, uuid: Uuid) -> PandaResult<Option<Role>> {
    super::fetch_one(store, "uuid", uuid.into())
}

/// Every role of a bamboo.
pub fn list_by_bamboo(store: &dyn Store, bamboo_uuid: Uuid) -> PandaResult<Vec<Role>> {
    super::list(store, "bamboo_uuid", bamboo_uuid.into())
}

/// Write the columns of `role` that differ from the stored row.
pub fn update(store: &dyn Store, role: &mut Role) -> PandaResult<()> {
    let fresh = fetch(store, role.uuid())?.ok_or(PandaError::Storage(
        StorageError::RowNotFound {
            table: Role::SCHEMA.table,
            uuid: role.uuid(),
        },
    ))?;

    let changes = role.record().changed_fields(fresh.record());
    if changes.is_empty() {
        return Err(PandaError::Storage(StorageError::EmptyUpdate {
            table: Role::SCHEMA.table,
        }));
    }

    store.update(Role::SCHEMA, role.uuid(), &changes)
}

// =============================================================================
// TESTS
// =============================================================================
