//! Bamboo operations
//!
//! A fresh bamboo starts with its owner as the only member. Joining keeps
//! both sides in sync: the bamboo's member chain and the user's bamboo
//! list.

use uuid::Uuid;

use pandamonium_core::entities::{Bamboo, Branch, Entity, User};
use pandamonium_core::{PandaError, PandaResult, StorageError};

use crate::repository::users;
use crate::Store;

/// Create a bamboo owned by `owner`.
pub fn create(store: &dyn Store, name: &str, owner: &User) -> PandaResult<Bamboo> {
    let bamboo = super::create(store, Bamboo::new(name, owner.uuid()))?;
    tracing::info!(name, owner = %owner.uuid(), uuid = %bamboo.uuid(), "bamboo created");
    Ok(bamboo)
}

/// Fetch a bamboo by UUID.
pub fn fetch(store: &dyn Store, uuid: Uuid) -> PandaResult<Option<Bamboo>> {
    super::fetch_one(store, "uuid", uuid.into())
}

/// Rename the bamboo, writing only columns that actually changed.
pub fn rename(store: &dyn Store, bamboo: &mut Bamboo, name: &str) -> PandaResult<()> {
    bamboo.set_name(name)?;

    let fresh = fetch(store, bamboo.uuid())?.ok_or(PandaError::Storage(
        StorageError::RowNotFound {
            table: Bamboo::SCHEMA.table,
            uuid: bamboo.uuid(),
        },
    ))?;

    let changes = bamboo.record().changed_fields(fresh.record());
    if changes.is_empty() {
        return Err(PandaError::Storage(StorageError::EmptyUpdate {
            table: Bamboo::SCHEMA.table,
        }));
    }

    store.update(Bamboo::SCHEMA, bamboo.uuid(), &changes)
}

/// Make `user` a member of `bamboo`, updating both rows. Joining a bamboo
/// the user already belongs to is a no-op.
pub fn join(store: &dyn Store, bamboo: &mut Bamboo, user: &mut User) -> PandaResult<()> {
    if bamboo.members().contains(&user.uuid().to_string()) {
        return Ok(());
    }

    bamboo.add_member(user.uuid())?;
    store.update(
        Bamboo::SCHEMA,
        bamboo.uuid(),
        &[("members", bamboo.members().into())],
    )?;

    user.join_bamboo(bamboo.uuid())?;
    users::update(store, user)?;

    tracing::debug!(bamboo = %bamboo.uuid(), user = %user.uuid(), "member joined");
    Ok(())
}

/// Every branch of the bamboo.
pub fn branches(store: &dyn Store, bamboo: &Bamboo) -> PandaResult<Vec<Branch>> {
    super::list(store, "bamboo_uuid", bamboo.uuid().into())
}

// =============================================================================
// TESTS
// =============================================================================
