//! Branch operations

use uuid::Uuid;

use pandamonium_core::entities::{Bamboo, Branch, Entity};
use pandamonium_core::{PandaError, PandaResult, StorageError};

use crate::Store;

/// Create a branch inside `bamboo`.
pub fn create(store: &dyn Store, name: &str, bamboo: &Bamboo) -> PandaResult<Branch> {
    let branch = super::create(store, Branch::new(name, bamboo.uuid()))?;
    tracing::info!(name, bamboo = %bamboo.uuid(), uuid = %branch.uuid(), "branch created");
    Ok(branch)
}

/// Fetch a branch by UUID.
pub fn fetch(store: &dyn Store, uuid: Uuid) -> PandaResult<Option<Branch>> {
    super::fetch_one(store, "uuid", uuid.into())
}

/// Rename the branch, writing only columns that actually changed.
pub fn rename(store: &dyn Store, branch: &mut Branch, name: &str) -> PandaResult<()> {
    branch.set_name(name)?;

    let fresh = fetch(store, branch.uuid())?.ok_or(PandaError::Storage(
        StorageError::RowNotFound {
            table: Branch::SCHEMA.table,
            uuid: branch.uuid(),
        },
    ))?;

    let changes = branch.record().changed_fields(fresh.record());
    if changes.is_empty() {
        return Err(PandaError::Storage(StorageError::EmptyUpdate {
            table: Branch::SCHEMA.table,
        }));
    }

    store.update(Branch::SCHEMA, branch.uuid(), &changes)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;

    fn tea_house(store: &MemoryStore) -> Bamboo {
        let bamboo = Bamboo::new("Tea House", Uuid::new_v4());
        store.insert(bamboo.record()).unwrap();
        bamboo
    }

    #[test]
    fn test_create_and_fetch() {
        let store = MemoryStore::new();
        let bamboo = tea_house(&store);

        let branch = create(&store, "racine", &bamboo).unwrap();
        let fetched = fetch(&store, branch.uuid()).unwrap().expect("branch expected");
        assert_eq!(fetched.name(), Some("racine"));
        assert_eq!(fetched.bamboo_uuid(), Some(bamboo.uuid()));
    }

    #[test]
    fn test_rename() {
        let store = MemoryStore::new();
        let bamboo = tea_house(&store);
        let mut branch = create(&store, "racine", &bamboo).unwrap();

        rename(&store, &mut branch, "tronc").unwrap();
        let fetched = fetch(&store, branch.uuid()).unwrap().expect("branch expected");
        assert_eq!(fetched.name(), Some("tronc"));
    }

    #[test]
    fn test_rename_to_same_name_is_an_error() {
        let store = MemoryStore::new();
        let bamboo = tea_house(&store);
        let mut branch = create(&store, "racine", &bamboo).unwrap();

        let error = rename(&store, &mut branch, "racine").unwrap_err();
        assert!(matches!(
            error,
            PandaError::Storage(StorageError::EmptyUpdate { table: "branches" })
        ));
    }
}
