//! Entity-level operations over a `Store`
//!
//! One module per entity. The creation path is shared: validate the freshly
//! built entity, then insert its record; a validation failure surfaces the
//! first collected rejection instead of touching the store.

pub mod bamboos;
pub mod branches;
pub mod messages;
pub mod roles;
pub mod users;

use pandamonium_core::entities::Entity;
use pandamonium_core::{FieldValue, PandaResult, ValidationError};

use crate::Store;

/// Validate-then-insert, the creation path shared by every entity.
pub(crate) fn create<E: Entity>(store: &dyn Store, entity: E) -> PandaResult<E> {
    if !entity.is_valid() {
        let error = entity
            .first_error()
            .cloned()
            .unwrap_or_else(|| ValidationError::new(E::SCHEMA.table, "Des champs sont invalides."));
        return Err(error.into());
    }

    store.insert(entity.record())?;
    Ok(entity)
}

/// Fetch one entity by a column value.
pub(crate) fn fetch_one<E: Entity>(
    store: &dyn Store,
    column: &'static str,
    key: FieldValue,
) -> PandaResult<Option<E>> {
    Ok(store.fetch_by(E::SCHEMA, column, &key)?.map(E::from_record))
}

/// Fetch every entity matching a column value.
pub(crate) fn list<E: Entity>(
    store: &dyn Store,
    column: &'static str,
    key: FieldValue,
) -> PandaResult<Vec<E>> {
    Ok(store
        .list_by(E::SCHEMA, column, &key)?
        .into_iter()
        .map(E::from_record)
        .collect())
}
