//! User operations
//!
//! Registration validates the raw password before it is hashed (the stored
//! hash is what the record's own constraint sees, and a 64-character digest
//! always passes it), then inserts the account. Updates re-fetch the
//! authoritative row, diff against it, always touch `last_connection_date`,
//! and refuse to write when nothing else changed.

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use pandamonium_core::entities::{Entity, User};
use pandamonium_core::{
    filters, hash_password, AuthError, PandaError, PandaResult, StorageError, ValidationError,
};

use crate::Store;

/// Registration input. Profile columns are optional at sign-up.
#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    /// Raw password; hashed before it reaches the record.
    pub password: &'a str,
    pub date_of_birth: NaiveDate,
    pub pronouns: Option<&'a str>,
    pub public_display_name: Option<&'a str>,
    pub private_display_name: Option<&'a str>,
}

/// Identifying column for a user fetch. Exactly one selector per call.
#[derive(Debug, Clone, Copy)]
pub enum UserKey<'a> {
    Uuid(Uuid),
    Username(&'a str),
    Email(&'a str),
}

/// Create the account in the store and return the new entity.
pub fn create(store: &dyn Store, new: NewUser<'_>) -> PandaResult<User> {
    let password_len = new.password.chars().count();
    if !(6..=64).contains(&password_len) {
        return Err(ValidationError::new("password", filters::PASSWORD_MESSAGE).into());
    }

    let mut user = User::new(
        new.username,
        new.email,
        &hash_password(new.password),
        new.date_of_birth,
    );

    if let Some(pronouns) = new.pronouns {
        user = user.with_pronouns(pronouns);
    }
    if let Some(name) = new.public_display_name {
        user = user.with_public_display_name(name);
    }
    if let Some(name) = new.private_display_name {
        user = user.with_private_display_name(name);
    }

    let user = super::create(store, user).map_err(account_conflict)?;
    tracing::info!(username = new.username, uuid = %user.uuid(), "user registered");
    Ok(user)
}

/// Fetch a user by UUID, username or email.
pub fn fetch(store: &dyn Store, key: UserKey<'_>) -> PandaResult<Option<User>> {
    match key {
        UserKey::Uuid(uuid) => super::fetch_one(store, "uuid", uuid.into()),
        UserKey::Username(username) => super::fetch_one(store, "username", username.into()),
        UserKey::Email(email) => super::fetch_one(store, "email", email.into()),
    }
}

/// Write the columns of `user` that differ from the stored row.
///
/// `last_connection_date` is touched on every successful update, but does
/// not by itself justify one: if nothing else changed the call fails with
/// `StorageError::EmptyUpdate` before reaching the store. The known race
/// between the re-fetch and the UPDATE is accepted; the last writer wins.
pub fn update(store: &dyn Store, user: &mut User) -> PandaResult<()> {
    let fresh = fetch(store, UserKey::Uuid(user.uuid()))?.ok_or(PandaError::Storage(
        StorageError::RowNotFound {
            table: User::SCHEMA.table,
            uuid: user.uuid(),
        },
    ))?;

    let mut changes: Vec<_> = user
        .record()
        .changed_fields(fresh.record())
        .into_iter()
        .filter(|(column, _)| *column != "last_connection_date")
        .collect();

    if changes.is_empty() {
        return Err(PandaError::Storage(StorageError::EmptyUpdate {
            table: User::SCHEMA.table,
        }));
    }

    let today = Utc::now().date_naive();
    changes.insert(0, ("last_connection_date", today.into()));

    store
        .update(User::SCHEMA, user.uuid(), &changes)
        .map_err(profile_conflict)?;

    // The touch reaches the in-memory copy only once the row is written.
    let _ = user
        .record_mut()
        .set("last_connection_date", today.into());

    tracing::debug!(uuid = %user.uuid(), columns = changes.len(), "user updated");
    Ok(())
}

fn account_conflict(error: PandaError) -> PandaError {
    match error {
        PandaError::Storage(StorageError::Duplicate { .. }) => AuthError::AccountConflict.into(),
        other => other,
    }
}

fn profile_conflict(error: PandaError) -> PandaError {
    match error {
        PandaError::Storage(StorageError::Duplicate { .. }) => AuthError::ProfileConflict.into(),
        other => other,
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;

    fn new_alice<'a>() -> NewUser<'a> {
        NewUser {
            username: "alice",
            email: "a@example.com",
            password: "secret1",
            date_of_birth: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
            pronouns: None,
            public_display_name: None,
            private_display_name: None,
        }
    }

    #[test]
    fn test_create_and_fetch_by_every_key() {
        let store = MemoryStore::new();
        let user = create(&store, new_alice()).unwrap();
        assert!(user.is_valid());

        for key in [
            UserKey::Uuid(user.uuid()),
            UserKey::Username("alice"),
            UserKey::Email("a@example.com"),
        ] {
            let fetched = fetch(&store, key).unwrap().expect("user expected");
            assert_eq!(fetched.uuid(), user.uuid());
        }
    }

    #[test]
    fn test_create_stores_hash_not_password() {
        let store = MemoryStore::new();
        let user = create(&store, new_alice()).unwrap();
        assert_eq!(user.password_hash(), Some(hash_password("secret1").as_str()));
    }

    #[test]
    fn test_create_rejects_short_raw_password() {
        let store = MemoryStore::new();
        let error = create(
            &store,
            NewUser {
                password: "abc",
                ..new_alice()
            },
        )
        .unwrap_err();

        assert!(matches!(error, PandaError::Validation(_)));
        assert_eq!(error.user_message(), filters::PASSWORD_MESSAGE);
        assert_eq!(store.rows("users"), 0);
    }

    #[test]
    fn test_duplicate_username_maps_to_account_conflict() {
        let store = MemoryStore::new();
        create(&store, new_alice()).unwrap();

        let error = create(
            &store,
            NewUser {
                email: "other@example.com",
                ..new_alice()
            },
        )
        .unwrap_err();

        assert_eq!(error, PandaError::Auth(AuthError::AccountConflict));
        assert_eq!(store.rows("users"), 1);
    }

    #[test]
    fn test_update_diffs_against_stored_row() {
        let store = MemoryStore::new();
        let mut user = create(&store, new_alice()).unwrap();

        user = user.with_pronouns("elle");
        update(&store, &mut user).unwrap();

        let fetched = fetch(&store, UserKey::Uuid(user.uuid()))
            .unwrap()
            .expect("user expected");
        assert_eq!(fetched.pronouns(), Some("elle"));
        assert_eq!(
            fetched.last_connection_date(),
            Some(Utc::now().date_naive())
        );
    }

    #[test]
    fn test_update_with_identical_values_is_an_error() {
        let store = MemoryStore::new();
        let mut user = create(&store, new_alice()).unwrap();

        let error = update(&store, &mut user).unwrap_err();
        assert_eq!(
            error,
            PandaError::Storage(StorageError::EmptyUpdate { table: "users" })
        );
    }

    #[test]
    fn test_update_to_taken_email_maps_to_profile_conflict() {
        let store = MemoryStore::new();
        create(&store, new_alice()).unwrap();
        let mut bob = create(
            &store,
            NewUser {
                username: "bob",
                email: "b@example.com",
                ..new_alice()
            },
        )
        .unwrap();

        bob.record_mut().set("email", "a@example.com".into()).unwrap();
        let error = update(&store, &mut bob).unwrap_err();
        assert_eq!(error, PandaError::Auth(AuthError::ProfileConflict));
    }

    #[test]
    fn test_update_missing_row_is_an_error() {
        let store = MemoryStore::new();
        let mut user = User::new(
            "alice",
            "a@example.com",
            &hash_password("secret1"),
            NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
        );
        let error = update(&store, &mut user).unwrap_err();
        assert!(matches!(
            error,
            PandaError::Storage(StorageError::RowNotFound { .. })
        ));
    }
}
