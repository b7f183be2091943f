//! Registration and login
//!
//! The login ladder mirrors the form: the password shape is checked first,
//! then the identifier is tried as a username and then as an email; an
//! identifier matching neither shape is rejected outright. Not-found and
//! wrong-password produce distinct messages - the interface has always
//! told users which one happened.

use pandamonium_core::entities::User;
use pandamonium_core::{
    check_password, filters, AuthError, FieldValue, PandaError, PandaResult, ValidationError,
};
use pandamonium_storage::repository::users::{self, UserKey};
use pandamonium_storage::Store;

use crate::session::Session;

pub use pandamonium_storage::repository::users::NewUser;

/// Create the account and open a session for it.
pub fn register(store: &dyn Store, session: &mut Session, new: NewUser<'_>) -> PandaResult<User> {
    let user = users::create(store, new)?;
    sign_in(session, &user);
    Ok(user)
}

/// Authenticate with a username or an email, plus the password.
pub fn login(
    store: &dyn Store,
    session: &mut Session,
    identifier: &str,
    password: &str,
) -> PandaResult<User> {
    let password_len = password.chars().count();
    if !(6..=64).contains(&password_len) {
        return Err(ValidationError::new("password", filters::PASSWORD_MESSAGE).into());
    }

    let probe = FieldValue::from(identifier);
    let found = if filters::username(&probe).is_ok() {
        users::fetch(store, UserKey::Username(identifier))?
    } else if filters::email(&probe).is_ok() {
        users::fetch(store, UserKey::Email(identifier))?
    } else {
        return Err(PandaError::Auth(AuthError::InvalidIdentifier {
            identifier: identifier.to_string(),
        }));
    };

    let user = found.ok_or_else(|| {
        PandaError::Auth(AuthError::UnknownIdentifier {
            identifier: identifier.to_string(),
        })
    })?;

    let stored = user.password_hash().unwrap_or_default();
    if !check_password(password, stored) {
        return Err(PandaError::Auth(AuthError::WrongPassword {
            identifier: identifier.to_string(),
        }));
    }

    sign_in(session, &user);
    tracing::info!(identifier, "user logged in");
    Ok(user)
}

/// Close the session.
pub fn logout(session: &mut Session) {
    session.clear();
}

/// The signed-in user, reloaded from the store; `None` for anonymous
/// sessions or when the account no longer exists.
pub fn current_user(store: &dyn Store, session: &Session) -> PandaResult<Option<User>> {
    match session.username() {
        Some(username) => users::fetch(store, UserKey::Username(username)),
        None => Ok(None),
    }
}

fn sign_in(session: &mut Session, user: &User) {
    session.sign_in(user.username().unwrap_or_default());
}

// =============================================================================
// TESTS
// =============================================================================
