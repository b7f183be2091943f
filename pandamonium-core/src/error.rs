//! Error types for PANDAMONIUM operations
//!
//! Validation failures used to travel through a process-wide "last error"
//! slot in earlier revisions of this system. They are now explicit values:
//! every validating operation returns a `PandaResult`, and the user-facing
//! (French) message is the `Display` output of the error it carries.

use thiserror::Error;
use uuid::Uuid;

/// Rejection of one column value by its constraint.
///
/// `Display` is exactly the message shown to the end user next to the
/// offending form field.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationError {
    /// Column that rejected the value.
    pub field: &'static str,
    /// User-facing rejection message.
    pub message: String,
}

impl ValidationError {
    /// Create a validation error for a named column.
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// UUID chain format errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UuidListError {
    #[error("The UUID chain is malformed.")]
    MalformedChain,

    #[error("'{0}' is not a valid UUID.")]
    InvalidUuid(String),

    #[error("index {index} is out of range for length {len}")]
    OutOfRange { index: usize, len: usize },

    #[error("cannot pop an empty UUID list")]
    PopOnEmpty,
}

/// Storage layer errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("insert into {table} failed: {reason}")]
    InsertFailed { table: &'static str, reason: String },

    #[error("duplicate value for unique column {column} of {table}")]
    Duplicate {
        table: &'static str,
        column: &'static str,
    },

    #[error("unknown column {column} on table {table}")]
    UnknownColumn { table: &'static str, column: String },

    #[error("no row {uuid} in table {table}")]
    RowNotFound { table: &'static str, uuid: Uuid },

    #[error("update on {table} with no changed columns")]
    EmptyUpdate { table: &'static str },

    #[error("backend error: {reason}")]
    Backend { reason: String },
}

/// Authentication errors. `Display` carries the user-facing message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("L'identifiant {identifier} est invalide.")]
    InvalidIdentifier { identifier: String },

    #[error("Aucun utilisateur trouvé avec l'identifiant {identifier}.")]
    UnknownIdentifier { identifier: String },

    #[error("Mot de passe incorrect pour l'identifiant {identifier}.")]
    WrongPassword { identifier: String },

    #[error(
        "Une erreur est survenue lors de la création de votre compte. Veuillez utiliser un \
         autre nom d'utilisateur ou un autre email."
    )]
    AccountConflict,

    #[error(
        "Une erreur est survenue lors de la mise à jour de vos données. Le nom d'utilisateur \
         ou l'email est peut-être déjà pris par un autre compte."
    )]
    ProfileConflict,
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required configuration field: {field}")]
    MissingRequired { field: &'static str },

    #[error("invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("cannot read configuration: {reason}")]
    Unreadable { reason: String },
}

/// Master error type for all PANDAMONIUM operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PandaError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("uuid list error: {0}")]
    UuidList(#[from] UuidListError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

impl PandaError {
    /// The message to surface to the end user.
    ///
    /// Validation and authentication errors carry user-facing French text;
    /// everything else collapses to a generic message so internal details
    /// never reach the client.
    pub fn user_message(&self) -> String {
        match self {
            PandaError::Validation(err) => err.to_string(),
            PandaError::Auth(err) => err.to_string(),
            PandaError::UuidList(err) => err.to_string(),
            PandaError::Storage(_) | PandaError::Config(_) => {
                "Une erreur interne est survenue.".to_string()
            }
        }
    }
}

/// Result type alias for PANDAMONIUM operations.
pub type PandaResult<T> = Result<T, PandaError>;

// =============================================================================
// TESTS
// =============================================================================
