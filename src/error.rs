use thiserror::Error;

/// Errors raised by the contact store.
///
/// Variants produced by a failing statement keep the driver error as their
/// source so callers can still inspect the database's own message.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to initialize schema: {0}")]
    Schema(#[source] sqlx::Error),

    #[error("unsupported database backend: {0}")]
    UnsupportedBackend(String),

    #[error("a client with email {email:?} already exists")]
    DuplicateEmail {
        email: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("phone number {phone_number:?} is already registered")]
    DuplicatePhone {
        phone_number: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("client {client_id} does not exist")]
    Reference {
        client_id: i64,
        #[source]
        source: sqlx::Error,
    },

    #[error("client {0} not found")]
    NotFound(i64),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type Result<T, E = StoreError> = std::result::Result<T, E>;

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation())
}

pub(crate) fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db_err| db_err.is_foreign_key_violation())
}
