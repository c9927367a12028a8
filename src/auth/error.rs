use thiserror::Error;

/// Credential store failures.
///
/// `NotFound` and `BadCredential` are distinct here so callers can log the
/// difference, but handlers surface both as the same "Invalid email or
/// password" message.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("email already registered")]
    DuplicateEmail,

    #[error("no account with that email")]
    NotFound,

    #[error("password mismatch")]
    BadCredential,

    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}
