//! Admin authentication error types.

use thiserror::Error;

use rosa_studio_core::ports::StoreError;

/// Errors that can occur during admin authentication operations.
#[derive(Debug, Error)]
pub enum AdminAuthError {
    /// Unknown email or wrong password. Deliberately does not say which.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] rosa_studio_core::EmailError),

    /// Password does not meet the minimum requirements.
    #[error("weak password: {0}")]
    WeakPassword(String),

    /// Admin user already exists.
    #[error("admin user already exists")]
    UserAlreadyExists,

    /// The argon2 hasher rejected its input.
    #[error("password hashing failed: {0}")]
    Hash(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Store(#[from] StoreError),
}
