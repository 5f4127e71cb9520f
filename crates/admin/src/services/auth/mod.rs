//! Admin authentication service.
//!
//! Email and password login against argon2id hashes stored in `admin_user`.

mod error;

pub use error::AdminAuthError;

use std::sync::Arc;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use tracing::{info, instrument, warn};

use rosa_studio_core::Email;
use rosa_studio_core::ports::StoreError;

use crate::db::AdminUserStore;
use crate::models::{AdminUser, CurrentAdmin};

/// Shortest password accepted for a new admin.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Admin authentication service.
///
/// Cheaply cloneable; the user store is shared.
#[derive(Clone)]
pub struct AdminAuthService {
    users: Arc<dyn AdminUserStore>,
}

impl AdminAuthService {
    /// Create a new admin authentication service.
    #[must_use]
    pub fn new(users: Arc<dyn AdminUserStore>) -> Self {
        Self { users }
    }

    /// Check an email and password pair.
    ///
    /// # Errors
    ///
    /// Returns `AdminAuthError::InvalidCredentials` for an unknown email, a
    /// malformed email or a wrong password, and `AdminAuthError::Store` when
    /// the user table cannot be read.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<CurrentAdmin, AdminAuthError> {
        let Ok(email) = Email::parse(email) else {
            return Err(AdminAuthError::InvalidCredentials);
        };

        let Some(record) = self.users.get_by_email(&email).await? else {
            info!("Login for unknown admin email");
            return Err(AdminAuthError::InvalidCredentials);
        };

        if !verify_password(password, &record.password_hash) {
            warn!(admin_id = %record.user.id, "Admin login with wrong password");
            return Err(AdminAuthError::InvalidCredentials);
        }

        info!(admin_id = %record.user.id, "Admin logged in");
        Ok(record.user.into())
    }

    /// Create a new admin account.
    ///
    /// The display name defaults to the local part of the email.
    ///
    /// # Errors
    ///
    /// Returns `AdminAuthError::InvalidEmail`, `AdminAuthError::WeakPassword`,
    /// `AdminAuthError::UserAlreadyExists`, or a store error.
    #[instrument(skip(self, password))]
    pub async fn create_admin(
        &self,
        email: &str,
        name: Option<&str>,
        password: &str,
    ) -> Result<AdminUser, AdminAuthError> {
        let email = Email::parse(email)?;
        validate_password(password)?;

        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map_or_else(|| local_part(&email).to_owned(), str::to_owned);
        let hash = hash_password(password)?;

        match self.users.create(&email, &name, &hash).await {
            Ok(user) => {
                info!(admin_id = %user.id, "Admin user created");
                Ok(user)
            }
            Err(StoreError::Conflict(_)) => Err(AdminAuthError::UserAlreadyExists),
            Err(e) => Err(e.into()),
        }
    }
}

/// Hash a password with argon2id and a fresh random salt.
///
/// # Errors
///
/// Returns `AdminAuthError::Hash` if argon2 rejects the input.
pub fn hash_password(password: &str) -> Result<String, AdminAuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AdminAuthError::Hash(e.to_string()))
}

/// Whether `password` matches a PHC-format hash. Malformed hashes never match.
#[must_use]
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        warn!("Stored admin password hash is malformed");
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

fn validate_password(password: &str) -> Result<(), AdminAuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AdminAuthError::WeakPassword(format!(
            "must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    if password.trim().is_empty() {
        return Err(AdminAuthError::WeakPassword(
            "must not be only whitespace".to_string(),
        ));
    }
    Ok(())
}

fn local_part(email: &Email) -> &str {
    email
        .as_str()
        .split_once('@')
        .map_or(email.as_str(), |(local, _)| local)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::MemoryAdminUsers;

    fn service() -> AdminAuthService {
        AdminAuthService::new(Arc::new(MemoryAdminUsers::new()))
    }

    #[test]
    fn test_hash_then_verify() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("wrong horse", &hash));
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }

    #[tokio::test]
    async fn test_login_after_create() {
        let auth = service();
        let user = auth
            .create_admin("rosa@example.com", Some("Rosa"), "knots-and-loops")
            .await
            .unwrap();

        let admin = auth.login("rosa@example.com", "knots-and-loops").await.unwrap();
        assert_eq!(admin.id, user.id);
        assert_eq!(admin.name, "Rosa");
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let auth = service();
        auth.create_admin("rosa@example.com", None, "knots-and-loops")
            .await
            .unwrap();

        for (email, password) in [
            ("rosa@example.com", "wrong-password"),
            ("nobody@example.com", "knots-and-loops"),
            ("not-an-email", "knots-and-loops"),
        ] {
            let err = auth.login(email, password).await.unwrap_err();
            assert!(matches!(err, AdminAuthError::InvalidCredentials));
        }
    }

    #[tokio::test]
    async fn test_create_rejects_duplicates_and_weak_passwords() {
        let auth = service();
        let user = auth
            .create_admin("rosa@example.com", None, "knots-and-loops")
            .await
            .unwrap();
        assert_eq!(user.name, "rosa");

        let err = auth
            .create_admin("rosa@example.com", None, "another-password")
            .await
            .unwrap_err();
        assert!(matches!(err, AdminAuthError::UserAlreadyExists));

        let err = auth
            .create_admin("new@example.com", None, "short")
            .await
            .unwrap_err();
        assert!(matches!(err, AdminAuthError::WeakPassword(_)));
    }
}
