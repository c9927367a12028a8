use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use lazy_static::lazy_static;
use rand::rngs::OsRng;
use regex::Regex;
use sqlx::PgConnection;
use tracing::error;
use uuid::Uuid;

use crate::auth::error::AuthError;
use crate::auth::repo_types::User;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn hash_password(plain: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            AuthError::Hash(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

pub fn verify_password(plain: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        AuthError::Hash(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

/// When no username is given, the generated user ID doubles as the
/// display name.
pub(crate) fn resolve_username(username: Option<&str>, user_id: Uuid) -> String {
    match username.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => user_id.to_string(),
    }
}

/// Create a user record. Exactly one insert; a duplicate email fails with
/// [`AuthError::DuplicateEmail`] and mutates nothing.
pub async fn register(
    conn: &mut PgConnection,
    email: &str,
    password: &str,
    username: Option<&str>,
) -> Result<User, AuthError> {
    let user_id = Uuid::new_v4();
    let username = resolve_username(username, user_id);
    let hash = hash_password(password)?;
    User::insert(conn, user_id, email, &username, &hash).await
}

/// Check credentials against the stored hash and return the full record.
pub async fn verify(
    conn: &mut PgConnection,
    email: &str,
    password: &str,
) -> Result<User, AuthError> {
    let user = User::find_by_email(conn, email)
        .await?
        .ok_or(AuthError::NotFound)?;
    if verify_password(password, &user.password_hash)? {
        Ok(user)
    } else {
        Err(AuthError::BadCredential)
    }
}

#[cfg(test)]
mod password_tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let password = "Secur3P@ssw0rd!";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(verify_password(password, &hash).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let password = "correct-horse-battery-staple";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(!verify_password("wrong-password", &hash).expect("verify should not error"));
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("same-password").expect("hash");
        let b = hash_password("same-password").expect("hash");
        assert_ne!(a, b);
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let err = verify_password("anything", "not-a-valid-hash").unwrap_err();
        assert!(matches!(err, AuthError::Hash(_)));
    }
}

#[cfg(test)]
mod validation_tests {
    use super::*;

    #[test]
    fn accepts_plausible_emails() {
        assert!(is_valid_email("a@x.com"));
        assert!(is_valid_email("first.last@sub.example.org"));
    }

    #[test]
    fn rejects_malformed_emails() {
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("two@@x.com"));
        assert!(!is_valid_email("spaces in@x.com"));
        assert!(!is_valid_email("missing@tld"));
    }

    #[test]
    fn username_defaults_to_user_id() {
        let user_id = Uuid::new_v4();
        assert_eq!(resolve_username(None, user_id), user_id.to_string());
        assert_eq!(resolve_username(Some(""), user_id), user_id.to_string());
        assert_eq!(resolve_username(Some("  "), user_id), user_id.to_string());
        assert_eq!(resolve_username(Some("ada"), user_id), "ada");
        assert_eq!(resolve_username(Some("  ada "), user_id), "ada");
    }
}
