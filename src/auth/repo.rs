use sqlx::PgConnection;
use uuid::Uuid;

use crate::auth::error::AuthError;
use crate::auth::repo_types::User;

impl User {
    /// Find a user by email.
    pub async fn find_by_email(
        conn: &mut PgConnection,
        email: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, email, username, password_hash, joined_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(conn)
        .await?;
        Ok(user)
    }

    /// Insert a new user with a hashed password.
    ///
    /// The unique constraint on `email` is the authority on duplicates:
    /// exactly one statement, no read-then-write window, and a
    /// unique-violation error maps to [`AuthError::DuplicateEmail`].
    pub async fn insert(
        conn: &mut PgConnection,
        user_id: Uuid,
        email: &str,
        username: &str,
        password_hash: &str,
    ) -> Result<User, AuthError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (user_id, email, username, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING user_id, email, username, password_hash, joined_at
            "#,
        )
        .bind(user_id)
        .bind(email)
        .bind(username)
        .bind(password_hash)
        .fetch_one(conn)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
                AuthError::DuplicateEmail
            }
            _ => AuthError::Database(e),
        })?;
        Ok(user)
    }
}
