use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub user_id: Uuid,              // unique user ID, assigned at creation
    pub email: String,              // login key, unique
    pub username: String,           // display name; defaults to the user ID
    #[serde(skip_serializing)]
    pub password_hash: String,      // Argon2 hash, not exposed in JSON
    pub joined_at: OffsetDateTime,  // creation timestamp
}
