//! User entity model and DTOs.

use pmhub_core::types::DbId;
use serde::Deserialize;
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash, so it is deliberately not `Serialize`.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub nickname: String,
    pub password_hash: String,
    pub email: String,
    pub phone: String,
    pub avatar: String,
    pub department_id: Option<DbId>,
    pub status: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// DTO for creating a new user.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub nickname: String,
    pub password_hash: String,
    pub email: String,
    pub phone: String,
    pub avatar: String,
    pub department_id: Option<DbId>,
    pub status: i64,
}
