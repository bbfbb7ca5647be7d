//! Repository for the `users` table and its `user_roles` links.

use pmhub_core::types::DbId;

use crate::models::user::{CreateUser, User};
use crate::repositories::inserted_id;
use crate::{now_text, DbPool};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, nickname, password_hash, email, phone, avatar, \
                       department_id, status, created_at, updated_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &DbPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let now = now_text();
        let result = sqlx::query(
            "INSERT INTO users (username, nickname, password_hash, email, phone, avatar,
                                department_id, status, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&input.username)
        .bind(&input.nickname)
        .bind(&input.password_hash)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.avatar)
        .bind(input.department_id)
        .bind(input.status)
        .bind(&now)
        .bind(&now)
        .execute(pool)
        .await?;

        let id = inserted_id(&result)?;
        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &DbPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = ?");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by username (case-sensitive).
    pub async fn find_by_username(pool: &DbPool, username: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = ?");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// List all users ordered by ID ascending.
    pub async fn list(pool: &DbPool) -> Result<Vec<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users ORDER BY id ASC");
        sqlx::query_as::<_, User>(&query).fetch_all(pool).await
    }

    /// Attach a role unless already attached. Returns `true` if a link was
    /// created.
    pub async fn add_role(pool: &DbPool, user_id: DbId, role_id: DbId) -> Result<bool, sqlx::Error> {
        let existing: Option<(DbId,)> =
            sqlx::query_as("SELECT user_id FROM user_roles WHERE user_id = ? AND role_id = ?")
                .bind(user_id)
                .bind(role_id)
                .fetch_optional(pool)
                .await?;
        if existing.is_some() {
            return Ok(false);
        }

        sqlx::query("INSERT INTO user_roles (user_id, role_id) VALUES (?, ?)")
            .bind(user_id)
            .bind(role_id)
            .execute(pool)
            .await?;
        Ok(true)
    }

    /// Ids of the roles attached to a user.
    pub async fn role_ids(pool: &DbPool, user_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> =
            sqlx::query_as("SELECT role_id FROM user_roles WHERE user_id = ? ORDER BY role_id ASC")
                .bind(user_id)
                .fetch_all(pool)
                .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }
}
