//! Repository for the `roles` table and its `role_permissions` links.

use pmhub_core::types::DbId;

use crate::models::role::{CreateRole, Permission, Role};
use crate::repositories::inserted_id;
use crate::{now_text, DbPool};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, code, description, status, created_at, updated_at";

/// Provides CRUD operations for roles.
pub struct RoleRepo;

impl RoleRepo {
    /// Insert a new role, returning the created row.
    pub async fn create(pool: &DbPool, input: &CreateRole) -> Result<Role, sqlx::Error> {
        let now = now_text();
        let result = sqlx::query(
            "INSERT INTO roles (name, code, description, status, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&input.name)
        .bind(&input.code)
        .bind(&input.description)
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

    /// Insert a role together with its permission set in one transaction.
    /// Nothing is written when any insert fails. Duplicate ids are collapsed.
    pub async fn create_with_permissions(
        pool: &DbPool,
        input: &CreateRole,
        permission_ids: &[DbId],
    ) -> Result<Role, sqlx::Error> {
        let mut ids = permission_ids.to_vec();
        ids.sort_unstable();
        ids.dedup();

        let now = now_text();
        let mut tx = pool.begin().await?;

        let result = sqlx::query(
            "INSERT INTO roles (name, code, description, status, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&input.name)
        .bind(&input.code)
        .bind(&input.description)
        .bind(input.status)
        .bind(&now)
        .bind(&now)
        .execute(&mut *tx)
        .await?;
        let id = inserted_id(&result)?;

        for permission_id in ids {
            sqlx::query("INSERT INTO role_permissions (role_id, permission_id) VALUES (?, ?)")
                .bind(id)
                .bind(permission_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn find_by_id(pool: &DbPool, id: DbId) -> Result<Option<Role>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM roles WHERE id = ?");
        sqlx::query_as::<_, Role>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a role by its unique code.
    pub async fn find_by_code(pool: &DbPool, code: &str) -> Result<Option<Role>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM roles WHERE code = ?");
        sqlx::query_as::<_, Role>(&query)
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    /// Find a role by its unique name (case-sensitive).
    pub async fn find_by_name(pool: &DbPool, name: &str) -> Result<Option<Role>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM roles WHERE name = ?");
        sqlx::query_as::<_, Role>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &DbPool) -> Result<Vec<Role>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM roles ORDER BY id ASC");
        sqlx::query_as::<_, Role>(&query).fetch_all(pool).await
    }

    /// Replace the role's permission set in one transaction. Duplicate ids
    /// are collapsed.
    pub async fn set_permissions(
        pool: &DbPool,
        role_id: DbId,
        permission_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        let mut ids = permission_ids.to_vec();
        ids.sort_unstable();
        ids.dedup();

        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM role_permissions WHERE role_id = ?")
            .bind(role_id)
            .execute(&mut *tx)
            .await?;

        for permission_id in ids {
            sqlx::query("INSERT INTO role_permissions (role_id, permission_id) VALUES (?, ?)")
                .bind(role_id)
                .bind(permission_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Permissions granted to a role, ordered by code.
    pub async fn permissions(pool: &DbPool, role_id: DbId) -> Result<Vec<Permission>, sqlx::Error> {
        sqlx::query_as::<_, Permission>(
            "SELECT p.id, p.code, p.name, p.resource, p.action
             FROM permissions p
             JOIN role_permissions rp ON rp.permission_id = p.id
             WHERE rp.role_id = ?
             ORDER BY p.code ASC",
        )
        .bind(role_id)
        .fetch_all(pool)
        .await
    }
}
