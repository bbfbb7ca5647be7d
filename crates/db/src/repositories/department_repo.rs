//! Repository for the `departments` table.

use pmhub_core::types::DbId;

use crate::models::department::{CreateDepartment, Department};
use crate::repositories::inserted_id;
use crate::{now_text, DbPool};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, code, parent_id, level, sort, status, created_at, updated_at";

/// Provides CRUD operations for departments.
pub struct DepartmentRepo;

impl DepartmentRepo {
    /// Insert a new department, returning the created row.
    pub async fn create(pool: &DbPool, input: &CreateDepartment) -> Result<Department, sqlx::Error> {
        let now = now_text();
        let result = sqlx::query(
            "INSERT INTO departments (name, code, parent_id, level, sort, status, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&input.name)
        .bind(&input.code)
        .bind(input.parent_id)
        .bind(input.level)
        .bind(input.sort)
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

    pub async fn find_by_id(pool: &DbPool, id: DbId) -> Result<Option<Department>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM departments WHERE id = ?");
        sqlx::query_as::<_, Department>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a department by its unique code.
    pub async fn find_by_code(pool: &DbPool, code: &str) -> Result<Option<Department>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM departments WHERE code = ?");
        sqlx::query_as::<_, Department>(&query)
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    /// List all departments, parents before children within a level.
    pub async fn list(pool: &DbPool) -> Result<Vec<Department>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM departments ORDER BY level ASC, sort ASC, id ASC");
        sqlx::query_as::<_, Department>(&query).fetch_all(pool).await
    }
}
