//! Repository for the `projects` table.

use pmhub_core::types::DbId;

use crate::models::project::{CreateProject, Project};
use crate::repositories::inserted_id;
use crate::{now_text, DbPool};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, code, description, status, start_date, end_date, created_at, updated_at";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project, returning the created row.
    pub async fn create(pool: &DbPool, input: &CreateProject) -> Result<Project, sqlx::Error> {
        let now = now_text();
        let result = sqlx::query(
            "INSERT INTO projects (name, code, description, status, start_date, end_date, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&input.name)
        .bind(&input.code)
        .bind(&input.description)
        .bind(&input.status)
        .bind(&input.start_date)
        .bind(&input.end_date)
        .bind(&now)
        .bind(&now)
        .execute(pool)
        .await?;

        let id = inserted_id(&result)?;
        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn find_by_id(pool: &DbPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = ?");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a project by its unique code.
    pub async fn find_by_code(pool: &DbPool, code: &str) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE code = ?");
        sqlx::query_as::<_, Project>(&query)
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &DbPool) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects ORDER BY id ASC");
        sqlx::query_as::<_, Project>(&query).fetch_all(pool).await
    }
}
