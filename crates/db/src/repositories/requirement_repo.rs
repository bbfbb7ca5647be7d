//! Repository for the `requirements` table.

use pmhub_core::types::DbId;

use crate::models::requirement::{CreateRequirement, Requirement, UpdateRequirement};
use crate::repositories::inserted_id;
use crate::{now_text, DbPool};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, legacy_id, title, description, status, priority, project_id, \
                       creator_id, assignee_id, estimated_hours, created_at, updated_at";

/// Provides CRUD operations for requirements.
pub struct RequirementRepo;

impl RequirementRepo {
    /// Insert a new requirement, returning the created row.
    pub async fn create(
        pool: &DbPool,
        input: &CreateRequirement,
    ) -> Result<Requirement, sqlx::Error> {
        let now = now_text();
        let result = sqlx::query(
            "INSERT INTO requirements (legacy_id, title, description, status, priority, project_id,
                                       creator_id, assignee_id, estimated_hours, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(input.legacy_id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.status)
        .bind(&input.priority)
        .bind(input.project_id)
        .bind(input.creator_id)
        .bind(input.assignee_id)
        .bind(input.estimated_hours)
        .bind(&now)
        .bind(&now)
        .execute(pool)
        .await?;

        let id = inserted_id(&result)?;
        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn find_by_id(pool: &DbPool, id: DbId) -> Result<Option<Requirement>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM requirements WHERE id = ?");
        sqlx::query_as::<_, Requirement>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the requirement migrated from a legacy story.
    pub async fn find_by_legacy_id(
        pool: &DbPool,
        legacy_id: i64,
    ) -> Result<Option<Requirement>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM requirements WHERE legacy_id = ?");
        sqlx::query_as::<_, Requirement>(&query)
            .bind(legacy_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_for_project(
        pool: &DbPool,
        project_id: DbId,
    ) -> Result<Vec<Requirement>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM requirements WHERE project_id = ? ORDER BY id ASC");
        sqlx::query_as::<_, Requirement>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Update a requirement. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &DbPool,
        id: DbId,
        input: &UpdateRequirement,
    ) -> Result<Option<Requirement>, sqlx::Error> {
        sqlx::query(
            "UPDATE requirements SET
                title = COALESCE(?, title),
                description = COALESCE(?, description),
                status = COALESCE(?, status),
                priority = COALESCE(?, priority),
                assignee_id = COALESCE(?, assignee_id),
                estimated_hours = COALESCE(?, estimated_hours),
                updated_at = ?
             WHERE id = ?",
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.status)
        .bind(&input.priority)
        .bind(input.assignee_id)
        .bind(input.estimated_hours)
        .bind(now_text())
        .bind(id)
        .execute(pool)
        .await?;

        Self::find_by_id(pool, id).await
    }

    /// Project the requirement belongs to.
    pub async fn project_id(pool: &DbPool, id: DbId) -> Result<Option<DbId>, sqlx::Error> {
        let row: Option<(DbId,)> = sqlx::query_as("SELECT project_id FROM requirements WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(|(project_id,)| project_id))
    }
}
