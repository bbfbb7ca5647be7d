//! Repository for the `tasks` table.

use pmhub_core::types::DbId;

use crate::models::task::{CreateTask, Task, UpdateTask};
use crate::repositories::inserted_id;
use crate::{now_text, DbPool};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, legacy_id, title, description, status, priority, project_id, \
                       requirement_id, creator_id, assignee_id, start_date, due_date, end_date, \
                       estimated_hours, actual_hours, progress, created_at, updated_at";

/// Provides CRUD operations for tasks.
pub struct TaskRepo;

impl TaskRepo {
    /// Insert a new task, returning the created row.
    pub async fn create(pool: &DbPool, input: &CreateTask) -> Result<Task, sqlx::Error> {
        let now = now_text();
        let result = sqlx::query(
            "INSERT INTO tasks (legacy_id, title, description, status, priority, project_id,
                                requirement_id, creator_id, assignee_id, start_date, due_date, end_date,
                                estimated_hours, actual_hours, progress, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(input.legacy_id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.status)
        .bind(&input.priority)
        .bind(input.project_id)
        .bind(input.requirement_id)
        .bind(input.creator_id)
        .bind(input.assignee_id)
        .bind(&input.start_date)
        .bind(&input.due_date)
        .bind(&input.end_date)
        .bind(input.estimated_hours)
        .bind(input.actual_hours)
        .bind(input.progress)
        .bind(&now)
        .bind(&now)
        .execute(pool)
        .await?;

        let id = inserted_id(&result)?;
        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn find_by_id(pool: &DbPool, id: DbId) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = ?");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the task migrated from a legacy task.
    pub async fn find_by_legacy_id(pool: &DbPool, legacy_id: i64) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE legacy_id = ?");
        sqlx::query_as::<_, Task>(&query)
            .bind(legacy_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_for_project(pool: &DbPool, project_id: DbId) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE project_id = ? ORDER BY id ASC");
        sqlx::query_as::<_, Task>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Update a task. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &DbPool,
        id: DbId,
        input: &UpdateTask,
    ) -> Result<Option<Task>, sqlx::Error> {
        sqlx::query(
            "UPDATE tasks SET
                title = COALESCE(?, title),
                status = COALESCE(?, status),
                priority = COALESCE(?, priority),
                assignee_id = COALESCE(?, assignee_id),
                due_date = COALESCE(?, due_date),
                actual_hours = COALESCE(?, actual_hours),
                progress = COALESCE(?, progress),
                updated_at = ?
             WHERE id = ?",
        )
        .bind(&input.title)
        .bind(&input.status)
        .bind(&input.priority)
        .bind(input.assignee_id)
        .bind(&input.due_date)
        .bind(input.actual_hours)
        .bind(input.progress)
        .bind(now_text())
        .bind(id)
        .execute(pool)
        .await?;

        Self::find_by_id(pool, id).await
    }

    /// Project the task belongs to.
    pub async fn project_id(pool: &DbPool, id: DbId) -> Result<Option<DbId>, sqlx::Error> {
        let row: Option<(DbId,)> = sqlx::query_as("SELECT project_id FROM tasks WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(|(project_id,)| project_id))
    }
}
