//! Repository for the `bugs` table and its `bug_assignees` links.

use pmhub_core::types::DbId;

use crate::models::bug::{Bug, CreateBug, UpdateBug};
use crate::repositories::inserted_id;
use crate::{now_text, DbPool};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, legacy_id, title, description, status, severity, priority, confirmed, \
                       project_id, requirement_id, module_id, creator_id, solution, solution_note, \
                       resolved_version_id, created_at, updated_at";

/// Provides CRUD operations for bugs.
pub struct BugRepo;

impl BugRepo {
    /// Insert a new bug, returning the created row.
    pub async fn create(pool: &DbPool, input: &CreateBug) -> Result<Bug, sqlx::Error> {
        let now = now_text();
        let result = sqlx::query(
            "INSERT INTO bugs (legacy_id, title, description, status, severity, priority, confirmed,
                               project_id, requirement_id, module_id, creator_id, solution,
                               solution_note, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(input.legacy_id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.status)
        .bind(&input.severity)
        .bind(&input.priority)
        .bind(input.confirmed)
        .bind(input.project_id)
        .bind(input.requirement_id)
        .bind(input.module_id)
        .bind(input.creator_id)
        .bind(&input.solution)
        .bind(&input.solution_note)
        .bind(&now)
        .bind(&now)
        .execute(pool)
        .await?;

        let id = inserted_id(&result)?;
        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn find_by_id(pool: &DbPool, id: DbId) -> Result<Option<Bug>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bugs WHERE id = ?");
        sqlx::query_as::<_, Bug>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the bug migrated from a legacy bug.
    pub async fn find_by_legacy_id(pool: &DbPool, legacy_id: i64) -> Result<Option<Bug>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bugs WHERE legacy_id = ?");
        sqlx::query_as::<_, Bug>(&query)
            .bind(legacy_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_for_project(pool: &DbPool, project_id: DbId) -> Result<Vec<Bug>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bugs WHERE project_id = ? ORDER BY id ASC");
        sqlx::query_as::<_, Bug>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Update a bug. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(pool: &DbPool, id: DbId, input: &UpdateBug) -> Result<Option<Bug>, sqlx::Error> {
        sqlx::query(
            "UPDATE bugs SET
                title = COALESCE(?, title),
                description = COALESCE(?, description),
                status = COALESCE(?, status),
                severity = COALESCE(?, severity),
                priority = COALESCE(?, priority),
                confirmed = COALESCE(?, confirmed),
                module_id = COALESCE(?, module_id),
                solution = COALESCE(?, solution),
                solution_note = COALESCE(?, solution_note),
                resolved_version_id = COALESCE(?, resolved_version_id),
                updated_at = ?
             WHERE id = ?",
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.status)
        .bind(&input.severity)
        .bind(&input.priority)
        .bind(input.confirmed)
        .bind(input.module_id)
        .bind(&input.solution)
        .bind(&input.solution_note)
        .bind(input.resolved_version_id)
        .bind(now_text())
        .bind(id)
        .execute(pool)
        .await?;

        Self::find_by_id(pool, id).await
    }

    /// Project the bug belongs to.
    pub async fn project_id(pool: &DbPool, id: DbId) -> Result<Option<DbId>, sqlx::Error> {
        let row: Option<(DbId,)> = sqlx::query_as("SELECT project_id FROM bugs WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(|(project_id,)| project_id))
    }

    // -----------------------------------------------------------------------
    // Assignees
    // -----------------------------------------------------------------------

    /// Add an assignee unless already present. Returns `true` if a link was
    /// created.
    pub async fn add_assignee(pool: &DbPool, bug_id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let existing: Option<(DbId,)> =
            sqlx::query_as("SELECT user_id FROM bug_assignees WHERE bug_id = ? AND user_id = ?")
                .bind(bug_id)
                .bind(user_id)
                .fetch_optional(pool)
                .await?;
        if existing.is_some() {
            return Ok(false);
        }

        sqlx::query("INSERT INTO bug_assignees (bug_id, user_id) VALUES (?, ?)")
            .bind(bug_id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(true)
    }

    /// Replace the assignee set in one transaction.
    pub async fn set_assignees(pool: &DbPool, bug_id: DbId, user_ids: &[DbId]) -> Result<(), sqlx::Error> {
        let mut ids = user_ids.to_vec();
        ids.sort_unstable();
        ids.dedup();

        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM bug_assignees WHERE bug_id = ?")
            .bind(bug_id)
            .execute(&mut *tx)
            .await?;

        for user_id in ids {
            sqlx::query("INSERT INTO bug_assignees (bug_id, user_id) VALUES (?, ?)")
                .bind(bug_id)
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Assignee user ids, ascending.
    pub async fn assignee_ids(pool: &DbPool, bug_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> =
            sqlx::query_as("SELECT user_id FROM bug_assignees WHERE bug_id = ? ORDER BY user_id ASC")
                .bind(bug_id)
                .fetch_all(pool)
                .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }
}
