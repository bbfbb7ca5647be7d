//! Repository for the `project_members` table.

use pmhub_core::types::DbId;

use crate::models::project_member::{CreateProjectMember, ProjectMember};
use crate::repositories::inserted_id;
use crate::{now_text, DbPool};

const COLUMNS: &str = "id, project_id, user_id, role, created_at, updated_at";

pub struct ProjectMemberRepo;

impl ProjectMemberRepo {
    pub async fn create(
        pool: &DbPool,
        input: &CreateProjectMember,
    ) -> Result<ProjectMember, sqlx::Error> {
        let now = now_text();
        let result = sqlx::query(
            "INSERT INTO project_members (project_id, user_id, role, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(input.project_id)
        .bind(input.user_id)
        .bind(&input.role)
        .bind(&now)
        .bind(&now)
        .execute(pool)
        .await?;

        let id = inserted_id(&result)?;
        let query = format!("SELECT {COLUMNS} FROM project_members WHERE id = ?");
        sqlx::query_as::<_, ProjectMember>(&query)
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Find the membership of `user_id` in `project_id`.
    pub async fn find(
        pool: &DbPool,
        project_id: DbId,
        user_id: DbId,
    ) -> Result<Option<ProjectMember>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM project_members WHERE project_id = ? AND user_id = ?");
        sqlx::query_as::<_, ProjectMember>(&query)
            .bind(project_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Change a member's role. Returns `true` if the row was updated.
    pub async fn update_role(pool: &DbPool, id: DbId, role: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE project_members SET role = ?, updated_at = ? WHERE id = ?")
            .bind(role)
            .bind(now_text())
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn list_for_project(
        pool: &DbPool,
        project_id: DbId,
    ) -> Result<Vec<ProjectMember>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM project_members WHERE project_id = ? ORDER BY user_id ASC");
        sqlx::query_as::<_, ProjectMember>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }
}
