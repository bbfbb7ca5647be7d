//! Read-only access to the legacy `zt_*` schema.
//!
//! Every selected column is normalised in SQL so rows decode identically
//! through the `Any` driver on MySQL and SQLite: integers via
//! `CAST(.. AS SIGNED)`, enums, dates and text via `CAST(.. AS CHAR)`,
//! NULLs via `COALESCE`. Reserved identifiers are back-quoted.

use pmhub_core::types::LegacyId;

use crate::models::legacy::{
    LegacyAssignment, LegacyBug, LegacyDept, LegacyGroup, LegacyModule, LegacyPrivilege,
    LegacyProject, LegacyStory, LegacyTask, LegacyTeamMember, LegacyUser,
};
use crate::DbPool;

/// `assignedTo` placeholder for work items nobody owns any more.
const CLOSED_ASSIGNEE: &str = "closed";

pub struct LegacyRepo;

impl LegacyRepo {
    // -----------------------------------------------------------------------
    // Organisation
    // -----------------------------------------------------------------------

    /// All departments in id order.
    pub async fn list_depts(pool: &DbPool) -> Result<Vec<LegacyDept>, sqlx::Error> {
        sqlx::query_as::<_, LegacyDept>(
            "SELECT CAST(id AS SIGNED) AS id,
                    COALESCE(CAST(name AS CHAR), '') AS name,
                    COALESCE(CAST(parent AS SIGNED), 0) AS parent,
                    COALESCE(CAST(grade AS SIGNED), 0) AS grade,
                    COALESCE(CAST(`order` AS SIGNED), 0) AS sort_order
             FROM zt_dept
             ORDER BY id ASC",
        )
        .fetch_all(pool)
        .await
    }

    /// All groups (legacy roles) in id order.
    pub async fn list_groups(pool: &DbPool) -> Result<Vec<LegacyGroup>, sqlx::Error> {
        sqlx::query_as::<_, LegacyGroup>(
            "SELECT CAST(id AS SIGNED) AS id,
                    COALESCE(CAST(name AS CHAR), '') AS name,
                    COALESCE(CAST(`desc` AS CHAR), '') AS description
             FROM zt_group
             ORDER BY id ASC",
        )
        .fetch_all(pool)
        .await
    }

    /// `(module, method)` grants of one group.
    pub async fn group_privileges(
        pool: &DbPool,
        group_id: LegacyId,
    ) -> Result<Vec<LegacyPrivilege>, sqlx::Error> {
        sqlx::query_as::<_, LegacyPrivilege>(
            "SELECT COALESCE(CAST(module AS CHAR), '') AS module,
                    COALESCE(CAST(method AS CHAR), '') AS method
             FROM zt_grouppriv
             WHERE `group` = ?
             ORDER BY module ASC, method ASC",
        )
        .bind(group_id)
        .fetch_all(pool)
        .await
    }

    /// All users, deleted ones included, in id order.
    pub async fn list_users(pool: &DbPool) -> Result<Vec<LegacyUser>, sqlx::Error> {
        sqlx::query_as::<_, LegacyUser>(
            "SELECT CAST(id AS SIGNED) AS id,
                    COALESCE(CAST(account AS CHAR), '') AS account,
                    COALESCE(CAST(realname AS CHAR), '') AS realname,
                    COALESCE(CAST(email AS CHAR), '') AS email,
                    COALESCE(CAST(mobile AS CHAR), '') AS mobile,
                    COALESCE(CAST(avatar AS CHAR), '') AS avatar,
                    COALESCE(CAST(dept AS SIGNED), 0) AS dept,
                    COALESCE(CAST(role AS CHAR), '') AS role,
                    COALESCE(CAST(deleted AS CHAR), '0') AS deleted
             FROM zt_user
             ORDER BY id ASC",
        )
        .fetch_all(pool)
        .await
    }

    /// Legacy user id for an account name.
    pub async fn user_id_by_account(
        pool: &DbPool,
        account: &str,
    ) -> Result<Option<LegacyId>, sqlx::Error> {
        let row: Option<(LegacyId,)> =
            sqlx::query_as("SELECT CAST(id AS SIGNED) AS id FROM zt_user WHERE account = ?")
                .bind(account)
                .fetch_optional(pool)
                .await?;
        Ok(row.map(|(id,)| id))
    }

    /// Group ids an account belongs to.
    pub async fn group_ids_for_account(
        pool: &DbPool,
        account: &str,
    ) -> Result<Vec<LegacyId>, sqlx::Error> {
        let rows: Vec<(LegacyId,)> = sqlx::query_as(
            "SELECT CAST(`group` AS SIGNED) AS group_id
             FROM zt_usergroup
             WHERE account = ?
             ORDER BY group_id ASC",
        )
        .bind(account)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    // -----------------------------------------------------------------------
    // Projects and modules
    // -----------------------------------------------------------------------

    /// Non-deleted projects and sprints in id order.
    pub async fn list_projects(pool: &DbPool) -> Result<Vec<LegacyProject>, sqlx::Error> {
        sqlx::query_as::<_, LegacyProject>(
            "SELECT CAST(id AS SIGNED) AS id,
                    COALESCE(CAST(name AS CHAR), '') AS name,
                    COALESCE(CAST(code AS CHAR), '') AS code,
                    COALESCE(CAST(`desc` AS CHAR), '') AS description,
                    COALESCE(CAST(`begin` AS CHAR), '') AS begin_date,
                    COALESCE(CAST(`end` AS CHAR), '') AS end_date,
                    COALESCE(CAST(status AS CHAR), '') AS status,
                    COALESCE(CAST(type AS CHAR), '') AS project_type
             FROM zt_project
             WHERE type IN ('project', 'sprint') AND deleted = '0'
             ORDER BY id ASC",
        )
        .fetch_all(pool)
        .await
    }

    /// Non-deleted modules in id order.
    pub async fn list_modules(pool: &DbPool) -> Result<Vec<LegacyModule>, sqlx::Error> {
        sqlx::query_as::<_, LegacyModule>(
            "SELECT CAST(id AS SIGNED) AS id,
                    COALESCE(CAST(name AS CHAR), '') AS name,
                    COALESCE(CAST(root AS SIGNED), 0) AS root,
                    COALESCE(CAST(type AS CHAR), '') AS module_type,
                    COALESCE(CAST(parent AS SIGNED), 0) AS parent,
                    COALESCE(CAST(grade AS SIGNED), 0) AS grade
             FROM zt_module
             WHERE deleted = '0'
             ORDER BY id ASC",
        )
        .fetch_all(pool)
        .await
    }

    // -----------------------------------------------------------------------
    // Stories
    // -----------------------------------------------------------------------

    /// Non-deleted stories in id order.
    pub async fn list_stories(pool: &DbPool) -> Result<Vec<LegacyStory>, sqlx::Error> {
        sqlx::query_as::<_, LegacyStory>(
            "SELECT CAST(id AS SIGNED) AS id,
                    COALESCE(CAST(title AS CHAR), '') AS title,
                    COALESCE(CAST(status AS CHAR), '') AS status,
                    COALESCE(CAST(pri AS SIGNED), 0) AS pri,
                    COALESCE(CAST(product AS SIGNED), 0) AS product,
                    COALESCE(CAST(openedBy AS CHAR), '') AS opened_by,
                    COALESCE(CAST(assignedTo AS CHAR), '') AS assigned_to,
                    COALESCE(estimate, 0) + 0.0 AS estimate
             FROM zt_story
             WHERE deleted = '0'
             ORDER BY id ASC",
        )
        .fetch_all(pool)
        .await
    }

    /// Latest spec text of a story.
    pub async fn story_spec(pool: &DbPool, story_id: LegacyId) -> Result<Option<String>, sqlx::Error> {
        let row: Option<(String,)> = sqlx::query_as(
            "SELECT COALESCE(CAST(spec AS CHAR), '') AS spec
             FROM zt_storyspec
             WHERE story = ?
             ORDER BY version DESC
             LIMIT 1",
        )
        .bind(story_id)
        .fetch_optional(pool)
        .await?;
        Ok(row.map(|(spec,)| spec))
    }

    /// Projects a story is linked to directly.
    pub async fn story_project_ids(
        pool: &DbPool,
        story_id: LegacyId,
    ) -> Result<Vec<LegacyId>, sqlx::Error> {
        let rows: Vec<(LegacyId,)> = sqlx::query_as(
            "SELECT CAST(project AS SIGNED) AS project
             FROM zt_projectstory
             WHERE story = ?
             ORDER BY project ASC",
        )
        .bind(story_id)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Projects a product is linked to.
    pub async fn product_project_ids(
        pool: &DbPool,
        product_id: LegacyId,
    ) -> Result<Vec<LegacyId>, sqlx::Error> {
        let rows: Vec<(LegacyId,)> = sqlx::query_as(
            "SELECT CAST(project AS SIGNED) AS project
             FROM zt_projectproduct
             WHERE product = ?
             ORDER BY project ASC",
        )
        .bind(product_id)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    // -----------------------------------------------------------------------
    // Tasks and bugs
    // -----------------------------------------------------------------------

    /// Non-deleted tasks in id order.
    pub async fn list_tasks(pool: &DbPool) -> Result<Vec<LegacyTask>, sqlx::Error> {
        sqlx::query_as::<_, LegacyTask>(
            "SELECT CAST(id AS SIGNED) AS id,
                    COALESCE(CAST(name AS CHAR), '') AS name,
                    COALESCE(CAST(`desc` AS CHAR), '') AS description,
                    COALESCE(CAST(status AS CHAR), '') AS status,
                    COALESCE(CAST(pri AS SIGNED), 0) AS pri,
                    COALESCE(CAST(project AS SIGNED), 0) AS project,
                    COALESCE(CAST(execution AS SIGNED), 0) AS execution,
                    COALESCE(CAST(story AS SIGNED), 0) AS story,
                    COALESCE(CAST(openedBy AS CHAR), '') AS opened_by,
                    COALESCE(CAST(assignedTo AS CHAR), '') AS assigned_to,
                    COALESCE(CAST(estStarted AS CHAR), '') AS est_started,
                    COALESCE(CAST(deadline AS CHAR), '') AS deadline,
                    COALESCE(estimate, 0) + 0.0 AS estimate,
                    COALESCE(consumed, 0) + 0.0 AS consumed
             FROM zt_task
             WHERE deleted = '0'
             ORDER BY id ASC",
        )
        .fetch_all(pool)
        .await
    }

    /// `(execution, project)` of a task, for task-team resolution.
    pub async fn task_parents(
        pool: &DbPool,
        task_id: LegacyId,
    ) -> Result<Option<(LegacyId, LegacyId)>, sqlx::Error> {
        sqlx::query_as(
            "SELECT COALESCE(CAST(execution AS SIGNED), 0) AS execution,
                    COALESCE(CAST(project AS SIGNED), 0) AS project
             FROM zt_task
             WHERE id = ?",
        )
        .bind(task_id)
        .fetch_optional(pool)
        .await
    }

    /// Non-deleted bugs in id order.
    pub async fn list_bugs(pool: &DbPool) -> Result<Vec<LegacyBug>, sqlx::Error> {
        sqlx::query_as::<_, LegacyBug>(
            "SELECT CAST(id AS SIGNED) AS id,
                    COALESCE(CAST(title AS CHAR), '') AS title,
                    COALESCE(CAST(steps AS CHAR), '') AS steps,
                    COALESCE(CAST(status AS CHAR), '') AS status,
                    COALESCE(CAST(severity AS SIGNED), 0) AS severity,
                    COALESCE(CAST(pri AS SIGNED), 0) AS pri,
                    COALESCE(CAST(project AS SIGNED), 0) AS project,
                    COALESCE(CAST(story AS SIGNED), 0) AS story,
                    COALESCE(CAST(module AS SIGNED), 0) AS module,
                    COALESCE(CAST(openedBy AS CHAR), '') AS opened_by,
                    COALESCE(CAST(assignedTo AS CHAR), '') AS assigned_to,
                    COALESCE(CAST(resolution AS CHAR), '') AS resolution,
                    COALESCE(CAST(resolvedBuild AS CHAR), '') AS resolved_build
             FROM zt_bug
             WHERE deleted = '0'
             ORDER BY id ASC",
        )
        .fetch_all(pool)
        .await
    }

    // -----------------------------------------------------------------------
    // Teams
    // -----------------------------------------------------------------------

    /// All team rows in a stable order.
    pub async fn list_team_members(pool: &DbPool) -> Result<Vec<LegacyTeamMember>, sqlx::Error> {
        sqlx::query_as::<_, LegacyTeamMember>(
            "SELECT COALESCE(CAST(root AS SIGNED), 0) AS root,
                    COALESCE(CAST(type AS CHAR), '') AS team_type,
                    COALESCE(CAST(account AS CHAR), '') AS account,
                    COALESCE(CAST(role AS CHAR), '') AS role
             FROM zt_team
             ORDER BY root ASC, account ASC",
        )
        .fetch_all(pool)
        .await
    }

    /// Distinct `(account, project)` pairs from the assignees of non-deleted
    /// tasks, stories and bugs. Task rows report their execution when set.
    pub async fn list_assignments(pool: &DbPool) -> Result<Vec<LegacyAssignment>, sqlx::Error> {
        sqlx::query_as::<_, LegacyAssignment>(
            "SELECT DISTINCT account, project FROM (
                 SELECT COALESCE(CAST(assignedTo AS CHAR), '') AS account,
                        CAST(CASE WHEN execution > 0 THEN execution ELSE project END AS SIGNED) AS project
                 FROM zt_task WHERE deleted = '0'
                 UNION
                 SELECT COALESCE(CAST(s.assignedTo AS CHAR), '') AS account,
                        CAST(ps.project AS SIGNED) AS project
                 FROM zt_story s JOIN zt_projectstory ps ON ps.story = s.id
                 WHERE s.deleted = '0'
                 UNION
                 SELECT COALESCE(CAST(assignedTo AS CHAR), '') AS account,
                        CAST(project AS SIGNED) AS project
                 FROM zt_bug WHERE deleted = '0'
             ) assignments
             WHERE account <> '' AND account <> ?
             ORDER BY project ASC, account ASC",
        )
        .bind(CLOSED_ASSIGNEE)
        .fetch_all(pool)
        .await
    }
}
