//! Repository for the append-only `actions` and `histories` tables.

use pmhub_core::types::DbId;

use crate::models::action::{Action, ActionWithHistories, CreateAction, CreateHistory, History};
use crate::repositories::inserted_id;
use crate::DbPool;

const ACTION_COLUMNS: &str =
    "id, object_type, object_id, project_id, actor_id, action, date, comment, extra";

const HISTORY_COLUMNS: &str =
    "id, action_id, field, old_value, old_display, new_value, new_display, diff";

pub struct ActionRepo;

impl ActionRepo {
    /// Insert an action and its histories atomically, returning the new
    /// action id.
    pub async fn create_with_histories(
        pool: &DbPool,
        action: &CreateAction,
        histories: &[CreateHistory],
    ) -> Result<DbId, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let result = sqlx::query(
            "INSERT INTO actions (object_type, object_id, project_id, actor_id, action, date, comment, extra)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&action.object_type)
        .bind(action.object_id)
        .bind(action.project_id)
        .bind(action.actor_id)
        .bind(&action.action)
        .bind(&action.date)
        .bind(&action.comment)
        .bind(&action.extra)
        .execute(&mut *tx)
        .await?;
        let action_id = inserted_id(&result)?;

        for history in histories {
            sqlx::query(
                "INSERT INTO histories (action_id, field, old_value, old_display, new_value, new_display, diff)
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(action_id)
            .bind(&history.field)
            .bind(&history.old_value)
            .bind(&history.old_display)
            .bind(&history.new_value)
            .bind(&history.new_display)
            .bind(&history.diff)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(action_id)
    }

    pub async fn find_by_id(pool: &DbPool, id: DbId) -> Result<Option<Action>, sqlx::Error> {
        let query = format!("SELECT {ACTION_COLUMNS} FROM actions WHERE id = ?");
        sqlx::query_as::<_, Action>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Histories of one action in insertion order.
    pub async fn histories(pool: &DbPool, action_id: DbId) -> Result<Vec<History>, sqlx::Error> {
        let query = format!("SELECT {HISTORY_COLUMNS} FROM histories WHERE action_id = ? ORDER BY id ASC");
        sqlx::query_as::<_, History>(&query)
            .bind(action_id)
            .fetch_all(pool)
            .await
    }

    /// Actions on one object, newest first, each with its histories.
    pub async fn list_for_object(
        pool: &DbPool,
        object_type: &str,
        object_id: DbId,
    ) -> Result<Vec<ActionWithHistories>, sqlx::Error> {
        let query = format!(
            "SELECT {ACTION_COLUMNS} FROM actions
             WHERE object_type = ? AND object_id = ?
             ORDER BY date DESC, id DESC"
        );
        let actions = sqlx::query_as::<_, Action>(&query)
            .bind(object_type)
            .bind(object_id)
            .fetch_all(pool)
            .await?;

        let mut out = Vec::with_capacity(actions.len());
        for action in actions {
            let histories = Self::histories(pool, action.id).await?;
            out.push(ActionWithHistories { action, histories });
        }
        Ok(out)
    }

    /// Number of actions recorded for an object.
    pub async fn count_for_object(
        pool: &DbPool,
        object_type: &str,
        object_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM actions WHERE object_type = ? AND object_id = ?")
                .bind(object_type)
                .bind(object_id)
                .fetch_one(pool)
                .await?;
        Ok(count)
    }
}
