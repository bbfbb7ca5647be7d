//! Audit trail models: an `Action` names an event on an object and owns
//! zero or more `History` rows, one per changed field. Both are append-only.

use pmhub_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Action {
    pub id: DbId,
    pub object_type: String,
    pub object_id: DbId,
    pub project_id: Option<DbId>,
    pub actor_id: DbId,
    pub action: String,
    pub date: String,
    pub comment: String,
    /// Opaque JSON text.
    pub extra: Option<String>,
}

/// DTO for inserting an action.
#[derive(Debug, Clone)]
pub struct CreateAction {
    pub object_type: String,
    pub object_id: DbId,
    pub project_id: Option<DbId>,
    pub actor_id: DbId,
    pub action: String,
    pub date: String,
    pub comment: String,
    pub extra: Option<String>,
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct History {
    pub id: DbId,
    pub action_id: DbId,
    pub field: String,
    pub old_value: String,
    pub old_display: String,
    pub new_value: String,
    pub new_display: String,
    pub diff: Option<String>,
}

/// DTO for a history row; the action id is assigned on insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateHistory {
    pub field: String,
    pub old_value: String,
    pub old_display: String,
    pub new_value: String,
    pub new_display: String,
    pub diff: Option<String>,
}

/// An action together with its field histories, for the audit UI.
#[derive(Debug, Clone, Serialize)]
pub struct ActionWithHistories {
    #[serde(flatten)]
    pub action: Action,
    pub histories: Vec<History>,
}
