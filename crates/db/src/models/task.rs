//! Task entity model and DTOs.

use pmhub_core::changes::{AuditField, Auditable};
use pmhub_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `tasks` table. Dates are `YYYY-MM-DD` text.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Task {
    pub id: DbId,
    /// Legacy task id this row was migrated from.
    pub legacy_id: Option<i64>,
    pub title: String,
    pub description: String,
    pub status: String,
    pub priority: String,
    pub project_id: DbId,
    pub requirement_id: Option<DbId>,
    pub creator_id: Option<DbId>,
    pub assignee_id: Option<DbId>,
    pub start_date: Option<String>,
    pub due_date: Option<String>,
    pub end_date: Option<String>,
    pub estimated_hours: Option<f64>,
    pub actual_hours: Option<f64>,
    /// Percent complete, 0 to 100.
    pub progress: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// DTO for creating a new task.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTask {
    pub legacy_id: Option<i64>,
    pub title: String,
    pub description: String,
    pub status: String,
    pub priority: String,
    pub project_id: DbId,
    pub requirement_id: Option<DbId>,
    pub creator_id: Option<DbId>,
    pub assignee_id: Option<DbId>,
    pub start_date: Option<String>,
    pub due_date: Option<String>,
    pub end_date: Option<String>,
    pub estimated_hours: Option<f64>,
    pub actual_hours: Option<f64>,
    pub progress: i64,
}

/// DTO for updating a task. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub assignee_id: Option<DbId>,
    pub due_date: Option<String>,
    pub actual_hours: Option<f64>,
    pub progress: Option<i64>,
}

impl Auditable for Task {
    fn audit_fields(&self) -> Vec<AuditField> {
        vec![
            AuditField::new("id", self.id),
            AuditField::new("title", &self.title),
            AuditField::new("description", &self.description),
            AuditField::new("status", &self.status),
            AuditField::new("priority", &self.priority),
            AuditField::new("project_id", self.project_id),
            AuditField::new("requirement_id", self.requirement_id),
            AuditField::new("creator_id", self.creator_id),
            AuditField::new("assignee_id", self.assignee_id),
            AuditField::new("start_date", self.start_date.clone()),
            AuditField::new("due_date", self.due_date.clone()),
            AuditField::new("end_date", self.end_date.clone()),
            AuditField::new("estimated_hours", self.estimated_hours),
            AuditField::new("actual_hours", self.actual_hours),
            AuditField::new("progress", self.progress),
            AuditField::new("created_at", &self.created_at),
            AuditField::new("updated_at", &self.updated_at),
        ]
    }
}
