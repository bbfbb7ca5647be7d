//! Bug entity model and DTOs.
//!
//! Assignees live in the `bug_assignees` join table and are not part of the
//! row; their changes are recorded as explicit `assignee_ids` field changes.

use pmhub_core::changes::{AuditField, Auditable};
use pmhub_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `bugs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Bug {
    pub id: DbId,
    /// Legacy bug id this row was migrated from.
    pub legacy_id: Option<i64>,
    pub title: String,
    pub description: String,
    pub status: String,
    pub severity: String,
    pub priority: String,
    /// 0 or 1.
    pub confirmed: i64,
    pub project_id: DbId,
    pub requirement_id: Option<DbId>,
    pub module_id: Option<DbId>,
    pub creator_id: Option<DbId>,
    pub solution: String,
    pub solution_note: String,
    pub resolved_version_id: Option<DbId>,
    pub created_at: String,
    pub updated_at: String,
}

/// DTO for creating a new bug.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBug {
    pub legacy_id: Option<i64>,
    pub title: String,
    pub description: String,
    pub status: String,
    pub severity: String,
    pub priority: String,
    pub confirmed: i64,
    pub project_id: DbId,
    pub requirement_id: Option<DbId>,
    pub module_id: Option<DbId>,
    pub creator_id: Option<DbId>,
    pub solution: String,
    pub solution_note: String,
}

/// DTO for updating a bug. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBug {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub severity: Option<String>,
    pub priority: Option<String>,
    pub confirmed: Option<i64>,
    pub module_id: Option<DbId>,
    pub solution: Option<String>,
    pub solution_note: Option<String>,
    pub resolved_version_id: Option<DbId>,
}

impl Auditable for Bug {
    fn audit_fields(&self) -> Vec<AuditField> {
        vec![
            AuditField::new("id", self.id),
            AuditField::new("title", &self.title),
            AuditField::new("description", &self.description),
            AuditField::new("status", &self.status),
            AuditField::new("severity", &self.severity),
            AuditField::new("priority", &self.priority),
            AuditField::new("confirmed", self.confirmed),
            AuditField::new("project_id", self.project_id),
            AuditField::new("requirement_id", self.requirement_id),
            AuditField::new("module_id", self.module_id),
            AuditField::new("creator_id", self.creator_id),
            AuditField::new("solution", &self.solution),
            AuditField::new("solution_note", &self.solution_note),
            AuditField::new("resolved_version_id", self.resolved_version_id),
            AuditField::new("created_at", &self.created_at),
            AuditField::new("updated_at", &self.updated_at),
        ]
    }
}
