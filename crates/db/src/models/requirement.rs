//! Requirement entity model and DTOs.

use pmhub_core::changes::{AuditField, Auditable};
use pmhub_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `requirements` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Requirement {
    pub id: DbId,
    /// Legacy story id this row was migrated from.
    pub legacy_id: Option<i64>,
    pub title: String,
    pub description: String,
    pub status: String,
    pub priority: String,
    pub project_id: DbId,
    pub creator_id: Option<DbId>,
    pub assignee_id: Option<DbId>,
    pub estimated_hours: Option<f64>,
    pub created_at: String,
    pub updated_at: String,
}

/// DTO for creating a new requirement.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRequirement {
    pub legacy_id: Option<i64>,
    pub title: String,
    pub description: String,
    pub status: String,
    pub priority: String,
    pub project_id: DbId,
    pub creator_id: Option<DbId>,
    pub assignee_id: Option<DbId>,
    pub estimated_hours: Option<f64>,
}

/// DTO for updating a requirement. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateRequirement {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub assignee_id: Option<DbId>,
    pub estimated_hours: Option<f64>,
}

impl Auditable for Requirement {
    fn audit_fields(&self) -> Vec<AuditField> {
        vec![
            AuditField::new("id", self.id),
            AuditField::new("title", &self.title),
            AuditField::new("description", &self.description),
            AuditField::new("status", &self.status),
            AuditField::new("priority", &self.priority),
            AuditField::new("project_id", self.project_id),
            AuditField::new("creator_id", self.creator_id),
            AuditField::new("assignee_id", self.assignee_id),
            AuditField::new("estimated_hours", self.estimated_hours),
            AuditField::new("created_at", &self.created_at),
            AuditField::new("updated_at", &self.updated_at),
        ]
    }
}
