//! Project entity model and DTOs.

use pmhub_core::changes::{AuditField, Auditable};
use pmhub_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `projects` table. Dates are `YYYY-MM-DD` text.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub code: String,
    pub description: String,
    pub status: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// DTO for creating a new project.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    pub name: String,
    pub code: String,
    pub description: String,
    pub status: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl Auditable for Project {
    fn audit_fields(&self) -> Vec<AuditField> {
        vec![
            AuditField::new("id", self.id),
            AuditField::new("name", &self.name),
            AuditField::new("code", &self.code),
            AuditField::new("description", &self.description),
            AuditField::new("status", &self.status),
            AuditField::new("start_date", self.start_date.clone()),
            AuditField::new("end_date", self.end_date.clone()),
            AuditField::new("created_at", &self.created_at),
            AuditField::new("updated_at", &self.updated_at),
        ]
    }
}
