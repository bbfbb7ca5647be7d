//! Department entity model and DTOs.

use pmhub_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `departments` table.
///
/// `parent_id`, when set, refers to a department whose `level` is exactly
/// one less than this row's.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Department {
    pub id: DbId,
    pub name: String,
    pub code: String,
    pub parent_id: Option<DbId>,
    pub level: i64,
    pub sort: i64,
    pub status: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// DTO for creating a new department.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDepartment {
    pub name: String,
    pub code: String,
    pub parent_id: Option<DbId>,
    pub level: i64,
    pub sort: i64,
    pub status: i64,
}
