//! Release version model. Referenced by bugs as their resolved version.

use pmhub_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Version {
    pub id: DbId,
    pub project_id: DbId,
    pub version_number: String,
    pub description: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateVersion {
    pub project_id: DbId,
    pub version_number: String,
    pub description: String,
}
