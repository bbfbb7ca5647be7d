//! Role and permission models.

use pmhub_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Code of the built-in administrator role.
pub const ADMIN_ROLE_CODE: &str = "admin";

/// Display name of the built-in administrator role.
pub const ADMIN_ROLE_NAME: &str = "管理员";

pub const ADMIN_ROLE_DESCRIPTION: &str = "系统管理员，拥有所有权限";

/// A row from the `roles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Role {
    pub id: DbId,
    pub name: String,
    pub code: String,
    pub description: String,
    pub status: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// DTO for creating a new role.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRole {
    pub name: String,
    pub code: String,
    pub description: String,
    pub status: i64,
}

impl CreateRole {
    /// The administrator role as the migration creates it.
    pub fn admin() -> Self {
        Self {
            name: ADMIN_ROLE_NAME.to_string(),
            code: ADMIN_ROLE_CODE.to_string(),
            description: ADMIN_ROLE_DESCRIPTION.to_string(),
            status: 1,
        }
    }
}

/// A row from the seeded `permissions` catalogue. Codes are
/// `{resource}:{action}`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Permission {
    pub id: DbId,
    pub code: String,
    pub name: String,
    pub resource: String,
    pub action: String,
}
