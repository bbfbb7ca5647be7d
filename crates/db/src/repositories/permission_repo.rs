//! Repository for the seeded `permissions` catalogue.

use crate::models::role::Permission;
use crate::DbPool;

const COLUMNS: &str = "id, code, name, resource, action";

/// Read access to permissions. The catalogue is seeded by migrations.
pub struct PermissionRepo;

impl PermissionRepo {
    /// Find a permission by its `{resource}:{action}` code.
    pub async fn find_by_code(pool: &DbPool, code: &str) -> Result<Option<Permission>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM permissions WHERE code = ?");
        sqlx::query_as::<_, Permission>(&query)
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &DbPool) -> Result<Vec<Permission>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM permissions ORDER BY id ASC");
        sqlx::query_as::<_, Permission>(&query).fetch_all(pool).await
    }
}
