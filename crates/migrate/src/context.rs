//! State shared by the migrators of one run.

use pmhub_core::types::DbId;
use pmhub_db::models::role::{CreateRole, ADMIN_ROLE_CODE};
use pmhub_db::repositories::{PermissionRepo, RoleRepo};
use pmhub_db::DbPool;

use crate::resolver::Resolver;

pub struct MigrationContext {
    pub legacy: DbPool,
    pub target: DbPool,
    pub resolver: Resolver,
    admin_role: Option<DbId>,
}

impl MigrationContext {
    pub fn new(legacy: DbPool, target: DbPool) -> Self {
        Self {
            legacy,
            target,
            resolver: Resolver::new(),
            admin_role: None,
        }
    }

    /// Id of the target `admin` role, creating it on first use.
    ///
    /// A freshly created admin role is granted the whole permission
    /// catalogue; an existing one is left as it is.
    pub async fn admin_role_id(&mut self) -> Result<DbId, sqlx::Error> {
        if let Some(id) = self.admin_role {
            return Ok(id);
        }

        let id = match RoleRepo::find_by_code(&self.target, ADMIN_ROLE_CODE).await? {
            Some(role) => role.id,
            None => {
                let all: Vec<DbId> = PermissionRepo::list(&self.target)
                    .await?
                    .into_iter()
                    .map(|p| p.id)
                    .collect();
                let role =
                    RoleRepo::create_with_permissions(&self.target, &CreateRole::admin(), &all)
                        .await?;
                tracing::info!(role_id = role.id, permissions = all.len(), "Created admin role");
                role.id
            }
        };

        self.admin_role = Some(id);
        Ok(id)
    }
}
