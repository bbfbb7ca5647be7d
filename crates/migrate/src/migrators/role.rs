//! Roles (legacy groups) and their permission sets.

use pmhub_core::id_map::EntityKind;
use pmhub_core::mapping::map_permission_code;
use pmhub_core::slug::role_code;
use pmhub_core::types::DbId;
use pmhub_db::models::legacy::LegacyGroup;
use pmhub_db::models::role::CreateRole;
use pmhub_db::repositories::{LegacyRepo, PermissionRepo, RoleRepo};

use crate::context::MigrationContext;
use crate::error::MigrateError;
use crate::stats::EntityStats;

pub const ENTITY: &str = "roles";

const ADMIN_NAME_MARKERS: &[&str] = &["admin", "管理员", "管理"];

/// Whether a legacy group stands for the administrator role.
pub fn is_admin_group(name: &str) -> bool {
    let name = name.to_lowercase();
    ADMIN_NAME_MARKERS.iter().any(|marker| name.contains(marker))
}

pub async fn migrate(ctx: &mut MigrationContext) -> Result<EntityStats, MigrateError> {
    let groups = LegacyRepo::list_groups(&ctx.legacy)
        .await
        .map_err(MigrateError::read(ENTITY))?;
    let mut stats = EntityStats::with_read(groups.len());

    for group in &groups {
        if is_admin_group(&group.name) {
            match ctx.admin_role_id().await {
                Ok(admin_id) => {
                    ctx.resolver.record(EntityKind::Role, group.id, admin_id);
                    stats.existing += 1;
                    tracing::info!(legacy_id = group.id, name = %group.name, "Mapped group to admin role");
                }
                Err(e) => {
                    tracing::error!(legacy_id = group.id, error = %e, "Failed to resolve admin role");
                    stats.failed += 1;
                }
            }
            continue;
        }

        match upsert_role(ctx, group).await {
            Ok(Some(_)) => stats.created += 1,
            Ok(None) => stats.existing += 1,
            Err(e) => {
                tracing::error!(legacy_id = group.id, name = %group.name, error = %e, "Failed to migrate role");
                stats.failed += 1;
            }
        }
    }

    Ok(stats)
}

/// Returns the new role id, or `None` when an existing role was mapped.
async fn upsert_role(
    ctx: &mut MigrationContext,
    group: &LegacyGroup,
) -> Result<Option<DbId>, sqlx::Error> {
    let code = role_code(&group.name);

    // Role names are unique as well, so either key may already be taken.
    let existing = match RoleRepo::find_by_code(&ctx.target, &code).await? {
        Some(role) => Some(role),
        None => RoleRepo::find_by_name(&ctx.target, &group.name).await?,
    };
    if let Some(role) = existing {
        ctx.resolver.record(EntityKind::Role, group.id, role.id);
        tracing::info!(legacy_id = group.id, id = role.id, code = %role.code, "Role already exists");
        return Ok(None);
    }

    let permission_ids = permission_ids_for(ctx, group.id).await?;
    let role = RoleRepo::create_with_permissions(
        &ctx.target,
        &CreateRole {
            name: group.name.clone(),
            code,
            description: group.description.clone(),
            status: 1,
        },
        &permission_ids,
    )
    .await?;
    ctx.resolver.record(EntityKind::Role, group.id, role.id);

    tracing::info!(
        legacy_id = group.id,
        id = role.id,
        code = %role.code,
        permissions = permission_ids.len(),
        "Migrated role",
    );
    Ok(Some(role.id))
}

/// Target permission ids for a legacy group's grants. Grants outside the
/// mapped module/method set are dropped.
async fn permission_ids_for(
    ctx: &MigrationContext,
    group_id: i64,
) -> Result<Vec<DbId>, sqlx::Error> {
    let grants = LegacyRepo::group_privileges(&ctx.legacy, group_id).await?;

    let mut codes: Vec<String> = grants
        .iter()
        .filter_map(|grant| map_permission_code(&grant.module, &grant.method))
        .collect();
    codes.sort();
    codes.dedup();

    let mut ids = Vec::with_capacity(codes.len());
    for code in &codes {
        match PermissionRepo::find_by_code(&ctx.target, code).await? {
            Some(permission) => ids.push(permission.id),
            None => tracing::debug!(code = %code, "Permission not in catalogue, dropped"),
        }
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_groups_by_name() {
        assert!(is_admin_group("admin"));
        assert!(is_admin_group("System Admins"));
        assert!(is_admin_group("管理员"));
        assert!(is_admin_group("项目管理"));
        assert!(!is_admin_group("Developers"));
        assert!(!is_admin_group("测试"));
    }
}
