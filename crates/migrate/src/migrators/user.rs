//! Users and their role links.
//!
//! Every created account gets the same default password (see
//! [`DEFAULT_MIGRATED_PASSWORD`]); operators must force a reset on first
//! login.

use std::collections::BTreeSet;

use pmhub_core::id_map::EntityKind;
use pmhub_core::mapping::map_user_status;
use pmhub_core::password::{hash_password, DEFAULT_MIGRATED_PASSWORD};
use pmhub_core::types::DbId;
use pmhub_db::models::legacy::LegacyUser;
use pmhub_db::models::user::CreateUser;
use pmhub_db::repositories::{LegacyRepo, UserRepo};

use crate::context::MigrationContext;
use crate::error::MigrateError;
use crate::stats::EntityStats;

pub const ENTITY: &str = "users";

const ADMIN_ACCOUNT: &str = "admin";

/// Legacy account or role field marking a user as an administrator.
fn mentions_admin(value: &str) -> bool {
    value.to_lowercase().contains(ADMIN_ACCOUNT)
}

/// Nickname is the real name, falling back to the account.
pub fn nickname_for(user: &LegacyUser) -> String {
    let realname = user.realname.trim();
    if realname.is_empty() {
        user.account.trim().to_string()
    } else {
        realname.to_string()
    }
}

pub async fn migrate(ctx: &mut MigrationContext) -> Result<EntityStats, MigrateError> {
    let users = LegacyRepo::list_users(&ctx.legacy)
        .await
        .map_err(MigrateError::read(ENTITY))?;
    let mut stats = EntityStats::with_read(users.len());

    let password_hash =
        hash_password(DEFAULT_MIGRATED_PASSWORD).map_err(MigrateError::PasswordHash)?;

    for user in &users {
        let username = user.account.trim();
        if username.is_empty() {
            tracing::warn!(legacy_id = user.id, "User has no account name, skipped");
            stats.skipped += 1;
            continue;
        }

        match UserRepo::find_by_username(&ctx.target, username).await {
            Ok(Some(existing)) => {
                ctx.resolver.record(EntityKind::User, user.id, existing.id);
                stats.existing += 1;
                if username.eq_ignore_ascii_case(ADMIN_ACCOUNT) {
                    if let Err(e) = attach_admin(ctx, existing.id).await {
                        tracing::error!(user_id = existing.id, error = %e, "Failed to attach admin role");
                    }
                }
                continue;
            }
            Ok(None) => {}
            Err(e) => {
                tracing::error!(legacy_id = user.id, error = %e, "User lookup failed");
                stats.failed += 1;
                continue;
            }
        }

        let input = CreateUser {
            username: username.to_string(),
            nickname: nickname_for(user),
            password_hash: password_hash.clone(),
            email: user.email.trim().to_string(),
            phone: user.mobile.trim().to_string(),
            avatar: user.avatar.trim().to_string(),
            department_id: ctx.resolver.resolve(EntityKind::Department, user.dept),
            status: i64::from(map_user_status(&user.deleted)),
        };
        let created = match UserRepo::create(&ctx.target, &input).await {
            Ok(created) => created,
            Err(e) => {
                tracing::error!(legacy_id = user.id, account = %username, error = %e, "Failed to create user");
                stats.failed += 1;
                continue;
            }
        };
        ctx.resolver.record(EntityKind::User, user.id, created.id);
        stats.created += 1;

        match attach_roles(ctx, user, created.id).await {
            Ok(0) => tracing::warn!(account = %username, "User migrated without any role"),
            Ok(count) => tracing::debug!(account = %username, roles = count, "Attached roles"),
            Err(e) => tracing::error!(account = %username, error = %e, "Failed to attach roles"),
        }
        tracing::info!(
            legacy_id = user.id,
            id = created.id,
            account = %username,
            status = created.status,
            "Migrated user",
        );
    }

    Ok(stats)
}

async fn attach_admin(ctx: &mut MigrationContext, user_id: DbId) -> Result<(), sqlx::Error> {
    let admin_id = ctx.admin_role_id().await?;
    UserRepo::add_role(&ctx.target, user_id, admin_id).await?;
    Ok(())
}

/// Attach the roles a new user is entitled to. Returns how many distinct
/// roles were attached.
async fn attach_roles(
    ctx: &mut MigrationContext,
    user: &LegacyUser,
    user_id: DbId,
) -> Result<usize, sqlx::Error> {
    let mut roles: BTreeSet<DbId> = BTreeSet::new();

    if mentions_admin(&user.account) || mentions_admin(&user.role) {
        roles.insert(ctx.admin_role_id().await?);
    }

    for group_id in LegacyRepo::group_ids_for_account(&ctx.legacy, user.account.trim()).await? {
        match ctx.resolver.resolve(EntityKind::Role, group_id) {
            Some(role_id) => {
                roles.insert(role_id);
            }
            None => tracing::debug!(group_id, "Group was not migrated, membership dropped"),
        }
    }

    if roles.is_empty() && user.account.trim().eq_ignore_ascii_case(ADMIN_ACCOUNT) {
        roles.insert(ctx.admin_role_id().await?);
    }

    for &role_id in &roles {
        UserRepo::add_role(&ctx.target, user_id, role_id).await?;
    }
    Ok(roles.len())
}
