//! Project memberships, from legacy teams or, when there are none, inferred
//! from who is assigned work in each project.

use pmhub_core::id_map::EntityKind;
use pmhub_core::mapping::ProjectRole;
use pmhub_core::types::DbId;
use pmhub_db::models::legacy::LegacyTeamMember;
use pmhub_db::models::project_member::CreateProjectMember;
use pmhub_db::repositories::{LegacyRepo, ProjectMemberRepo};

use super::task::project_for;
use crate::context::MigrationContext;
use crate::error::MigrateError;
use crate::stats::EntityStats;

pub const ENTITY: &str = "project_members";

/// What happened to one membership row.
enum Outcome {
    Created,
    Existing,
}

pub async fn migrate(ctx: &mut MigrationContext) -> Result<EntityStats, MigrateError> {
    let teams = match LegacyRepo::list_team_members(&ctx.legacy).await {
        Ok(teams) => teams,
        Err(e) => {
            tracing::warn!(error = %e, "Legacy teams unavailable");
            Vec::new()
        }
    };

    if teams.is_empty() {
        tracing::info!("No legacy teams, inferring members from assignees");
        return Ok(infer_from_assignees(ctx).await);
    }

    let mut stats = EntityStats::with_read(teams.len());
    for member in &teams {
        let project_id = match team_project(ctx, member).await {
            Ok(Some(id)) => id,
            Ok(None) => {
                tracing::debug!(root = member.root, kind = %member.team_type, "Team root not migrated, skipped");
                stats.skipped += 1;
                continue;
            }
            Err(e) => {
                tracing::error!(root = member.root, error = %e, "Failed to resolve team root");
                stats.failed += 1;
                continue;
            }
        };

        let role = ProjectRole::from_legacy(&member.role);
        match upsert(ctx, project_id, &member.account, role, true).await {
            Ok(Some(Outcome::Created)) => stats.created += 1,
            Ok(Some(Outcome::Existing)) => stats.existing += 1,
            Ok(None) => stats.skipped += 1,
            Err(e) => {
                tracing::error!(project_id, account = %member.account, error = %e, "Failed to migrate member");
                stats.failed += 1;
            }
        }
    }

    Ok(stats)
}

/// Target project a team row belongs to.
async fn team_project(
    ctx: &MigrationContext,
    member: &LegacyTeamMember,
) -> Result<Option<DbId>, sqlx::Error> {
    if member.root <= 0 {
        return Ok(None);
    }
    match member.team_type.trim() {
        // Executions were migrated as projects of their own.
        "project" | "execution" => Ok(ctx.resolver.resolve(EntityKind::Project, member.root)),
        "task" => Ok(LegacyRepo::task_parents(&ctx.legacy, member.root)
            .await?
            .and_then(|(execution, project)| project_for(&ctx.resolver, execution, project))),
        _ => Ok(None),
    }
}

async fn infer_from_assignees(ctx: &mut MigrationContext) -> EntityStats {
    let assignments = match LegacyRepo::list_assignments(&ctx.legacy).await {
        Ok(rows) => rows,
        Err(e) => {
            tracing::warn!(error = %e, "Cannot infer project members");
            return EntityStats::default();
        }
    };

    let mut stats = EntityStats::with_read(assignments.len());
    for assignment in &assignments {
        let Some(project_id) = ctx.resolver.resolve(EntityKind::Project, assignment.project) else {
            stats.skipped += 1;
            continue;
        };
        match upsert(ctx, project_id, &assignment.account, ProjectRole::Member, false).await {
            Ok(Some(Outcome::Created)) => stats.created += 1,
            Ok(Some(Outcome::Existing)) => stats.existing += 1,
            Ok(None) => stats.skipped += 1,
            Err(e) => {
                tracing::error!(project_id, account = %assignment.account, error = %e, "Failed to add inferred member");
                stats.failed += 1;
            }
        }
    }
    stats
}

/// Add `account` to the project, or update the role of an existing member
/// when `overwrite_role` is set. `None` when the account is not a migrated
/// user.
async fn upsert(
    ctx: &mut MigrationContext,
    project_id: DbId,
    account: &str,
    role: ProjectRole,
    overwrite_role: bool,
) -> Result<Option<Outcome>, sqlx::Error> {
    let Some(user_id) = ctx.resolver.resolve_by_account(&ctx.legacy, account).await? else {
        return Ok(None);
    };

    if let Some(existing) = ProjectMemberRepo::find(&ctx.target, project_id, user_id).await? {
        if overwrite_role && existing.role != role.as_str() {
            ProjectMemberRepo::update_role(&ctx.target, existing.id, role.as_str()).await?;
            tracing::info!(project_id, user_id, role = %role.as_str(), "Updated member role");
        }
        return Ok(Some(Outcome::Existing));
    }

    ProjectMemberRepo::create(
        &ctx.target,
        &CreateProjectMember {
            project_id,
            user_id,
            role: role.as_str().to_string(),
        },
    )
    .await?;
    tracing::info!(project_id, user_id, role = %role.as_str(), "Added project member");
    Ok(Some(Outcome::Created))
}
