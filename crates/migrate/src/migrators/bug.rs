//! Bugs and their (single, during migration) assignee.

use pmhub_core::id_map::EntityKind;
use pmhub_core::mapping::{BugStatus, Priority, Severity};
use pmhub_db::models::bug::CreateBug;
use pmhub_db::models::legacy::LegacyBug;
use pmhub_db::repositories::{BugRepo, LegacyRepo};

use crate::context::MigrationContext;
use crate::error::MigrateError;
use crate::stats::EntityStats;

pub const ENTITY: &str = "bugs";

pub async fn migrate(ctx: &mut MigrationContext) -> Result<EntityStats, MigrateError> {
    let bugs = LegacyRepo::list_bugs(&ctx.legacy)
        .await
        .map_err(MigrateError::read(ENTITY))?;
    let mut stats = EntityStats::with_read(bugs.len());

    for bug in &bugs {
        match BugRepo::find_by_legacy_id(&ctx.target, bug.id).await {
            Ok(Some(existing)) => {
                ctx.resolver.record(EntityKind::Bug, bug.id, existing.id);
                stats.existing += 1;
                continue;
            }
            Ok(None) => {}
            Err(e) => {
                tracing::error!(legacy_id = bug.id, error = %e, "Bug lookup failed");
                stats.failed += 1;
                continue;
            }
        }

        let Some(project_id) = ctx.resolver.resolve(EntityKind::Project, bug.project) else {
            tracing::warn!(legacy_id = bug.id, title = %bug.title, "Bug has no migrated project, skipped");
            stats.skipped += 1;
            continue;
        };

        let creator_id = match ctx.resolver.resolve_by_account(&ctx.legacy, &bug.opened_by).await {
            Ok(id) => id,
            Err(e) => {
                tracing::error!(legacy_id = bug.id, error = %e, "Failed to resolve bug creator");
                stats.failed += 1;
                continue;
            }
        };

        let input = CreateBug {
            legacy_id: Some(bug.id),
            title: bug.title.clone(),
            description: bug.steps.clone(),
            status: BugStatus::from_legacy(&bug.status).as_str().to_string(),
            severity: Severity::from_legacy(bug.severity).as_str().to_string(),
            priority: Priority::from_legacy(bug.pri).as_str().to_string(),
            confirmed: 0,
            project_id,
            requirement_id: ctx.resolver.resolve(EntityKind::Requirement, bug.story),
            module_id: ctx.resolver.resolve(EntityKind::Module, bug.module),
            creator_id,
            solution: bug.resolution.clone(),
            solution_note: bug.resolved_build.clone(),
        };

        let created = match BugRepo::create(&ctx.target, &input).await {
            Ok(created) => created,
            Err(e) => {
                tracing::error!(legacy_id = bug.id, title = %bug.title, error = %e, "Failed to create bug");
                stats.failed += 1;
                continue;
            }
        };
        ctx.resolver.record(EntityKind::Bug, bug.id, created.id);
        stats.created += 1;

        if let Err(e) = attach_assignee(ctx, bug, created.id).await {
            tracing::error!(legacy_id = bug.id, id = created.id, error = %e, "Failed to assign bug");
        }
        tracing::info!(legacy_id = bug.id, id = created.id, project_id, "Migrated bug");
    }

    Ok(stats)
}

async fn attach_assignee(
    ctx: &mut MigrationContext,
    bug: &LegacyBug,
    bug_id: i64,
) -> Result<(), sqlx::Error> {
    if let Some(user_id) = ctx.resolver.resolve_by_account(&ctx.legacy, &bug.assigned_to).await? {
        BugRepo::add_assignee(&ctx.target, bug_id, user_id).await?;
    }
    Ok(())
}
