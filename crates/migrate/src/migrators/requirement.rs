//! Requirements, migrated from legacy stories.

use pmhub_core::id_map::EntityKind;
use pmhub_core::mapping::{days_to_hours, Priority, RequirementStatus};
use pmhub_core::types::DbId;
use pmhub_db::models::legacy::LegacyStory;
use pmhub_db::models::requirement::CreateRequirement;
use pmhub_db::repositories::{LegacyRepo, RequirementRepo};

use crate::context::MigrationContext;
use crate::error::MigrateError;
use crate::stats::EntityStats;

pub const ENTITY: &str = "requirements";

pub async fn migrate(ctx: &mut MigrationContext) -> Result<EntityStats, MigrateError> {
    let stories = LegacyRepo::list_stories(&ctx.legacy)
        .await
        .map_err(MigrateError::read(ENTITY))?;
    let mut stats = EntityStats::with_read(stories.len());

    for story in &stories {
        match RequirementRepo::find_by_legacy_id(&ctx.target, story.id).await {
            Ok(Some(existing)) => {
                ctx.resolver.record(EntityKind::Requirement, story.id, existing.id);
                stats.existing += 1;
                continue;
            }
            Ok(None) => {}
            Err(e) => {
                tracing::error!(legacy_id = story.id, error = %e, "Requirement lookup failed");
                stats.failed += 1;
                continue;
            }
        }

        let input = match build(ctx, story).await {
            Ok(Some(input)) => input,
            Ok(None) => {
                tracing::warn!(legacy_id = story.id, title = %story.title, "Requirement has no migrated project, skipped");
                stats.skipped += 1;
                continue;
            }
            Err(e) => {
                tracing::error!(legacy_id = story.id, error = %e, "Failed to read requirement links");
                stats.failed += 1;
                continue;
            }
        };

        match RequirementRepo::create(&ctx.target, &input).await {
            Ok(created) => {
                ctx.resolver.record(EntityKind::Requirement, story.id, created.id);
                stats.created += 1;
                tracing::info!(legacy_id = story.id, id = created.id, project_id = created.project_id, "Migrated requirement");
            }
            Err(e) => {
                tracing::error!(legacy_id = story.id, title = %story.title, error = %e, "Failed to create requirement");
                stats.failed += 1;
            }
        }
    }

    Ok(stats)
}

/// `None` when the story's project cannot be resolved.
async fn build(
    ctx: &mut MigrationContext,
    story: &LegacyStory,
) -> Result<Option<CreateRequirement>, sqlx::Error> {
    let Some(project_id) = resolve_project(ctx, story).await? else {
        return Ok(None);
    };

    let creator_id = ctx.resolver.resolve_by_account(&ctx.legacy, &story.opened_by).await?;
    let assignee_id = ctx.resolver.resolve_by_account(&ctx.legacy, &story.assigned_to).await?;
    let description = LegacyRepo::story_spec(&ctx.legacy, story.id)
        .await?
        .unwrap_or_default();

    Ok(Some(CreateRequirement {
        legacy_id: Some(story.id),
        title: story.title.clone(),
        description,
        status: RequirementStatus::from_legacy(&story.status).as_str().to_string(),
        priority: Priority::from_legacy(story.pri).as_str().to_string(),
        project_id,
        creator_id,
        assignee_id,
        estimated_hours: days_to_hours(story.estimate),
    }))
}

/// First migrated project linked to the story, else the first migrated
/// project linked to its product.
async fn resolve_project(
    ctx: &MigrationContext,
    story: &LegacyStory,
) -> Result<Option<DbId>, sqlx::Error> {
    let direct = LegacyRepo::story_project_ids(&ctx.legacy, story.id).await?;
    if let Some(id) = first_resolved(ctx, &direct) {
        return Ok(Some(id));
    }

    if story.product <= 0 {
        return Ok(None);
    }
    let via_product = LegacyRepo::product_project_ids(&ctx.legacy, story.product).await?;
    Ok(first_resolved(ctx, &via_product))
}

fn first_resolved(ctx: &MigrationContext, legacy_ids: &[i64]) -> Option<DbId> {
    legacy_ids
        .iter()
        .find_map(|&id| ctx.resolver.resolve(EntityKind::Project, id))
}
