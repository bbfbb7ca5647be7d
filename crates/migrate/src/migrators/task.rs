//! Tasks.

use chrono::{Days, NaiveDate};
use pmhub_core::id_map::EntityKind;
use pmhub_core::mapping::{days_to_hours, parse_date, Priority, TaskStatus};
use pmhub_core::types::DbId;
use pmhub_db::models::legacy::LegacyTask;
use pmhub_db::models::task::CreateTask;
use pmhub_db::repositories::{LegacyRepo, TaskRepo};

use super::date_text;
use crate::context::MigrationContext;
use crate::error::MigrateError;
use crate::resolver::Resolver;
use crate::stats::EntityStats;

pub const ENTITY: &str = "tasks";

/// The project a task belongs to: its execution when that was migrated,
/// else its project.
pub fn project_for(resolver: &Resolver, execution: i64, project: i64) -> Option<DbId> {
    resolver
        .resolve(EntityKind::Project, execution)
        .or_else(|| resolver.resolve(EntityKind::Project, project))
}

/// The due date when set, otherwise the start date pushed out by the whole
/// days of the estimate.
pub fn end_date(
    start: Option<NaiveDate>,
    due: Option<NaiveDate>,
    estimate_days: f64,
) -> Option<NaiveDate> {
    if due.is_some() {
        return due;
    }
    let start = start?;
    if estimate_days <= 0.0 {
        return None;
    }
    start.checked_add_days(Days::new(estimate_days.floor() as u64))
}

pub async fn migrate(ctx: &mut MigrationContext) -> Result<EntityStats, MigrateError> {
    let tasks = LegacyRepo::list_tasks(&ctx.legacy)
        .await
        .map_err(MigrateError::read(ENTITY))?;
    let mut stats = EntityStats::with_read(tasks.len());

    for task in &tasks {
        match TaskRepo::find_by_legacy_id(&ctx.target, task.id).await {
            Ok(Some(existing)) => {
                ctx.resolver.record(EntityKind::Task, task.id, existing.id);
                stats.existing += 1;
                continue;
            }
            Ok(None) => {}
            Err(e) => {
                tracing::error!(legacy_id = task.id, error = %e, "Task lookup failed");
                stats.failed += 1;
                continue;
            }
        }

        let Some(project_id) = project_for(&ctx.resolver, task.execution, task.project) else {
            tracing::warn!(legacy_id = task.id, name = %task.name, "Task has no migrated project, skipped");
            stats.skipped += 1;
            continue;
        };

        let input = match build(ctx, task, project_id).await {
            Ok(input) => input,
            Err(e) => {
                tracing::error!(legacy_id = task.id, error = %e, "Failed to resolve task people");
                stats.failed += 1;
                continue;
            }
        };

        match TaskRepo::create(&ctx.target, &input).await {
            Ok(created) => {
                ctx.resolver.record(EntityKind::Task, task.id, created.id);
                stats.created += 1;
                tracing::info!(legacy_id = task.id, id = created.id, project_id, "Migrated task");
            }
            Err(e) => {
                tracing::error!(legacy_id = task.id, name = %task.name, error = %e, "Failed to create task");
                stats.failed += 1;
            }
        }
    }

    Ok(stats)
}

async fn build(
    ctx: &mut MigrationContext,
    task: &LegacyTask,
    project_id: DbId,
) -> Result<CreateTask, sqlx::Error> {
    let creator_id = ctx.resolver.resolve_by_account(&ctx.legacy, &task.opened_by).await?;
    let assignee_id = ctx.resolver.resolve_by_account(&ctx.legacy, &task.assigned_to).await?;

    let start = parse_date(&task.est_started);
    let due = parse_date(&task.deadline);

    Ok(CreateTask {
        legacy_id: Some(task.id),
        title: task.name.clone(),
        description: task.description.clone(),
        status: TaskStatus::from_legacy(&task.status).as_str().to_string(),
        priority: Priority::from_legacy(task.pri).as_str().to_string(),
        project_id,
        requirement_id: ctx.resolver.resolve(EntityKind::Requirement, task.story),
        creator_id,
        assignee_id,
        start_date: date_text(start),
        due_date: date_text(due),
        end_date: date_text(end_date(start, due, task.estimate)),
        estimated_hours: days_to_hours(task.estimate),
        actual_hours: days_to_hours(task.consumed),
        progress: 0,
    })
}
