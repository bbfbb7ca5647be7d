//! Projects and sprints. A legacy sprint becomes a project of its own.

use pmhub_core::id_map::EntityKind;
use pmhub_core::mapping::{parse_date, ProjectStatus};
use pmhub_core::slug::project_code;
use pmhub_db::models::legacy::LegacyProject;
use pmhub_db::models::project::CreateProject;
use pmhub_db::repositories::{LegacyRepo, ProjectRepo};

use super::date_text;
use crate::context::MigrationContext;
use crate::error::MigrateError;
use crate::stats::EntityStats;

pub const ENTITY: &str = "projects";

/// The legacy code, or a slug of the name when the legacy row has none.
pub fn code_for(project: &LegacyProject) -> String {
    let code = project.code.trim();
    if code.is_empty() {
        project_code(&project.name, project.id)
    } else {
        code.to_string()
    }
}

pub async fn migrate(ctx: &mut MigrationContext) -> Result<EntityStats, MigrateError> {
    let projects = LegacyRepo::list_projects(&ctx.legacy)
        .await
        .map_err(MigrateError::read(ENTITY))?;
    let mut stats = EntityStats::with_read(projects.len());

    for project in &projects {
        let code = code_for(project);

        match ProjectRepo::find_by_code(&ctx.target, &code).await {
            Ok(Some(existing)) => {
                ctx.resolver.record(EntityKind::Project, project.id, existing.id);
                stats.existing += 1;
                tracing::info!(legacy_id = project.id, id = existing.id, code = %code, "Project already exists");
                continue;
            }
            Ok(None) => {}
            Err(e) => {
                tracing::error!(legacy_id = project.id, error = %e, "Project lookup failed");
                stats.failed += 1;
                continue;
            }
        }

        let input = CreateProject {
            name: project.name.clone(),
            code: code.clone(),
            description: project.description.clone(),
            status: ProjectStatus::from_legacy(&project.status).as_str().to_string(),
            start_date: date_text(parse_date(&project.begin_date)),
            end_date: date_text(parse_date(&project.end_date)),
        };

        match ProjectRepo::create(&ctx.target, &input).await {
            Ok(created) => {
                ctx.resolver.record(EntityKind::Project, project.id, created.id);
                stats.created += 1;
                tracing::info!(
                    legacy_id = project.id,
                    id = created.id,
                    code = %code,
                    kind = %project.project_type,
                    "Migrated project",
                );
            }
            Err(e) => {
                tracing::error!(legacy_id = project.id, name = %project.name, error = %e, "Failed to create project");
                stats.failed += 1;
            }
        }
    }

    Ok(stats)
}
