//! Runs the migrators in dependency order and flips the target store out
//! of setup mode once they all finish.

use pmhub_db::repositories::SystemConfigRepo;
use pmhub_db::DbPool;

use crate::context::MigrationContext;
use crate::error::MigrateError;
use crate::migrators::{
    bug, department, module, project, project_member, requirement, role, task, user,
};
use crate::stats::MigrationSummary;

/// Migrate everything from `legacy` into `target`.
///
/// The first fatal error aborts the run, leaving the target partially
/// migrated and still in setup mode. Re-running converges because every
/// write is keyed on a natural key.
pub async fn run(legacy: &DbPool, target: &DbPool) -> Result<MigrationSummary, MigrateError> {
    if SystemConfigRepo::is_initialized(target).await? {
        tracing::warn!("Target store is already initialized; re-running migration");
    }

    let mut ctx = MigrationContext::new(legacy.clone(), target.clone());
    let mut summary = MigrationSummary::default();

    tracing::info!("Migrating departments");
    summary.push(department::ENTITY, department::migrate(&mut ctx).await?);
    tracing::info!("Migrating roles");
    summary.push(role::ENTITY, role::migrate(&mut ctx).await?);
    tracing::info!("Migrating users");
    summary.push(user::ENTITY, user::migrate(&mut ctx).await?);
    tracing::info!("Migrating projects");
    summary.push(project::ENTITY, project::migrate(&mut ctx).await?);
    tracing::info!("Migrating modules");
    summary.push(module::ENTITY, module::migrate(&mut ctx).await?);
    tracing::info!("Migrating requirements");
    summary.push(requirement::ENTITY, requirement::migrate(&mut ctx).await?);
    tracing::info!("Migrating tasks");
    summary.push(task::ENTITY, task::migrate(&mut ctx).await?);
    tracing::info!("Migrating bugs");
    summary.push(bug::ENTITY, bug::migrate(&mut ctx).await?);
    tracing::info!("Migrating project members");
    summary.push(project_member::ENTITY, project_member::migrate(&mut ctx).await?);

    SystemConfigRepo::mark_initialized(target).await?;

    summary.log();
    tracing::info!(failed = summary.total_failed(), "Migration complete, system initialized");
    Ok(summary)
}
