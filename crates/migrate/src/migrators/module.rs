//! System-wide modules. Names are unique, so the first legacy module with
//! a given name wins and later namesakes map onto it.

use std::collections::HashMap;

use pmhub_core::id_map::EntityKind;
use pmhub_core::slug::module_code;
use pmhub_core::types::DbId;
use pmhub_db::models::module::CreateModule;
use pmhub_db::repositories::{LegacyRepo, ModuleRepo};

use crate::context::MigrationContext;
use crate::error::MigrateError;
use crate::stats::EntityStats;

pub const ENTITY: &str = "modules";

/// Unlike the other migrators, an unreadable `zt_module` table is not
/// fatal: older legacy installs may not have one.
pub async fn migrate(ctx: &mut MigrationContext) -> Result<EntityStats, MigrateError> {
    let modules = match LegacyRepo::list_modules(&ctx.legacy).await {
        Ok(modules) => modules,
        Err(e) => {
            tracing::warn!(error = %e, "Legacy modules unavailable, skipping");
            return Ok(EntityStats::default());
        }
    };
    let mut stats = EntityStats::with_read(modules.len());

    // Target id per name already handled in this run.
    let mut by_name: HashMap<String, DbId> = HashMap::new();

    for module in &modules {
        let name = module.name.trim();
        if name.is_empty() {
            tracing::debug!(legacy_id = module.id, "Module has no name, skipped");
            stats.skipped += 1;
            continue;
        }

        if let Some(&id) = by_name.get(name) {
            tracing::warn!(legacy_id = module.id, name = %name, id, "Duplicate module name, mapped to first");
            ctx.resolver.record(EntityKind::Module, module.id, id);
            stats.existing += 1;
            continue;
        }

        match ModuleRepo::find_by_name(&ctx.target, name).await {
            Ok(Some(existing)) => {
                ctx.resolver.record(EntityKind::Module, module.id, existing.id);
                by_name.insert(name.to_string(), existing.id);
                stats.existing += 1;
                continue;
            }
            Ok(None) => {}
            Err(e) => {
                tracing::error!(legacy_id = module.id, error = %e, "Module lookup failed");
                stats.failed += 1;
                continue;
            }
        }

        let input = CreateModule {
            name: name.to_string(),
            code: module_code(name, module.id),
            description: format!(
                "Migrated from legacy module {} ({})",
                module.id, module.module_type
            ),
        };
        match ModuleRepo::create(&ctx.target, &input).await {
            Ok(created) => {
                ctx.resolver.record(EntityKind::Module, module.id, created.id);
                by_name.insert(name.to_string(), created.id);
                stats.created += 1;
                tracing::info!(legacy_id = module.id, id = created.id, code = %created.code, "Migrated module");
            }
            Err(e) => {
                tracing::error!(legacy_id = module.id, name = %name, error = %e, "Failed to create module");
                stats.failed += 1;
            }
        }
    }

    Ok(stats)
}
