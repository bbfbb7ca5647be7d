//! Departments, parents before children.

use std::collections::HashMap;

use pmhub_core::id_map::EntityKind;
use pmhub_core::slug::dept_code;
use pmhub_core::topo::parent_first_order;
use pmhub_core::types::DbId;
use pmhub_db::models::department::CreateDepartment;
use pmhub_db::repositories::{DepartmentRepo, LegacyRepo};

use crate::context::MigrationContext;
use crate::error::MigrateError;
use crate::stats::EntityStats;

pub const ENTITY: &str = "departments";

const ACTIVE: i64 = 1;

pub async fn migrate(ctx: &mut MigrationContext) -> Result<EntityStats, MigrateError> {
    let rows = LegacyRepo::list_depts(&ctx.legacy)
        .await
        .map_err(MigrateError::read(ENTITY))?;
    let mut stats = EntityStats::with_read(rows.len());

    let topo = parent_first_order(&rows);
    for &idx in &topo.unplaced {
        tracing::warn!(
            legacy_id = rows[idx].id,
            parent = rows[idx].parent,
            "Department parent chain is cyclic, migrating as root",
        );
    }

    // Target level of every department seen so far, for child levels.
    let mut levels: HashMap<DbId, i64> = HashMap::new();

    for &idx in &topo.order {
        let dept = &rows[idx];
        let code = dept_code(dept.id);

        let existing = match DepartmentRepo::find_by_code(&ctx.target, &code).await {
            Ok(found) => found,
            Err(e) => {
                tracing::error!(legacy_id = dept.id, error = %e, "Department lookup failed");
                stats.failed += 1;
                continue;
            }
        };
        if let Some(found) = existing {
            ctx.resolver.record(EntityKind::Department, dept.id, found.id);
            levels.insert(found.id, found.level);
            stats.existing += 1;
            continue;
        }

        let cyclic = topo.unplaced.contains(&idx);
        let parent_id = if cyclic {
            None
        } else {
            ctx.resolver.resolve(EntityKind::Department, dept.parent)
        };
        if parent_id.is_none() && dept.parent != 0 && !cyclic {
            tracing::warn!(
                legacy_id = dept.id,
                parent = dept.parent,
                "Department parent was not migrated, migrating as root",
            );
        }
        let level = parent_id
            .and_then(|id| levels.get(&id))
            .map_or(1, |parent_level| parent_level + 1);

        let name = if dept.name.trim().is_empty() {
            code.clone()
        } else {
            dept.name.trim().to_string()
        };
        let input = CreateDepartment {
            name,
            code,
            parent_id,
            level,
            sort: dept.sort_order,
            status: ACTIVE,
        };

        match DepartmentRepo::create(&ctx.target, &input).await {
            Ok(created) => {
                ctx.resolver.record(EntityKind::Department, dept.id, created.id);
                levels.insert(created.id, created.level);
                stats.created += 1;
                tracing::info!(
                    legacy_id = dept.id,
                    id = created.id,
                    code = %created.code,
                    level,
                    "Migrated department",
                );
            }
            Err(e) => {
                tracing::error!(legacy_id = dept.id, error = %e, "Failed to create department");
                stats.failed += 1;
            }
        }
    }

    Ok(stats)
}
