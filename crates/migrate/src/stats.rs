//! Per-migrator counters and the run summary.

use serde::Serialize;

/// Outcome counts for one entity kind.
///
/// `created + existing + skipped + failed` equals `read` once the migrator
/// has finished.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EntityStats {
    /// Legacy rows considered.
    pub read: usize,
    /// Target rows inserted.
    pub created: usize,
    /// Rows whose natural key already existed in the target store.
    pub existing: usize,
    /// Rows dropped for a missing prerequisite.
    pub skipped: usize,
    /// Rows whose write failed.
    pub failed: usize,
}

impl EntityStats {
    pub fn with_read(read: usize) -> Self {
        Self {
            read,
            ..Self::default()
        }
    }

    /// Rows that now have a target counterpart.
    pub fn migrated(&self) -> usize {
        self.created + self.existing
    }
}

/// Stats for every migrator that ran, in run order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MigrationSummary {
    pub entities: Vec<(&'static str, EntityStats)>,
}

impl MigrationSummary {
    pub fn push(&mut self, entity: &'static str, stats: EntityStats) {
        self.entities.push((entity, stats));
    }

    pub fn get(&self, entity: &str) -> Option<EntityStats> {
        self.entities
            .iter()
            .find(|(name, _)| *name == entity)
            .map(|(_, stats)| *stats)
    }

    pub fn total_failed(&self) -> usize {
        self.entities.iter().map(|(_, s)| s.failed).sum()
    }

    /// Emit one log line per entity kind.
    pub fn log(&self) {
        for (entity, stats) in &self.entities {
            tracing::info!(
                entity,
                read = stats.read,
                created = stats.created,
                existing = stats.existing,
                skipped = stats.skipped,
                failed = stats.failed,
                "Migration summary",
            );
        }
    }
}
