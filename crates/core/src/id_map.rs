//! Correspondence tables: (entity kind, legacy id) -> target id.
//!
//! Populated once per migrated row and read by every later migrator. The
//! first recorded target id for a key is stable for the rest of the run.

use std::collections::HashMap;

use serde::Serialize;

use crate::types::{DbId, LegacyId};

/// Entity kinds that carry a correspondence table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Department,
    Role,
    User,
    Project,
    Module,
    Requirement,
    Task,
    Bug,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Department => "department",
            Self::Role => "role",
            Self::User => "user",
            Self::Project => "project",
            Self::Module => "module",
            Self::Requirement => "requirement",
            Self::Task => "task",
            Self::Bug => "bug",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default)]
pub struct IdMap {
    tables: HashMap<EntityKind, HashMap<LegacyId, DbId>>,
}

impl IdMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a correspondence. If the key is already present the existing
    /// target id wins; the winning id is returned either way.
    pub fn record(&mut self, kind: EntityKind, legacy_id: LegacyId, target_id: DbId) -> DbId {
        *self
            .tables
            .entry(kind)
            .or_default()
            .entry(legacy_id)
            .or_insert(target_id)
    }

    /// Resolve a legacy id. Zero and negative ids never resolve.
    pub fn resolve(&self, kind: EntityKind, legacy_id: LegacyId) -> Option<DbId> {
        if legacy_id <= 0 {
            return None;
        }
        self.tables.get(&kind)?.get(&legacy_id).copied()
    }

    pub fn len(&self, kind: EntityKind) -> usize {
        self.tables.get(&kind).map_or(0, HashMap::len)
    }

    pub fn is_empty(&self, kind: EntityKind) -> bool {
        self.len(kind) == 0
    }
}
