//! Identity resolver: legacy ids and account names to target ids.

use std::collections::HashMap;

use pmhub_core::id_map::{EntityKind, IdMap};
use pmhub_core::types::{DbId, LegacyId};
use pmhub_db::repositories::LegacyRepo;
use pmhub_db::DbPool;

/// Correspondence tables for one run plus a cache of account lookups
/// against the legacy `zt_user` table.
#[derive(Debug, Default)]
pub struct Resolver {
    ids: IdMap,
    accounts: HashMap<String, Option<LegacyId>>,
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a correspondence; an existing entry wins. Returns the
    /// target id now on record.
    pub fn record(&mut self, kind: EntityKind, legacy_id: LegacyId, target_id: DbId) -> DbId {
        self.ids.record(kind, legacy_id, target_id)
    }

    pub fn resolve(&self, kind: EntityKind, legacy_id: LegacyId) -> Option<DbId> {
        self.ids.resolve(kind, legacy_id)
    }

    /// Number of correspondences recorded for `kind`.
    pub fn count(&self, kind: EntityKind) -> usize {
        self.ids.len(kind)
    }

    /// Resolve a legacy account name to a target user id.
    ///
    /// Blank accounts, accounts unknown to the legacy store and users that
    /// were never migrated all resolve to `None`.
    pub async fn resolve_by_account(
        &mut self,
        legacy: &DbPool,
        account: &str,
    ) -> Result<Option<DbId>, sqlx::Error> {
        let account = account.trim();
        if account.is_empty() {
            return Ok(None);
        }

        let legacy_id = match self.accounts.get(account) {
            Some(cached) => *cached,
            None => {
                let found = LegacyRepo::user_id_by_account(legacy, account).await?;
                self.accounts.insert(account.to_string(), found);
                found
            }
        };

        Ok(legacy_id.and_then(|id| self.resolve(EntityKind::User, id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_misses_are_none() {
        let mut resolver = Resolver::new();
        resolver.record(EntityKind::Project, 3, 30);
        assert_eq!(resolver.resolve(EntityKind::Project, 3), Some(30));
        assert_eq!(resolver.resolve(EntityKind::Project, 4), None);
        assert_eq!(resolver.count(EntityKind::Project), 1);
    }
}
