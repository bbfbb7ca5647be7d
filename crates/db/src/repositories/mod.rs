//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&DbPool` as the first argument. Queries use `?` placeholders so
//! they run unchanged on every backend behind the `Any` driver. Inserts
//! read the new id from `last_insert_id()` and re-select the row.

use pmhub_core::types::DbId;
use sqlx::any::AnyQueryResult;

pub mod action_repo;
pub mod bug_repo;
pub mod department_repo;
pub mod legacy_repo;
pub mod module_repo;
pub mod permission_repo;
pub mod project_member_repo;
pub mod project_repo;
pub mod requirement_repo;
pub mod role_repo;
pub mod system_config_repo;
pub mod task_repo;
pub mod user_repo;
pub mod version_repo;

pub use action_repo::ActionRepo;
pub use bug_repo::BugRepo;
pub use department_repo::DepartmentRepo;
pub use legacy_repo::LegacyRepo;
pub use module_repo::ModuleRepo;
pub use permission_repo::PermissionRepo;
pub use project_member_repo::ProjectMemberRepo;
pub use project_repo::ProjectRepo;
pub use requirement_repo::RequirementRepo;
pub use role_repo::RoleRepo;
pub use system_config_repo::SystemConfigRepo;
pub use task_repo::TaskRepo;
pub use user_repo::UserRepo;
pub use version_repo::VersionRepo;

/// Id of the row created by an `INSERT`.
pub(crate) fn inserted_id(result: &AnyQueryResult) -> Result<DbId, sqlx::Error> {
    result.last_insert_id().ok_or(sqlx::Error::RowNotFound)
}
