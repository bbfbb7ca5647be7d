//! Row shapes read from the legacy `zt_*` tables.
//!
//! The legacy repository normalises every column on the way out (numbers
//! cast to integers, enums and dates cast to text, NULLs coalesced), so
//! these structs carry no `Option`s.

use pmhub_core::topo::TreeNode;
use pmhub_core::types::LegacyId;
use sqlx::FromRow;

/// `zt_dept`. `parent` is 0 for roots.
#[derive(Debug, Clone, FromRow)]
pub struct LegacyDept {
    pub id: LegacyId,
    pub name: String,
    pub parent: LegacyId,
    pub grade: i64,
    pub sort_order: i64,
}

impl TreeNode for LegacyDept {
    fn node_id(&self) -> LegacyId {
        self.id
    }

    fn parent_id(&self) -> LegacyId {
        self.parent
    }
}

/// `zt_group`: a legacy role.
#[derive(Debug, Clone, FromRow)]
pub struct LegacyGroup {
    pub id: LegacyId,
    pub name: String,
    pub description: String,
}

/// One `zt_grouppriv` grant.
#[derive(Debug, Clone, FromRow)]
pub struct LegacyPrivilege {
    pub module: String,
    pub method: String,
}

/// `zt_user`. `deleted` is the raw `'0'`/`'1'` flag.
#[derive(Debug, Clone, FromRow)]
pub struct LegacyUser {
    pub id: LegacyId,
    pub account: String,
    pub realname: String,
    pub email: String,
    pub mobile: String,
    pub avatar: String,
    pub dept: LegacyId,
    pub role: String,
    pub deleted: String,
}

/// `zt_project` rows of type `project` or `sprint`.
#[derive(Debug, Clone, FromRow)]
pub struct LegacyProject {
    pub id: LegacyId,
    pub name: String,
    pub code: String,
    pub description: String,
    pub begin_date: String,
    pub end_date: String,
    pub status: String,
    pub project_type: String,
}

/// `zt_story`.
#[derive(Debug, Clone, FromRow)]
pub struct LegacyStory {
    pub id: LegacyId,
    pub title: String,
    pub status: String,
    pub pri: i64,
    pub product: LegacyId,
    pub opened_by: String,
    pub assigned_to: String,
    /// Days.
    pub estimate: f64,
}

/// `zt_task`. Estimates are in days.
#[derive(Debug, Clone, FromRow)]
pub struct LegacyTask {
    pub id: LegacyId,
    pub name: String,
    pub description: String,
    pub status: String,
    pub pri: i64,
    pub project: LegacyId,
    pub execution: LegacyId,
    pub story: LegacyId,
    pub opened_by: String,
    pub assigned_to: String,
    pub est_started: String,
    pub deadline: String,
    pub estimate: f64,
    pub consumed: f64,
}

/// `zt_bug`.
#[derive(Debug, Clone, FromRow)]
pub struct LegacyBug {
    pub id: LegacyId,
    pub title: String,
    pub steps: String,
    pub status: String,
    pub severity: i64,
    pub pri: i64,
    pub project: LegacyId,
    pub story: LegacyId,
    pub module: LegacyId,
    pub opened_by: String,
    pub assigned_to: String,
    pub resolution: String,
    pub resolved_build: String,
}

/// `zt_module`.
#[derive(Debug, Clone, FromRow)]
pub struct LegacyModule {
    pub id: LegacyId,
    pub name: String,
    pub root: LegacyId,
    pub module_type: String,
    pub parent: LegacyId,
    pub grade: i64,
}

/// `zt_team`: one member of a project, execution or task team.
#[derive(Debug, Clone, FromRow)]
pub struct LegacyTeamMember {
    pub root: LegacyId,
    pub team_type: String,
    pub account: String,
    pub role: String,
}

/// An `(account, project)` pair inferred from work-item assignees.
#[derive(Debug, Clone, FromRow)]
pub struct LegacyAssignment {
    pub account: String,
    pub project: LegacyId,
}
