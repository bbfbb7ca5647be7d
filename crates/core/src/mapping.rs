//! Value mappers translating legacy vocabulary into the target vocabulary.
//!
//! Every mapper here is total: an unrecognised legacy value is coerced to a
//! documented default and never reported as an error. String inputs are
//! matched case-insensitively after trimming.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Target user status for disabled accounts.
pub const USER_STATUS_DISABLED: i32 = 0;

/// Target user status for normal accounts.
pub const USER_STATUS_NORMAL: i32 = 1;

/// Hours in one legacy estimation day.
pub const HOURS_PER_DAY: f64 = 8.0;

/// Date values the legacy store uses to mean "no date".
const ZERO_DATES: &[&str] = &["0000-00-00", "0000-00-00 00:00:00"];

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

// ---------------------------------------------------------------------------
// Project Status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Wait,
    Doing,
    Suspended,
    Closed,
    Done,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wait => "wait",
            Self::Doing => "doing",
            Self::Suspended => "suspended",
            Self::Closed => "closed",
            Self::Done => "done",
        }
    }

    /// Strict parse of a stored value. Returns `None` for unknown values.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "wait" => Some(Self::Wait),
            "doing" => Some(Self::Doing),
            "suspended" => Some(Self::Suspended),
            "closed" => Some(Self::Closed),
            "done" => Some(Self::Done),
            _ => None,
        }
    }

    /// Map a legacy status; anything unknown becomes `wait`.
    pub fn from_legacy(s: &str) -> Self {
        Self::from_str(&normalize(s)).unwrap_or_default()
    }

    pub const ALL: &'static [&'static str] = &["wait", "doing", "suspended", "closed", "done"];
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Requirement Status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementStatus {
    #[default]
    Draft,
    Reviewing,
    Active,
    Changing,
    Closed,
}

impl RequirementStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Reviewing => "reviewing",
            Self::Active => "active",
            Self::Changing => "changing",
            Self::Closed => "closed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(Self::Draft),
            "reviewing" => Some(Self::Reviewing),
            "active" => Some(Self::Active),
            "changing" => Some(Self::Changing),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }

    /// Map a legacy story status; anything unknown becomes `draft`.
    pub fn from_legacy(s: &str) -> Self {
        Self::from_str(&normalize(s)).unwrap_or_default()
    }

    pub const ALL: &'static [&'static str] = &["draft", "reviewing", "active", "changing", "closed"];
}

impl std::fmt::Display for RequirementStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Task Status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Wait,
    Doing,
    Done,
    Pause,
    Cancel,
    Closed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wait => "wait",
            Self::Doing => "doing",
            Self::Done => "done",
            Self::Pause => "pause",
            Self::Cancel => "cancel",
            Self::Closed => "closed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "wait" => Some(Self::Wait),
            "doing" => Some(Self::Doing),
            "done" => Some(Self::Done),
            "pause" => Some(Self::Pause),
            "cancel" => Some(Self::Cancel),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }

    /// Map a legacy task status; anything unknown becomes `wait`.
    pub fn from_legacy(s: &str) -> Self {
        Self::from_str(&normalize(s)).unwrap_or_default()
    }

    pub const ALL: &'static [&'static str] = &["wait", "doing", "done", "pause", "cancel", "closed"];
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Bug Status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BugStatus {
    #[default]
    Active,
    Resolved,
    Closed,
}

impl BugStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "resolved" => Some(Self::Resolved),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }

    /// Map a legacy bug status; anything unknown becomes `active`.
    pub fn from_legacy(s: &str) -> Self {
        Self::from_str(&normalize(s)).unwrap_or_default()
    }

    pub const ALL: &'static [&'static str] = &["active", "resolved", "closed"];
}

impl std::fmt::Display for BugStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Priority / Severity
// ---------------------------------------------------------------------------

/// Work-item priority shared by requirements, tasks and bugs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Urgent,
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Urgent => "urgent",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "urgent" => Some(Self::Urgent),
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }

    /// Legacy priorities run 1 (most urgent) to 4; anything else is `medium`.
    pub fn from_legacy(pri: i64) -> Self {
        match pri {
            1 => Self::Urgent,
            2 => Self::High,
            3 => Self::Medium,
            4 => Self::Low,
            _ => Self::Medium,
        }
    }

    pub const ALL: &'static [&'static str] = &["urgent", "high", "medium", "low"];
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    High,
    #[default]
    Medium,
    Low,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "critical" => Some(Self::Critical),
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }

    /// Legacy severities run 1 (critical) to 4; anything else is `medium`.
    pub fn from_legacy(severity: i64) -> Self {
        match severity {
            1 => Self::Critical,
            2 => Self::High,
            3 => Self::Medium,
            4 => Self::Low,
            _ => Self::Medium,
        }
    }

    pub const ALL: &'static [&'static str] = &["critical", "high", "medium", "low"];
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Project Role
// ---------------------------------------------------------------------------

/// Role of a user inside one project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectRole {
    Owner,
    Member,
    #[default]
    Viewer,
}

const OWNER_ROLE_KEYWORDS: &[&str] = &["经理", "负责人", "owner", "leader", "pm"];
const MEMBER_ROLE_KEYWORDS: &[&str] = &["开发", "测试", "产品", "设计", "developer", "tester", "designer"];

impl ProjectRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Member => "member",
            Self::Viewer => "viewer",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "owner" => Some(Self::Owner),
            "member" => Some(Self::Member),
            "viewer" => Some(Self::Viewer),
            _ => None,
        }
    }

    /// Map a free-text legacy team role by keyword. Owner keywords are
    /// checked before member keywords; no match yields `viewer`.
    pub fn from_legacy(role: &str) -> Self {
        let role = normalize(role);
        if OWNER_ROLE_KEYWORDS.iter().any(|k| role.contains(k)) {
            Self::Owner
        } else if MEMBER_ROLE_KEYWORDS.iter().any(|k| role.contains(k)) {
            Self::Member
        } else {
            Self::Viewer
        }
    }

    pub const ALL: &'static [&'static str] = &["owner", "member", "viewer"];
}

impl std::fmt::Display for ProjectRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Scalar mappers
// ---------------------------------------------------------------------------

/// Legacy `deleted = "1"` disables the account; everything else is normal.
pub fn map_user_status(deleted: &str) -> i32 {
    if deleted.trim() == "1" {
        USER_STATUS_DISABLED
    } else {
        USER_STATUS_NORMAL
    }
}

/// Map a legacy `(module, method)` privilege to a `{resource}:{action}`
/// permission code. Pairs outside the supported set yield `None` and are
/// dropped by the caller.
pub fn map_permission_code(module: &str, method: &str) -> Option<String> {
    let module = normalize(module);
    let method = normalize(method);

    let resource = match module.as_str() {
        "project" => "project",
        "story" => "requirement",
        "task" => "task",
        "bug" => "bug",
        "user" => "user",
        "dept" | "department" => "department",
        _ => return None,
    };

    let action = match method.as_str() {
        "create" => "create",
        "edit" => "update",
        "update" if resource != "requirement" => "update",
        "change" if resource == "requirement" => "update",
        "view" | "index" | "browse" => "read",
        "delete" => "delete",
        "assign" if resource == "bug" => "assign",
        _ => return None,
    };

    Some(format!("{resource}:{action}"))
}

/// Convert a legacy estimate in days to hours. Non-positive (or NaN)
/// estimates are treated as absent.
pub fn days_to_hours(days: f64) -> Option<f64> {
    if days > 0.0 {
        Some(days * HOURS_PER_DAY)
    } else {
        None
    }
}

/// Parse a legacy date/time value.
///
/// Accepts `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DD` (midnight) and RFC 3339
/// (wall-clock time as written). Empty and all-zero values are absent.
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() || ZERO_DATES.contains(&value) {
        return None;
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Some(dt);
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.naive_local())
}

/// Parse a legacy value down to its calendar date.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    parse_datetime(value).map(|dt| dt.date())
}
