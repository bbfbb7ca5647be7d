//! Human-readable rendering for audit history rows.
//!
//! The lookups that need the store (user names, project names, ...) live
//! in the db crate's change recorder; this module classifies fields and
//! owns every fixed label table.

use crate::types::DbId;

/// How a field's raw value is turned into a display value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderKind {
    User,
    UserList,
    Project,
    Requirement,
    Module,
    Version,
    Status,
    Priority,
    Severity,
    Solution,
    Confirmed,
    Raw,
}

pub fn render_kind(field: &str) -> RenderKind {
    match field {
        "creator_id" | "assignee_id" => RenderKind::User,
        "assignee_ids" => RenderKind::UserList,
        "project_id" => RenderKind::Project,
        "requirement_id" => RenderKind::Requirement,
        "module_id" => RenderKind::Module,
        "resolved_version_id" => RenderKind::Version,
        "status" => RenderKind::Status,
        "priority" => RenderKind::Priority,
        "severity" => RenderKind::Severity,
        "solution" => RenderKind::Solution,
        "confirmed" => RenderKind::Confirmed,
        _ => RenderKind::Raw,
    }
}

/// Render a value that needs no store lookup. Returns `None` for the
/// lookup kinds.
pub fn render_static(kind: RenderKind, raw: &str) -> Option<String> {
    match kind {
        RenderKind::Status => Some(status_label(raw).to_string()),
        RenderKind::Priority => Some(priority_label(raw).to_string()),
        RenderKind::Severity => Some(severity_label(raw).to_string()),
        RenderKind::Confirmed => Some(confirmed_label(raw).to_string()),
        RenderKind::Solution | RenderKind::Raw => Some(raw.to_string()),
        RenderKind::User
        | RenderKind::UserList
        | RenderKind::Project
        | RenderKind::Requirement
        | RenderKind::Module
        | RenderKind::Version => None,
    }
}

// ---------------------------------------------------------------------------
// Label tables
// ---------------------------------------------------------------------------

/// Status label across every entity vocabulary; unknown codes pass through.
pub fn status_label(raw: &str) -> &str {
    match raw {
        "wait" => "Waiting",
        "doing" => "In Progress",
        "suspended" => "Suspended",
        "done" => "Done",
        "draft" => "Draft",
        "reviewing" => "Reviewing",
        "active" => "Active",
        "changing" => "Changing",
        "pause" => "Paused",
        "cancel" => "Cancelled",
        "resolved" => "Resolved",
        "closed" => "Closed",
        other => other,
    }
}

pub fn priority_label(raw: &str) -> &str {
    match raw {
        "low" => "Low",
        "medium" => "Medium",
        "high" => "High",
        "urgent" => "Urgent",
        other => other,
    }
}

pub fn severity_label(raw: &str) -> &str {
    match raw {
        "low" => "Low",
        "medium" => "Medium",
        "high" => "High",
        "critical" => "Critical",
        other => other,
    }
}

pub fn confirmed_label(raw: &str) -> &'static str {
    match raw {
        "true" | "1" => "Confirmed",
        _ => "Unconfirmed",
    }
}

/// Display name of a field for the audit UI. Unknown fields fall back to
/// the wire name.
pub fn field_display_name(field: &str) -> &str {
    match field {
        "title" => "Bug Title",
        "description" => "Description",
        "status" => "Status",
        "priority" => "Priority",
        "severity" => "Severity",
        "confirmed" => "Confirmed",
        "project_id" => "Project",
        "requirement_id" => "Linked Requirement",
        "module_id" => "Module",
        "assignee_ids" => "Assignees",
        "estimated_hours" => "Estimated Hours",
        "actual_hours" => "Actual Hours",
        "solution" => "Solution",
        "solution_note" => "Solution Note",
        "resolved_version_id" => "Resolved Version",
        "assignee_id" => "Owner",
        "start_date" => "Start Date",
        "end_date" => "End Date",
        "due_date" => "Due Date",
        "progress" => "Progress",
        "dependency_ids" => "Dependencies",
        other => other,
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// `username(nickname)`, or just `username` without a nickname.
pub fn user_label(username: &str, nickname: &str) -> String {
    if nickname.is_empty() {
        username.to_string()
    } else {
        format!("{username}({nickname})")
    }
}

/// Whether a raw reference value means "no reference".
pub fn is_empty_reference(raw: &str) -> bool {
    let raw = raw.trim();
    raw.is_empty() || raw == "0"
}

/// Parse `[1,2,3]` or `1,2,3`. Unparseable items are dropped.
pub fn parse_id_list(raw: &str) -> Vec<DbId> {
    raw.trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split(',')
        .filter_map(|item| item.trim().parse::<DbId>().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_kinds() {
        assert_eq!(render_kind("assignee_id"), RenderKind::User);
        assert_eq!(render_kind("assignee_ids"), RenderKind::UserList);
        assert_eq!(render_kind("resolved_version_id"), RenderKind::Version);
        assert_eq!(render_kind("title"), RenderKind::Raw);
    }

    #[test]
    fn static_rendering() {
        assert_eq!(render_static(RenderKind::Status, "resolved").as_deref(), Some("Resolved"));
        assert_eq!(render_static(RenderKind::Status, "weird").as_deref(), Some("weird"));
        assert_eq!(render_static(RenderKind::Priority, "urgent").as_deref(), Some("Urgent"));
        assert_eq!(render_static(RenderKind::Severity, "critical").as_deref(), Some("Critical"));
        assert_eq!(render_static(RenderKind::Solution, "fixed").as_deref(), Some("fixed"));
        assert_eq!(render_static(RenderKind::Project, "3"), None);
    }

    #[test]
    fn severity_and_priority_share_labels() {
        for raw in ["low", "medium", "high"] {
            assert_eq!(severity_label(raw), priority_label(raw));
        }
        assert_eq!(severity_label("high"), "High");
    }

    #[test]
    fn confirmed_labels() {
        assert_eq!(confirmed_label("true"), "Confirmed");
        assert_eq!(confirmed_label("1"), "Confirmed");
        assert_eq!(confirmed_label("0"), "Unconfirmed");
        assert_eq!(confirmed_label(""), "Unconfirmed");
    }

    #[test]
    fn display_names_cover_the_audit_fields() {
        assert_eq!(field_display_name("title"), "Bug Title");
        assert_eq!(field_display_name("assignee_id"), "Owner");
        assert_eq!(field_display_name("dependency_ids"), "Dependencies");
        assert_eq!(field_display_name("color"), "color");
    }

    #[test]
    fn id_lists() {
        assert_eq!(parse_id_list("[1,2,3]"), vec![1, 2, 3]);
        assert_eq!(parse_id_list("4, 5"), vec![4, 5]);
        assert_eq!(parse_id_list("[]"), Vec::<DbId>::new());
        assert_eq!(parse_id_list("x,7"), vec![7]);
    }

    #[test]
    fn user_labels() {
        assert_eq!(user_label("alice", "Alice Wang"), "alice(Alice Wang)");
        assert_eq!(user_label("bob", ""), "bob");
        assert!(is_empty_reference("0"));
        assert!(is_empty_reference(""));
        assert!(!is_empty_reference("12"));
    }
}
