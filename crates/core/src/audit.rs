//! Audit vocabulary shared by the change recorder and its callers.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Action names
// ---------------------------------------------------------------------------

/// Known action names for audit entries.
pub mod actions {
    pub const CREATED: &str = "created";
    pub const EDITED: &str = "edited";
    pub const ASSIGNED: &str = "assigned";
    pub const RESOLVED: &str = "resolved";
    pub const CLOSED: &str = "closed";
    pub const CONFIRMED: &str = "confirmed";
    pub const COMMENTED: &str = "commented";
}

// ---------------------------------------------------------------------------
// Object type
// ---------------------------------------------------------------------------

/// Kind of object an audit entry is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectType {
    Project,
    Requirement,
    Task,
    Bug,
    User,
    Department,
    Role,
}

impl ObjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Requirement => "requirement",
            Self::Task => "task",
            Self::Bug => "bug",
            Self::User => "user",
            Self::Department => "department",
            Self::Role => "role",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "project" => Some(Self::Project),
            "requirement" => Some(Self::Requirement),
            "task" => Some(Self::Task),
            "bug" => Some(Self::Bug),
            "user" => Some(Self::User),
            "department" => Some(Self::Department),
            "role" => Some(Self::Role),
            _ => None,
        }
    }
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
