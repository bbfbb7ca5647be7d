//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - An update DTO (all `Option` fields) where rows are patched
//!
//! [`legacy`] holds the read-only row shapes of the `zt_*` tables.

pub mod action;
pub mod bug;
pub mod department;
pub mod legacy;
pub mod module;
pub mod project;
pub mod project_member;
pub mod requirement;
pub mod role;
pub mod system_config;
pub mod task;
pub mod user;
pub mod version;
