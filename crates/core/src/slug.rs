//! Code-slug generators for target natural keys.
//!
//! A slug is lower-case ASCII in `[a-z0-9_]`. Space, hyphen and dot become
//! underscores; every other character outside the alphabet is dropped.

use crate::types::LegacyId;

/// Fallback role code when the name slugs to nothing (e.g. an all-CJK name).
pub const DEFAULT_ROLE_CODE: &str = "role";

/// Project and module slugs are cut to this many characters before the
/// legacy id suffix is appended.
pub const MAX_SLUG_STEM: usize = 30;

/// Slugify arbitrary text. May return an empty string.
pub fn slugify(input: &str) -> String {
    input
        .to_lowercase()
        .chars()
        .map(|c| match c {
            ' ' | '-' | '.' => '_',
            other => other,
        })
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_')
        .collect()
}

/// Role code: the slugified name, or `role` when nothing survives.
pub fn role_code(name: &str) -> String {
    let slug = slugify(name);
    if slug.is_empty() {
        DEFAULT_ROLE_CODE.to_string()
    } else {
        slug
    }
}

/// Project code: `{slug}_{id}`, or `project_{id}` for names that slug to
/// fewer than two characters.
pub fn project_code(name: &str, legacy_id: LegacyId) -> String {
    scoped_code("project", name, legacy_id)
}

/// Module code, same shape as [`project_code`].
pub fn module_code(name: &str, legacy_id: LegacyId) -> String {
    scoped_code("module", name, legacy_id)
}

/// Department codes ignore the name entirely.
pub fn dept_code(legacy_id: LegacyId) -> String {
    format!("dept_{legacy_id}")
}

fn scoped_code(kind: &str, name: &str, legacy_id: LegacyId) -> String {
    let slug = slugify(name);
    if slug.len() < 2 {
        return format!("{kind}_{legacy_id}");
    }
    // The slug is pure ASCII, so byte truncation is char-safe.
    let stem = &slug[..slug.len().min(MAX_SLUG_STEM)];
    format!("{stem}_{legacy_id}")
}
