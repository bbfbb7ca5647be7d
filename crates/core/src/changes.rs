//! Snapshot diffing for the audit trail.
//!
//! Entities expose their comparable fields through [`Auditable`]; the diff
//! walks the new snapshot in field order, compares stringified values and
//! yields one [`FieldChange`] per differing field. Persisting the changes
//! is the job of the change recorder in the db crate.

use std::collections::HashMap;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Fields whose changes carry no audit meaning.
pub const DENYLIST: &[&str] = &["id", "created_at", "updated_at", "deleted_at"];

pub fn is_denylisted(field: &str) -> bool {
    DENYLIST.contains(&field)
}

// ---------------------------------------------------------------------------
// Values
// ---------------------------------------------------------------------------

/// A field value as seen by the diff.
#[derive(Debug, Clone, PartialEq)]
pub enum AuditValue {
    Text(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    /// An unset nullable reference. Compares as the empty string.
    Null,
    /// Embedded relation payloads and other non-comparable values.
    Nested,
}

impl AuditValue {
    /// Stringify for comparison and storage. `None` means "not comparable".
    pub fn stringify(&self) -> Option<String> {
        match self {
            Self::Text(s) => Some(s.clone()),
            Self::Int(n) => Some(n.to_string()),
            Self::UInt(n) => Some(n.to_string()),
            Self::Float(f) => Some(format!("{f:.2}")),
            Self::Bool(b) => Some(b.to_string()),
            Self::Null => Some(String::new()),
            Self::Nested => None,
        }
    }
}

impl From<String> for AuditValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for AuditValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<&String> for AuditValue {
    fn from(v: &String) -> Self {
        Self::Text(v.clone())
    }
}

impl From<i32> for AuditValue {
    fn from(v: i32) -> Self {
        Self::Int(v.into())
    }
}

impl From<i64> for AuditValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u32> for AuditValue {
    fn from(v: u32) -> Self {
        Self::UInt(v.into())
    }
}

impl From<u64> for AuditValue {
    fn from(v: u64) -> Self {
        Self::UInt(v)
    }
}

impl From<f64> for AuditValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for AuditValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl<T: Into<AuditValue>> From<Option<T>> for AuditValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl From<&serde_json::Value> for AuditValue {
    fn from(v: &serde_json::Value) -> Self {
        use serde_json::Value;
        match v {
            Value::String(s) => Self::Text(s.clone()),
            Value::Bool(b) => Self::Bool(*b),
            Value::Null => Self::Null,
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Self::UInt(u)
                } else {
                    n.as_f64().map_or(Self::Nested, Self::Float)
                }
            }
            Value::Array(_) | Value::Object(_) => Self::Nested,
        }
    }
}

// ---------------------------------------------------------------------------
// Auditable
// ---------------------------------------------------------------------------

/// One named field of a snapshot. `name` is the wire name.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditField {
    pub name: String,
    pub value: AuditValue,
}

impl AuditField {
    pub fn new(name: impl Into<String>, value: impl Into<AuditValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A record whose fields can be compared snapshot to snapshot.
pub trait Auditable {
    /// Fields in declaration order, keyed by wire name.
    fn audit_fields(&self) -> Vec<AuditField>;
}

impl Auditable for serde_json::Map<String, serde_json::Value> {
    fn audit_fields(&self) -> Vec<AuditField> {
        self.iter()
            .map(|(k, v)| AuditField::new(k.as_str(), AuditValue::from(v)))
            .collect()
    }
}

/// Non-object JSON values have no fields.
impl Auditable for serde_json::Value {
    fn audit_fields(&self) -> Vec<AuditField> {
        match self {
            serde_json::Value::Object(map) => map.audit_fields(),
            _ => Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Diff
// ---------------------------------------------------------------------------

/// A single semantic field change with raw stringified values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldChange {
    pub field: String,
    pub old: String,
    pub new: String,
}

impl FieldChange {
    pub fn new(field: impl Into<String>, old: impl Into<String>, new: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            old: old.into(),
            new: new.into(),
        }
    }
}

/// Compare two snapshots field by field.
///
/// Only fields present on both sides are considered. Denylisted fields and
/// non-comparable values are skipped. Output follows the new snapshot's
/// field order.
pub fn diff_snapshots<T: Auditable + ?Sized>(old: &T, new: &T) -> Vec<FieldChange> {
    let old_fields: HashMap<String, AuditValue> = old
        .audit_fields()
        .into_iter()
        .map(|f| (f.name, f.value))
        .collect();

    let mut changes = Vec::new();
    for field in new.audit_fields() {
        if is_denylisted(&field.name) {
            continue;
        }
        let Some(old_value) = old_fields.get(&field.name) else {
            continue;
        };
        let (Some(old_str), Some(new_str)) = (old_value.stringify(), field.value.stringify()) else {
            continue;
        };
        if old_str != new_str {
            changes.push(FieldChange {
                field: field.name,
                old: old_str,
                new: new_str,
            });
        }
    }
    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    // -- stringify tests --

    #[test]
    fn stringify_rules() {
        assert_eq!(AuditValue::from("x").stringify().as_deref(), Some("x"));
        assert_eq!(AuditValue::from(-3i64).stringify().as_deref(), Some("-3"));
        assert_eq!(AuditValue::from(7u32).stringify().as_deref(), Some("7"));
        assert_eq!(AuditValue::from(1.5f64).stringify().as_deref(), Some("1.50"));
        assert_eq!(AuditValue::from(true).stringify().as_deref(), Some("true"));
        assert_eq!(AuditValue::from(None::<i64>).stringify().as_deref(), Some(""));
        assert_eq!(AuditValue::from(Some(4i64)).stringify().as_deref(), Some("4"));
        assert_eq!(AuditValue::Nested.stringify(), None);
    }

    // -- diff tests --

    #[test]
    fn status_change_produces_one_change() {
        let old = json!({"status": "active", "priority": "high", "title": "A"});
        let new = json!({"status": "resolved", "priority": "high", "title": "A"});
        let changes = diff_snapshots(&old, &new);
        assert_eq!(changes, vec![FieldChange::new("status", "active", "resolved")]);
    }

    #[test]
    fn denylisted_fields_are_ignored() {
        let old = json!({"id": 1, "created_at": "2024-01-01", "updated_at": "a", "deleted_at": null, "title": "A"});
        let new = json!({"id": 2, "created_at": "2024-02-02", "updated_at": "b", "deleted_at": "x", "title": "A"});
        assert!(diff_snapshots(&old, &new).is_empty());
    }

    #[test]
    fn fields_missing_on_one_side_are_ignored() {
        let old = json!({"title": "A"});
        let new = json!({"title": "A", "status": "closed"});
        assert!(diff_snapshots(&old, &new).is_empty());
    }

    #[test]
    fn nested_values_are_ignored() {
        let old = json!({"project": {"id": 1}, "tags": [1]});
        let new = json!({"project": {"id": 2}, "tags": [2]});
        assert!(diff_snapshots(&old, &new).is_empty());
    }

    #[test]
    fn null_reference_compares_as_empty() {
        let old = json!({"assignee_id": null});
        let new = json!({"assignee_id": 5});
        assert_eq!(diff_snapshots(&old, &new), vec![FieldChange::new("assignee_id", "", "5")]);
    }

    #[test]
    fn floats_compare_at_two_decimals() {
        let old = json!({"estimated_hours": 1.001});
        let new = json!({"estimated_hours": 1.004});
        assert!(diff_snapshots(&old, &new).is_empty());
    }

    // -- property tests --

    fn comparable_value() -> impl Strategy<Value = serde_json::Value> {
        prop_oneof![
            "[a-z]{0,8}".prop_map(serde_json::Value::from),
            any::<i64>().prop_map(serde_json::Value::from),
            any::<bool>().prop_map(serde_json::Value::from),
        ]
    }

    proptest! {
        #[test]
        fn denylist_only_changes_emit_nothing(
            base in proptest::collection::btree_map("[a-z]{3,6}_f", comparable_value(), 0..6),
            a in comparable_value(),
            b in comparable_value(),
        ) {
            let mut old: serde_json::Map<String, serde_json::Value> = base.clone().into_iter().collect();
            let mut new = old.clone();
            for (i, field) in DENYLIST.iter().enumerate() {
                old.insert((*field).to_string(), if i % 2 == 0 { a.clone() } else { b.clone() });
                new.insert((*field).to_string(), if i % 2 == 0 { b.clone() } else { a.clone() });
            }
            prop_assert!(diff_snapshots(&old, &new).is_empty());
        }

        #[test]
        fn one_change_per_differing_field(
            fields in proptest::collection::btree_map("[a-z]{3,6}_f", ("[a-z]{1,4}", "[a-z]{1,4}"), 1..8),
        ) {
            let old: serde_json::Map<String, serde_json::Value> =
                fields.iter().map(|(k, (o, _))| (k.clone(), json!(o))).collect();
            let new: serde_json::Map<String, serde_json::Value> =
                fields.iter().map(|(k, (_, n))| (k.clone(), json!(n))).collect();
            let expected = fields.values().filter(|(o, n)| o != n).count();
            prop_assert_eq!(diff_snapshots(&old, &new).len(), expected);
        }
    }
}
