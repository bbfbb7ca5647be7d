//! One migrator per entity kind.
//!
//! Every migrator has the same shape: read the legacy rows (a failed read
//! is fatal), then for each row map it, look it up by natural key in the
//! target store, insert it if absent and record the correspondence. A
//! failed write is logged and counted; the migrator moves on.

pub mod bug;
pub mod department;
pub mod module;
pub mod project;
pub mod project_member;
pub mod requirement;
pub mod role;
pub mod task;
pub mod user;

use chrono::NaiveDate;
use pmhub_core::types::format_date;

/// A parsed date in the stored `YYYY-MM-DD` form.
pub(crate) fn date_text(date: Option<NaiveDate>) -> Option<String> {
    date.as_ref().map(format_date)
}
