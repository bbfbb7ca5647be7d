use chrono::NaiveDate;

/// All target-store primary keys are 64-bit integers.
pub type DbId = i64;

/// Primary keys in the legacy store. Zero means "no reference".
pub type LegacyId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Storage format for timestamp columns (stored as text on every backend).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Storage format for date-only columns.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Render a timestamp in the storage format.
pub fn format_timestamp(ts: &Timestamp) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Render a date in the storage format.
pub fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
