//! System configuration rows (key/value with a declared value type).

use pmhub_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// Key of the flag that moves the hub from setup mode to operating mode.
pub const INITIALIZED_KEY: &str = "initialized";

/// Value type tag for boolean settings.
pub const VALUE_TYPE_BOOLEAN: &str = "boolean";

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SystemConfig {
    pub id: DbId,
    pub config_key: String,
    pub config_value: String,
    pub value_type: String,
    pub created_at: String,
    pub updated_at: String,
}
