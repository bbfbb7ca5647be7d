//! Repository for the `system_configs` table.

use crate::models::system_config::{SystemConfig, INITIALIZED_KEY, VALUE_TYPE_BOOLEAN};
use crate::{now_text, DbPool};

const COLUMNS: &str = "id, config_key, config_value, value_type, created_at, updated_at";

pub struct SystemConfigRepo;

impl SystemConfigRepo {
    pub async fn find_by_key(pool: &DbPool, key: &str) -> Result<Option<SystemConfig>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM system_configs WHERE config_key = ?");
        sqlx::query_as::<_, SystemConfig>(&query)
            .bind(key)
            .fetch_optional(pool)
            .await
    }

    /// Insert or overwrite a setting by key, returning the stored row.
    pub async fn upsert(
        pool: &DbPool,
        key: &str,
        value: &str,
        value_type: &str,
    ) -> Result<SystemConfig, sqlx::Error> {
        let now = now_text();
        let updated = sqlx::query(
            "UPDATE system_configs SET config_value = ?, value_type = ?, updated_at = ?
             WHERE config_key = ?",
        )
        .bind(value)
        .bind(value_type)
        .bind(&now)
        .bind(key)
        .execute(pool)
        .await?;

        if updated.rows_affected() == 0 {
            sqlx::query(
                "INSERT INTO system_configs (config_key, config_value, value_type, created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(key)
            .bind(value)
            .bind(value_type)
            .bind(&now)
            .bind(&now)
            .execute(pool)
            .await?;
        }

        Self::find_by_key(pool, key)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Whether the hub has left setup mode.
    pub async fn is_initialized(pool: &DbPool) -> Result<bool, sqlx::Error> {
        Ok(Self::find_by_key(pool, INITIALIZED_KEY)
            .await?
            .is_some_and(|row| row.config_value == "true"))
    }

    /// Flip the hub into operating mode.
    pub async fn mark_initialized(pool: &DbPool) -> Result<SystemConfig, sqlx::Error> {
        Self::upsert(pool, INITIALIZED_KEY, "true", VALUE_TYPE_BOOLEAN).await
    }
}
