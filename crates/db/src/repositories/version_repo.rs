//! Repository for the `versions` table.

use pmhub_core::types::DbId;

use crate::models::version::{CreateVersion, Version};
use crate::repositories::inserted_id;
use crate::{now_text, DbPool};

const COLUMNS: &str = "id, project_id, version_number, description, created_at, updated_at";

pub struct VersionRepo;

impl VersionRepo {
    pub async fn create(pool: &DbPool, input: &CreateVersion) -> Result<Version, sqlx::Error> {
        let now = now_text();
        let result = sqlx::query(
            "INSERT INTO versions (project_id, version_number, description, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(input.project_id)
        .bind(&input.version_number)
        .bind(&input.description)
        .bind(&now)
        .bind(&now)
        .execute(pool)
        .await?;

        let id = inserted_id(&result)?;
        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn find_by_id(pool: &DbPool, id: DbId) -> Result<Option<Version>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM versions WHERE id = ?");
        sqlx::query_as::<_, Version>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
