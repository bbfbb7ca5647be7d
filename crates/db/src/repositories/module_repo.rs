//! Repository for the `modules` table.

use pmhub_core::types::DbId;

use crate::models::module::{CreateModule, Module};
use crate::repositories::inserted_id;
use crate::{now_text, DbPool};

const COLUMNS: &str = "id, name, code, description, created_at, updated_at";

pub struct ModuleRepo;

impl ModuleRepo {
    pub async fn create(pool: &DbPool, input: &CreateModule) -> Result<Module, sqlx::Error> {
        let now = now_text();
        let result = sqlx::query(
            "INSERT INTO modules (name, code, description, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&input.name)
        .bind(&input.code)
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

    pub async fn find_by_id(pool: &DbPool, id: DbId) -> Result<Option<Module>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM modules WHERE id = ?");
        sqlx::query_as::<_, Module>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a module by its unique name.
    pub async fn find_by_name(pool: &DbPool, name: &str) -> Result<Option<Module>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM modules WHERE name = ?");
        sqlx::query_as::<_, Module>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }
}
