#![allow(dead_code)]

use pmhub_db::models::project::{CreateProject, Project};
use pmhub_db::models::user::{CreateUser, User};
use pmhub_db::repositories::{ProjectRepo, UserRepo};
use pmhub_db::{DbBackend, DbPool};

/// Legacy `zt_*` schema shared with the migration tests.
pub const LEGACY_SCHEMA: &str = include_str!("../fixtures/zentao_schema.sql");

/// A fresh in-memory target store with the schema applied.
pub async fn target_pool() -> DbPool {
    let pool = pmhub_db::create_pool("sqlite::memory:").await.unwrap();
    pmhub_db::run_migrations(&pool, DbBackend::Sqlite).await.unwrap();
    pool
}

/// A fresh in-memory legacy store with the empty `zt_*` tables.
pub async fn legacy_pool() -> DbPool {
    let pool = pmhub_db::create_pool("sqlite::memory:").await.unwrap();
    sqlx::raw_sql(LEGACY_SCHEMA).execute(&pool).await.unwrap();
    pool
}

pub async fn create_user(pool: &DbPool, username: &str, nickname: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            nickname: nickname.to_string(),
            password_hash: "hash".to_string(),
            email: String::new(),
            phone: String::new(),
            avatar: String::new(),
            department_id: None,
            status: 1,
        },
    )
    .await
    .unwrap()
}

pub async fn create_project(pool: &DbPool, name: &str, code: &str) -> Project {
    ProjectRepo::create(
        pool,
        &CreateProject {
            name: name.to_string(),
            code: code.to_string(),
            description: String::new(),
            status: "doing".to_string(),
            start_date: Some("2024-01-01".to_string()),
            end_date: None,
        },
    )
    .await
    .unwrap()
}
