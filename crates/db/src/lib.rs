//! Persistence for the project hub: target-store models and repositories,
//! the read-only legacy (`zt_*`) repository, schema migrations and the
//! audit change recorder.
//!
//! Every store is reached through [`sqlx::AnyPool`] so the same queries
//! serve SQLite and MySQL. Dates and timestamps are stored as text.

use sqlx::any::AnyPoolOptions;

pub mod models;
pub mod recorder;
pub mod repositories;

pub type DbPool = sqlx::AnyPool;

/// Maximum pool size for file- and server-backed stores.
const MAX_CONNECTIONS: u32 = 20;

// ---------------------------------------------------------------------------
// Backend
// ---------------------------------------------------------------------------

/// Supported target-store backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbBackend {
    Sqlite,
    Mysql,
}

impl DbBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Mysql => "mysql",
        }
    }

    /// Parse a configured backend name. Returns `None` for unknown values.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Some(Self::Sqlite),
            "mysql" => Some(Self::Mysql),
            _ => None,
        }
    }

    /// Infer the backend from a connection URL scheme.
    pub fn from_url(url: &str) -> Option<Self> {
        let scheme = url.split(':').next()?;
        match scheme {
            "sqlite" => Some(Self::Sqlite),
            "mysql" | "mariadb" => Some(Self::Mysql),
            _ => None,
        }
    }

    pub const ALL: &'static [&'static str] = &["sqlite", "mysql"];
}

impl std::fmt::Display for DbBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Pool lifecycle
// ---------------------------------------------------------------------------

/// Create a connection pool from a database URL.
///
/// In-memory SQLite databases live and die with a single connection, so
/// those pools are pinned to one connection that is never recycled.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    sqlx::any::install_default_drivers();

    if database_url.contains(":memory:") || database_url.contains("mode=memory") {
        return AnyPoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect(database_url)
            .await;
    }

    AnyPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect(database_url)
        .await
}

/// Verify the store answers a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the target-store schema for the given backend.
pub async fn run_migrations(
    pool: &DbPool,
    backend: DbBackend,
) -> Result<(), sqlx::migrate::MigrateError> {
    match backend {
        DbBackend::Sqlite => sqlx::migrate!("./migrations/sqlite").run(pool).await,
        DbBackend::Mysql => sqlx::migrate!("./migrations/mysql").run(pool).await,
    }
}

/// Current UTC time in the stored timestamp format.
pub fn now_text() -> String {
    pmhub_core::types::format_timestamp(&chrono::Utc::now())
}
