use pmhub_core::error::CoreError;

/// Fatal migration errors. Per-row failures never surface here; they are
/// logged and counted by the migrator that hit them.
#[derive(Debug, thiserror::Error)]
pub enum MigrateError {
    /// Unreadable or invalid configuration file.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Either store could not be reached.
    #[error("Failed to connect to {store} store: {source}")]
    Connect {
        store: &'static str,
        source: sqlx::Error,
    },

    /// Applying the target schema failed.
    #[error("Schema migration failed: {0}")]
    Schema(#[from] sqlx::migrate::MigrateError),

    /// The top-level read of a migrator's legacy rows failed.
    #[error("Failed to read legacy {entity}: {source}")]
    Read {
        entity: &'static str,
        source: sqlx::Error,
    },

    /// The default password could not be hashed.
    #[error("Password hashing failed: {0}")]
    PasswordHash(CoreError),

    /// Any other store error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl MigrateError {
    pub fn read(entity: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| Self::Read { entity, source }
    }

    pub fn connect(store: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| Self::Connect { store, source }
    }
}
