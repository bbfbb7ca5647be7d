//! Migration configuration, loaded from a YAML file.
//!
//! ```yaml
//! legacy:
//!   host: 127.0.0.1
//!   port: 3306
//!   user: root
//!   password: secret
//!   database: zentao
//! target:
//!   type: sqlite
//!   dsn: "sqlite://pmhub.db?mode=rwc"
//! ```
//!
//! `legacy.url` may replace the individual connection fields.

use std::path::Path;

use pmhub_db::DbBackend;
use serde::Deserialize;
use url::Url;

use crate::error::MigrateError;

/// Config file read when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "migrate-config.yaml";

const DEFAULT_LEGACY_PORT: u16 = 3306;

#[derive(Debug, Clone, Deserialize)]
pub struct MigrateConfig {
    pub legacy: LegacyConfig,
    pub target: TargetConfig,
}

/// Connection settings for the legacy store.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LegacyConfig {
    /// Full connection URL. Takes precedence over the individual fields.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub host: String,
    #[serde(default = "default_legacy_port")]
    pub port: u16,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub database: String,
}

/// Connection settings for the target store.
#[derive(Debug, Clone, Deserialize)]
pub struct TargetConfig {
    /// `sqlite` or `mysql`.
    #[serde(rename = "type")]
    pub kind: String,
    pub dsn: String,
}

fn default_legacy_port() -> u16 {
    DEFAULT_LEGACY_PORT
}

impl MigrateConfig {
    /// Read, parse and validate a config file.
    pub fn load(path: &Path) -> Result<Self, MigrateError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            MigrateError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_yaml(&raw)
    }

    /// Parse and validate YAML text.
    pub fn from_yaml(raw: &str) -> Result<Self, MigrateError> {
        let config: Self = serde_yaml::from_str(raw)
            .map_err(|e| MigrateError::Config(format!("invalid YAML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot possibly connect.
    pub fn validate(&self) -> Result<(), MigrateError> {
        self.target.backend()?;
        self.target.connection_url()?;
        self.legacy.connection_url()?;
        Ok(())
    }
}

impl LegacyConfig {
    /// The URL to open the legacy store with.
    pub fn connection_url(&self) -> Result<String, MigrateError> {
        if let Some(url) = self.url.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
            return Ok(url.to_string());
        }
        if self.host.trim().is_empty() {
            return Err(MigrateError::Config("legacy.host is required".into()));
        }
        if self.database.trim().is_empty() {
            return Err(MigrateError::Config("legacy.database is required".into()));
        }

        let mut url = Url::parse(&format!(
            "mysql://{}:{}/{}",
            self.host.trim(),
            self.port,
            self.database.trim()
        ))
        .map_err(|e| MigrateError::Config(format!("invalid legacy connection settings: {e}")))?;

        if !self.user.is_empty() {
            url.set_username(&self.user)
                .map_err(|()| MigrateError::Config("legacy.user cannot be set on the URL".into()))?;
            if !self.password.is_empty() {
                url.set_password(Some(&self.password)).map_err(|()| {
                    MigrateError::Config("legacy.password cannot be set on the URL".into())
                })?;
            }
        }
        Ok(url.to_string())
    }
}

impl TargetConfig {
    pub fn backend(&self) -> Result<DbBackend, MigrateError> {
        DbBackend::from_str(&self.kind).ok_or_else(|| {
            MigrateError::Config(format!(
                "unknown target.type '{}' (expected one of: {})",
                self.kind,
                DbBackend::ALL.join(", ")
            ))
        })
    }

    /// The URL to open the target store with. A bare SQLite path is turned
    /// into a create-if-missing URL.
    pub fn connection_url(&self) -> Result<String, MigrateError> {
        let dsn = self.dsn.trim();
        if dsn.is_empty() {
            return Err(MigrateError::Config("target.dsn is required".into()));
        }

        let backend = self.backend()?;
        match DbBackend::from_url(dsn) {
            Some(found) if found == backend => Ok(dsn.to_string()),
            Some(found) => Err(MigrateError::Config(format!(
                "target.dsn is a {found} URL but target.type is {backend}"
            ))),
            None if backend == DbBackend::Sqlite => Ok(format!("sqlite://{dsn}?mode=rwc")),
            None => Err(MigrateError::Config(format!(
                "target.dsn must be a mysql:// URL, got '{dsn}'"
            ))),
        }
    }
}
