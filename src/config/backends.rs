//! Backend configuration and mode-driven selection.
//!
//! Selection is a pure function of [`ModeFlags`]; nothing here looks at the
//! environment or at runtime state.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use validator::Validate;

use super::constants::{EMBEDDED_DATABASE_FILE, REDACTED};

/// Mode flags derived once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ModeFlags {
    pub debug: bool,
    pub ci: bool,
}

impl ModeFlags {
    pub fn new(debug: bool, ci: bool) -> Self {
        Self { debug, ci }
    }

    /// Debug and CI both run against dependency-free backends.
    pub fn uses_local_backends(&self) -> bool {
        self.debug || self.ci
    }

    /// Label used in the startup log line. CI alone still reports production.
    pub fn label(&self) -> &'static str {
        if self.debug {
            "development"
        } else {
            "production"
        }
    }
}

/// Embedded, file-based database. Needs no network or credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbeddedDatabase {
    pub path: PathBuf,
}

/// Network database populated verbatim from the environment.
///
/// Presence of the fields is not checked at resolution time; an absent
/// value surfaces when a connection is attempted.
#[derive(Clone, PartialEq, Eq, Serialize, Validate)]
pub struct NetworkDatabase {
    #[validate(required(message = "POSTGRES_NAME is not set"))]
    pub name: Option<String>,
    #[validate(required(message = "POSTGRES_USER is not set"))]
    pub user: Option<String>,
    #[serde(skip_serializing)]
    pub password: Option<String>,
    #[validate(required(message = "POSTGRES_HOST_NAME is not set"))]
    pub host: Option<String>,
    pub port: String,
}

impl fmt::Debug for NetworkDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetworkDatabase")
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| REDACTED))
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

/// The single active database backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "engine", rename_all = "snake_case")]
pub enum DatabaseConfig {
    /// SQLite file under the base directory
    Embedded(EmbeddedDatabase),
    /// PostgreSQL server
    Network(NetworkDatabase),
}

impl DatabaseConfig {
    /// Framework engine identifier.
    pub fn engine(&self) -> &'static str {
        match self {
            DatabaseConfig::Embedded(_) => "django.db.backends.sqlite3",
            DatabaseConfig::Network(_) => "django.db.backends.postgresql",
        }
    }

    pub fn is_embedded(&self) -> bool {
        matches!(self, DatabaseConfig::Embedded(_))
    }
}

/// Remote cache backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum CacheConfig {
    Redis { location: String },
}

impl CacheConfig {
    pub fn location(&self) -> &str {
        match self {
            CacheConfig::Redis { location } => location,
        }
    }

    /// Framework backend identifier.
    pub fn backend(&self) -> &'static str {
        match self {
            CacheConfig::Redis { .. } => "django.core.cache.backends.redis.RedisCache",
        }
    }
}

/// Pick the database backend for the given mode.
///
/// `network` is only invoked in production mode, so the embedded path never
/// depends on any database variable.
pub fn select_database<F, E>(
    flags: ModeFlags,
    base_dir: &Path,
    network: F,
) -> Result<DatabaseConfig, E>
where
    F: FnOnce() -> Result<NetworkDatabase, E>,
{
    if flags.uses_local_backends() {
        Ok(DatabaseConfig::Embedded(EmbeddedDatabase {
            path: base_dir.join(EMBEDDED_DATABASE_FILE),
        }))
    } else {
        network().map(DatabaseConfig::Network)
    }
}

/// Pick the cache backend. `None` leaves the framework default in place.
pub fn select_cache<F, E>(flags: ModeFlags, redis_url: F) -> Result<Option<CacheConfig>, E>
where
    F: FnOnce() -> Result<String, E>,
{
    if flags.uses_local_backends() {
        Ok(None)
    } else {
        Ok(Some(CacheConfig::Redis {
            location: redis_url()?,
        }))
    }
}
