//! Database connection for the selected backend.

use std::path::Path;

use async_trait::async_trait;
use sea_orm::{ConnectionTrait, Database as SeaDatabase, DatabaseConnection, Statement};
use url::Url;

use super::probe::Probe;
use crate::config::{
    DatabaseConfig, NetworkDatabase, ENV_POSTGRES_HOST, ENV_POSTGRES_NAME, ENV_POSTGRES_PORT,
    ENV_POSTGRES_USER,
};
use crate::errors::{AppError, AppResult};

/// Database wrapper for connection management
#[derive(Clone)]
pub struct Database {
    connection: DatabaseConnection,
}

impl Database {
    /// Connect to the configured database.
    ///
    /// Absent network credentials are rejected here, at first use, rather
    /// than when settings are resolved.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        let url = connection_url(config)?;
        let connection = SeaDatabase::connect(url.as_str()).await?;

        tracing::info!(engine = config.engine(), "Database connected");

        Ok(Self { connection })
    }
}

#[async_trait]
impl Probe for Database {
    fn name(&self) -> &'static str {
        "database"
    }

    /// Check database connectivity by executing a simple query.
    async fn ping(&self) -> AppResult<()> {
        self.connection
            .execute(Statement::from_string(
                self.connection.get_database_backend(),
                "SELECT 1".to_string(),
            ))
            .await?;
        Ok(())
    }
}

/// Build the driver URL for a database configuration.
pub fn connection_url(config: &DatabaseConfig) -> AppResult<String> {
    match config {
        DatabaseConfig::Embedded(db) => embedded_url(&db.path),
        DatabaseConfig::Network(db) => network_url(db),
    }
}

/// The path is percent-encoded so `?`, `#` or `%` in a directory name stay
/// part of the file name instead of starting the query string.
fn embedded_url(path: &Path) -> AppResult<String> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|e| AppError::internal(format!("cannot resolve working directory: {e}")))?
            .join(path)
    };
    let url = Url::from_file_path(&absolute).map_err(|_| {
        AppError::validation(format!("invalid database path: {}", absolute.display()))
    })?;

    Ok(format!("sqlite://{}?mode=rwc", url.path()))
}

fn network_url(db: &NetworkDatabase) -> AppResult<String> {
    let required = |value: &Option<String>, var: &str| {
        value
            .clone()
            .ok_or_else(|| AppError::validation(format!("{var} is not set")))
    };

    let host = required(&db.host, ENV_POSTGRES_HOST)?;
    let user = required(&db.user, ENV_POSTGRES_USER)?;
    let name = required(&db.name, ENV_POSTGRES_NAME)?;
    let port: u16 = db.port.trim().parse().map_err(|_| {
        AppError::validation(format!("{ENV_POSTGRES_PORT} is not a valid port: {:?}", db.port))
    })?;

    let invalid = || AppError::validation(format!("invalid database host: {host:?}"));
    let mut url = Url::parse(&format!("postgres://{host}")).map_err(|_| invalid())?;
    url.set_port(Some(port)).map_err(|_| invalid())?;
    url.set_username(&user).map_err(|_| invalid())?;
    url.set_password(db.password.as_deref()).map_err(|_| invalid())?;
    url.set_path(&name);

    Ok(url.into())
}
