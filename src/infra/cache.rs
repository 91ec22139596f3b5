//! Redis cache connection for production mode.

use async_trait::async_trait;
use redis::{aio::ConnectionManager, Client};

use super::probe::Probe;
use crate::config::CacheConfig;
use crate::errors::{AppError, AppResult};

/// Redis cache wrapper with a managed connection.
#[derive(Clone)]
pub struct Cache {
    connection: ConnectionManager,
}

impl Cache {
    /// Connect to the configured cache.
    pub async fn connect(config: &CacheConfig) -> AppResult<Self> {
        let client = Client::open(config.location())?;
        let connection = ConnectionManager::new(client).await?;

        tracing::info!(backend = config.backend(), "Redis cache connected");

        Ok(Self { connection })
    }
}

#[async_trait]
impl Probe for Cache {
    fn name(&self) -> &'static str {
        "cache"
    }

    async fn ping(&self) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let reply: String = redis::cmd("PING").query_async(&mut conn).await?;
        if reply != "PONG" {
            return Err(AppError::internal(format!("unexpected PING reply: {reply}")));
        }
        Ok(())
    }
}
