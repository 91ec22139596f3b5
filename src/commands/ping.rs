//! Ping command - Connects to the selected backends.
//!
//! This is where values left unchecked at resolution time (credentials,
//! hosts) finally fail.

use crate::config::Settings;
use crate::errors::AppResult;
use crate::infra::{Cache, Database, Probe};

/// Execute the ping command
pub async fn execute(settings: &Settings) -> AppResult<()> {
    let mut probes: Vec<Box<dyn Probe>> = Vec::new();

    probes.push(Box::new(Database::connect(&settings.database).await?));
    match &settings.cache {
        Some(cache) => probes.push(Box::new(Cache::connect(cache).await?)),
        None => tracing::info!("No cache backend configured, skipping"),
    }

    run_probes(&probes).await
}

/// Ping each probe in order, stopping at the first failure.
pub async fn run_probes(probes: &[Box<dyn Probe>]) -> AppResult<()> {
    for probe in probes {
        match probe.ping().await {
            Ok(()) => tracing::info!(backend = probe.name(), "Backend reachable"),
            Err(e) => {
                tracing::error!(backend = probe.name(), "Backend unreachable: {}", e);
                return Err(e);
            }
        }
    }
    Ok(())
}
