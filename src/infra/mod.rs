//! Infrastructure layer - consumers of the selected backends
//!
//! This module connects to whatever the settings selected:
//! - Database (embedded SQLite or PostgreSQL) via SeaORM
//! - Cache (Redis), production mode only

pub mod cache;
pub mod db;
pub mod probe;

pub use cache::Cache;
pub use db::Database;
pub use probe::Probe;

#[cfg(any(test, feature = "test-utils"))]
pub use probe::MockProbe;
