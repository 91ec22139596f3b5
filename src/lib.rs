//! App Settings - runtime configuration for the web application
//!
//! Resolves one immutable [`Settings`] snapshot from the process
//! environment at startup. Debug and CI runs select an embedded SQLite
//! database and no cache; production selects PostgreSQL and Redis from
//! `POSTGRES_*` and `REDIS_CONNECTION_URL`.
//!
//! # Layers
//!
//! - **config**: environment casts, backend selection, component data
//! - **infra**: database and cache consumers of the selected backends
//! - **cli** / **commands**: the `app-settings` binary
//! - **errors**: centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Print resolved settings
//! cargo run -- show --pretty
//!
//! # Validate without connecting
//! cargo run -- check
//!
//! # Connect to the selected backends
//! cargo run -- ping
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod errors;
pub mod infra;

// Re-export commonly used types at crate root
pub use config::{CacheConfig, DatabaseConfig, EnvSource, ModeFlags, Settings};
pub use errors::{AppError, AppResult};
