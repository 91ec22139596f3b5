//! Application configuration module
//!
//! Resolves the runtime settings snapshot from environment variables and
//! holds the constants and component data it is built from.

pub mod backends;
pub mod components;
mod constants;
pub mod env;
mod settings;

pub use backends::{CacheConfig, DatabaseConfig, EmbeddedDatabase, ModeFlags, NetworkDatabase};
pub use constants::*;
pub use env::{EnvError, EnvSource};
pub use settings::{EmailSettings, Settings};
