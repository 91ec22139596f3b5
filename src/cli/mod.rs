//! CLI module - Command-line interface for the application.
//!
//! Provides commands for:
//! - `show` - Print the resolved settings
//! - `check` - Validate settings eagerly
//! - `ping` - Connect to the selected backends

pub mod args;

pub use args::{Cli, Commands};
