//! CLI argument definitions.
//!
//! Uses clap derive macros for type-safe argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{ENV_BASE_DIR, ENV_DOTENV_FILE};

/// Resolve and inspect the application's runtime settings
#[derive(Parser, Debug)]
#[command(name = "app-settings")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Base directory for the embedded database, templates and static files
    #[arg(short, long, global = true, env = ENV_BASE_DIR)]
    pub base_dir: Option<PathBuf>,

    /// Dotenv file read underneath the process environment (default: <base-dir>/.env)
    #[arg(short, long, global = true, env = ENV_DOTENV_FILE)]
    pub env_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the resolved settings as JSON (secrets omitted)
    Show(ShowArgs),

    /// Validate settings without connecting to any backend
    Check,

    /// Connect to the selected backends and ping them
    Ping,
}

/// Arguments for the show command
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Pretty-print the JSON output
    #[arg(short, long)]
    pub pretty: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_show_with_global_flags() {
        let cli = Cli::try_parse_from([
            "app-settings",
            "show",
            "--pretty",
            "--base-dir",
            "/srv/app",
            "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.base_dir, Some(PathBuf::from("/srv/app")));
        assert!(matches!(cli.command, Commands::Show(ShowArgs { pretty: true })));
    }

    #[test]
    fn test_subcommand_is_required() {
        assert!(Cli::try_parse_from(["app-settings"]).is_err());
    }
}
