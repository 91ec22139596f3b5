//! App Settings - Application entry point
//!
//! Resolves settings once, then dispatches to the requested command.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use app_settings::{
    cli::{Cli, Commands},
    commands,
    config::{EnvSource, Settings, DEFAULT_DOTENV_FILE},
    errors::{AppError, AppResult},
};

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize tracing (verbose mode sets debug level)
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        tracing::error!(code = e.code(), "Command failed: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> AppResult<()> {
    let base_dir = match cli.base_dir {
        Some(dir) => dir,
        None => std::env::current_dir()
            .map_err(|e| AppError::internal(format!("Cannot determine base directory: {}", e)))?,
    };
    let env_file = cli
        .env_file
        .unwrap_or_else(|| base_dir.join(DEFAULT_DOTENV_FILE));

    // Resolve settings once; everything below borrows this snapshot
    let env = EnvSource::from_process().with_dotenv_file(&env_file)?;
    let settings = Settings::resolve(&env, &base_dir)?;
    tracing::debug!(base_dir = %base_dir.display(), "Settings resolved");
    tracing::debug!(
        database = settings.database.engine(),
        cache = settings.cache.as_ref().map(|c| c.backend()),
        "Backends selected"
    );

    match cli.command {
        Commands::Show(args) => commands::show::execute(args, &settings),
        Commands::Check => commands::check::execute(&settings),
        Commands::Ping => commands::ping::execute(&settings).await,
    }
}

/// Initialize tracing subscriber. Logs go to stderr so `show` output stays parseable.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        "debug".to_string()
    } else {
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string())
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();
}
