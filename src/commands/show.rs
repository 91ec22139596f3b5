//! Show command - Prints the resolved settings snapshot.

use crate::cli::args::ShowArgs;
use crate::config::Settings;
use crate::errors::{AppError, AppResult};

/// Execute the show command
pub fn execute(args: ShowArgs, settings: &Settings) -> AppResult<()> {
    println!("{}", render(settings, args.pretty)?);
    Ok(())
}

/// Serialize settings to JSON. Secret fields are never emitted.
pub fn render(settings: &Settings, pretty: bool) -> AppResult<String> {
    let json = if pretty {
        serde_json::to_string_pretty(settings)
    } else {
        serde_json::to_string(settings)
    };
    json.map_err(|e| AppError::internal(format!("Settings serialization error: {}", e)))
}
