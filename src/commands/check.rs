//! Check command - Eager validation of the resolved settings.

use crate::config::Settings;
use crate::errors::{AppError, AppResult};

/// Execute the check command
pub fn execute(settings: &Settings) -> AppResult<()> {
    tracing::info!("Checking settings...");

    let issues = collect_issues(settings);
    if issues.is_empty() {
        tracing::info!("Settings are valid");
        return Ok(());
    }

    for issue in &issues {
        tracing::error!("{}", issue);
    }
    Err(AppError::validation(format!(
        "{} settings issue(s): {}",
        issues.len(),
        issues.join("; ")
    )))
}

/// All component and production-readiness issues, components first.
pub fn collect_issues(settings: &Settings) -> Vec<String> {
    let mut issues = settings.check_invariants();
    issues.extend(settings.validate_for_production());
    issues
}
