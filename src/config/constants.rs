//! Application-wide constants
//!
//! Environment variable names and the defaults applied when they are absent.

// =============================================================================
// Core
// =============================================================================

/// Secret key used by the framework for signing
pub const ENV_SECRET_KEY: &str = "DJANGO_SECRET_KEY";

/// Development mode switch
pub const ENV_DEBUG: &str = "DJANGO_DEBUG";

/// Set by CI runners when executing the test suite
pub const ENV_CI: &str = "CI";

// =============================================================================
// Database (PostgreSQL)
// =============================================================================

pub const ENV_POSTGRES_NAME: &str = "POSTGRES_NAME";
pub const ENV_POSTGRES_USER: &str = "POSTGRES_USER";
pub const ENV_POSTGRES_PASSWORD: &str = "POSTGRES_PASSWORD";
pub const ENV_POSTGRES_HOST: &str = "POSTGRES_HOST_NAME";
pub const ENV_POSTGRES_PORT: &str = "POSTGRES_PORT";

/// Default PostgreSQL port
pub const DEFAULT_POSTGRES_PORT: &str = "5432";

/// File name of the embedded database, relative to the base directory
pub const EMBEDDED_DATABASE_FILE: &str = "db.sqlite3";

// =============================================================================
// Cache (Redis)
// =============================================================================

pub const ENV_REDIS_URL: &str = "REDIS_CONNECTION_URL";

/// Default Redis URL (local loopback)
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";

// =============================================================================
// Email (SMTP)
// =============================================================================

pub const ENV_EMAIL_HOST: &str = "EMAIL_HOST";
pub const ENV_EMAIL_PORT: &str = "EMAIL_PORT";
pub const ENV_EMAIL_HOST_USER: &str = "EMAIL_HOST_USER";
pub const ENV_EMAIL_HOST_PASSWORD: &str = "EMAIL_HOST_PASSWORD";
pub const ENV_EMAIL_USE_TLS: &str = "EMAIL_USE_TLS";
pub const ENV_EMAIL_USE_SSL: &str = "EMAIL_USE_SSL";

/// Default SMTP submission port
pub const DEFAULT_EMAIL_PORT: &str = "587";

pub const DEFAULT_EMAIL_USE_TLS: bool = true;
pub const DEFAULT_EMAIL_USE_SSL: bool = false;

/// SMTP transport identifier handed to the framework
pub const EMAIL_BACKEND: &str = "django.core.mail.backends.smtp.EmailBackend";

// =============================================================================
// Binary-level options
// =============================================================================

/// Base directory override for the CLI
pub const ENV_BASE_DIR: &str = "APP_BASE_DIR";

/// Dotenv file override for the CLI
pub const ENV_DOTENV_FILE: &str = "APP_ENV_FILE";

/// Dotenv file name looked up under the base directory
pub const DEFAULT_DOTENV_FILE: &str = ".env";

/// Value substituted for secrets in diagnostic output
pub const REDACTED: &str = "[REDACTED]";
