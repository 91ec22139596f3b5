//! Application settings resolved from environment variables.

use std::fmt;
use std::path::{Path, PathBuf};

use redis::IntoConnectionInfo;
use serde::Serialize;
use validator::Validate;

use super::backends::{
    select_cache, select_database, CacheConfig, DatabaseConfig, ModeFlags, NetworkDatabase,
};
use super::components::{
    check_component_invariants, password_validators, AccountPolicy, Internationalization,
    PasswordValidator, StaticFiles, TemplateSettings, TestReporting, ALLOWED_HOSTS,
    AUTHENTICATION_BACKENDS, DEFAULT_AUTO_FIELD, INSTALLED_APPS, MIDDLEWARE, ROOT_URLCONF,
    WSGI_APPLICATION,
};
use super::constants::{
    DEFAULT_EMAIL_PORT, DEFAULT_EMAIL_USE_SSL, DEFAULT_EMAIL_USE_TLS, DEFAULT_POSTGRES_PORT,
    DEFAULT_REDIS_URL, EMAIL_BACKEND, ENV_CI, ENV_DEBUG, ENV_EMAIL_HOST, ENV_EMAIL_HOST_PASSWORD,
    ENV_EMAIL_HOST_USER, ENV_EMAIL_PORT, ENV_EMAIL_USE_SSL, ENV_EMAIL_USE_TLS, ENV_POSTGRES_HOST,
    ENV_POSTGRES_NAME, ENV_POSTGRES_PASSWORD, ENV_POSTGRES_PORT, ENV_POSTGRES_USER, ENV_REDIS_URL,
    ENV_SECRET_KEY, REDACTED,
};
use super::env::{EnvError, EnvSource};

/// Outgoing mail settings consumed by the SMTP transport.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct EmailSettings {
    pub backend: &'static str,
    pub host: Option<String>,
    pub port: String,
    pub host_user: Option<String>,
    #[serde(skip_serializing)]
    pub host_password: Option<String>,
    pub use_tls: bool,
    pub use_ssl: bool,
}

impl fmt::Debug for EmailSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailSettings")
            .field("backend", &self.backend)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("host_user", &self.host_user)
            .field("host_password", &self.host_password.as_ref().map(|_| REDACTED))
            .field("use_tls", &self.use_tls)
            .field("use_ssl", &self.use_ssl)
            .finish()
    }
}

/// Immutable settings snapshot, resolved once per process.
///
/// Construct with [`Settings::resolve`] and pass by reference; there is no
/// way to change a value after resolution.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    pub base_dir: PathBuf,
    #[serde(skip_serializing)]
    pub secret_key: Option<String>,
    pub mode: ModeFlags,
    pub database: DatabaseConfig,
    pub cache: Option<CacheConfig>,
    pub email: EmailSettings,

    pub allowed_hosts: Vec<&'static str>,
    pub installed_apps: Vec<&'static str>,
    pub middleware: Vec<&'static str>,
    pub authentication_backends: Vec<&'static str>,
    pub password_validators: Vec<PasswordValidator>,
    pub account: AccountPolicy,
    pub templates: TemplateSettings,
    pub static_files: StaticFiles,
    pub i18n: Internationalization,
    pub test_reporting: TestReporting,
    pub root_urlconf: &'static str,
    pub wsgi_application: &'static str,
    pub default_auto_field: &'static str,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("base_dir", &self.base_dir)
            .field("secret_key", &self.secret_key.as_ref().map(|_| REDACTED))
            .field("mode", &self.mode)
            .field("database", &self.database)
            .field("cache", &self.cache)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl Settings {
    /// Resolve settings from an environment snapshot.
    ///
    /// Only malformed values fail: a non-boolean flag, or a recognized
    /// variable that is not valid unicode. Absent values become `None` or
    /// their default; missing database credentials are left for the
    /// database layer to reject when it connects.
    pub fn resolve(env: &EnvSource, base_dir: &Path) -> Result<Self, EnvError> {
        let secret_key = env.string(ENV_SECRET_KEY)?;

        let mode = ModeFlags::new(env.boolean(ENV_DEBUG, false)?, env.boolean(ENV_CI, false)?);
        tracing::warn!("Running server in {} mode", mode.label());

        let database = select_database(mode, base_dir, || {
            Ok(NetworkDatabase {
                name: env.string(ENV_POSTGRES_NAME)?,
                user: env.string(ENV_POSTGRES_USER)?,
                password: env.string(ENV_POSTGRES_PASSWORD)?,
                host: env.string(ENV_POSTGRES_HOST)?,
                port: env.string_or(ENV_POSTGRES_PORT, DEFAULT_POSTGRES_PORT)?,
            })
        })?;
        let cache = select_cache(mode, || env.string_or(ENV_REDIS_URL, DEFAULT_REDIS_URL))?;

        let email = EmailSettings {
            backend: EMAIL_BACKEND,
            host: env.string(ENV_EMAIL_HOST)?,
            port: env.string_or(ENV_EMAIL_PORT, DEFAULT_EMAIL_PORT)?,
            host_user: env.string(ENV_EMAIL_HOST_USER)?,
            host_password: env.string(ENV_EMAIL_HOST_PASSWORD)?,
            use_tls: env.boolean(ENV_EMAIL_USE_TLS, DEFAULT_EMAIL_USE_TLS)?,
            use_ssl: env.boolean(ENV_EMAIL_USE_SSL, DEFAULT_EMAIL_USE_SSL)?,
        };

        Ok(Self {
            base_dir: base_dir.to_path_buf(),
            secret_key,
            mode,
            database,
            cache,
            email,
            allowed_hosts: ALLOWED_HOSTS.to_vec(),
            installed_apps: INSTALLED_APPS.to_vec(),
            middleware: MIDDLEWARE.to_vec(),
            authentication_backends: AUTHENTICATION_BACKENDS.to_vec(),
            password_validators: password_validators(),
            account: AccountPolicy::default(),
            templates: TemplateSettings::rooted_at(base_dir),
            static_files: StaticFiles::rooted_at(base_dir),
            i18n: Internationalization::default(),
            test_reporting: TestReporting::default(),
            root_urlconf: ROOT_URLCONF,
            wsgi_application: WSGI_APPLICATION,
            default_auto_field: DEFAULT_AUTO_FIELD,
        })
    }

    pub fn debug_mode(&self) -> bool {
        self.mode.debug
    }

    pub fn ci_mode(&self) -> bool {
        self.mode.ci
    }

    /// Get secret key bytes for signing, if configured.
    pub fn secret_key_bytes(&self) -> Option<&[u8]> {
        self.secret_key.as_deref().map(str::as_bytes)
    }

    /// Ordering and policy constraints of the component data.
    pub fn check_invariants(&self) -> Vec<String> {
        check_component_invariants(&self.installed_apps, &self.middleware, &self.account)
    }

    /// Eager checks for values that would otherwise only fail at first use.
    ///
    /// Does not connect to anything. Returns one message per problem.
    pub fn validate_for_production(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.secret_key.is_none() && !self.mode.debug {
            issues.push(format!("{ENV_SECRET_KEY} is not set"));
        }

        if let DatabaseConfig::Network(db) = &self.database {
            if let Err(errors) = db.validate() {
                let mut messages: Vec<String> = errors
                    .field_errors()
                    .iter()
                    .flat_map(|(field, errs)| {
                        errs.iter().map(move |e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| format!("database {} is invalid", field))
                        })
                    })
                    .collect();
                messages.sort();
                issues.extend(messages);
            }
            if db.port.trim().parse::<u16>().is_err() {
                issues.push(format!("{ENV_POSTGRES_PORT} is not a valid port: {:?}", db.port));
            }
        }

        if let Some(cache) = &self.cache {
            let location = cache.location();
            if location.into_connection_info().is_err() {
                issues.push(format!("{ENV_REDIS_URL} is not a redis URL: {location:?}"));
            }
        }

        if self.email.port.trim().parse::<u16>().is_err() {
            issues.push(format!(
                "{ENV_EMAIL_PORT} is not a valid port: {:?}",
                self.email.port
            ));
        }
        if self.email.use_tls && self.email.use_ssl {
            issues.push(format!(
                "{ENV_EMAIL_USE_TLS} and {ENV_EMAIL_USE_SSL} are mutually exclusive"
            ));
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(pairs: &[(&str, &str)]) -> Settings {
        Settings::resolve(
            &EnvSource::from_map(pairs.iter().copied()),
            Path::new("/srv/app"),
        )
        .unwrap()
    }

    #[test]
    fn test_defaults_select_production_backends() {
        let settings = resolve(&[]);
        assert!(!settings.debug_mode());
        assert!(!settings.ci_mode());
        assert_eq!(
            settings.database,
            DatabaseConfig::Network(NetworkDatabase {
                name: None,
                user: None,
                password: None,
                host: None,
                port: "5432".to_string(),
            })
        );
        assert_eq!(
            settings.cache,
            Some(CacheConfig::Redis {
                location: "redis://127.0.0.1:6379".to_string()
            })
        );
    }

    #[test]
    fn test_email_defaults() {
        let email = resolve(&[]).email;
        assert_eq!(email.host, None);
        assert_eq!(email.port, "587");
        assert!(email.use_tls);
        assert!(!email.use_ssl);
        assert_eq!(email.backend, EMAIL_BACKEND);
    }

    #[test]
    fn test_invalid_email_flag_fails() {
        let result = Settings::resolve(
            &EnvSource::from_map([("EMAIL_USE_SSL", "maybe")]),
            Path::new("."),
        );
        assert!(matches!(
            result,
            Err(EnvError::InvalidBool {
                var: "EMAIL_USE_SSL",
                ..
            })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_unicode_mode_flag_fails_resolution() {
        use std::ffi::{OsStr, OsString};
        use std::os::unix::ffi::OsStrExt;

        let env = EnvSource::from_os_pairs([(
            OsString::from("CI"),
            OsStr::from_bytes(b"tr\xffue").to_os_string(),
        )]);
        assert_eq!(
            Settings::resolve(&env, Path::new(".")),
            Err(EnvError::InvalidUnicode { var: "CI" })
        );
    }

    #[test]
    fn test_secret_key_is_redacted() {
        let settings = resolve(&[("DJANGO_SECRET_KEY", "s3cr3t"), ("DJANGO_DEBUG", "true")]);
        assert_eq!(settings.secret_key_bytes(), Some(&b"s3cr3t"[..]));
        assert!(!format!("{:?}", settings).contains("s3cr3t"));
        assert!(!serde_json::to_string(&settings).unwrap().contains("s3cr3t"));
    }

    #[test]
    fn test_production_validation_flags_missing_values() {
        let issues = resolve(&[]).validate_for_production();
        assert!(issues.iter().any(|i| i.contains("DJANGO_SECRET_KEY")));
        assert!(issues.iter().any(|i| i.contains("POSTGRES_NAME")));
        assert!(issues.iter().any(|i| i.contains("POSTGRES_USER")));
        assert!(issues.iter().any(|i| i.contains("POSTGRES_HOST_NAME")));
    }

    #[test]
    fn test_production_validation_passes_when_complete() {
        let settings = resolve(&[
            ("DJANGO_SECRET_KEY", "key"),
            ("POSTGRES_NAME", "app"),
            ("POSTGRES_USER", "u"),
            ("POSTGRES_HOST_NAME", "db.internal"),
        ]);
        assert_eq!(settings.validate_for_production(), Vec::<String>::new());
    }

    #[test]
    fn test_validation_rejects_bad_ports_and_urls() {
        let settings = resolve(&[
            ("DJANGO_SECRET_KEY", "key"),
            ("POSTGRES_NAME", "app"),
            ("POSTGRES_USER", "u"),
            ("POSTGRES_HOST_NAME", "db"),
            ("POSTGRES_PORT", "abc"),
            ("REDIS_CONNECTION_URL", "http://cache"),
            ("EMAIL_USE_SSL", "true"),
        ]);
        let issues = settings.validate_for_production();
        assert_eq!(issues.len(), 3, "{issues:?}");
    }

    #[test]
    fn test_validation_accepts_any_redis_scheme() {
        let mut locations = vec!["redis://cache:6379/0"];
        if cfg!(unix) {
            locations.extend(["unix:///run/redis.sock", "redis+unix:///run/redis.sock"]);
        }
        for location in locations {
            let settings = resolve(&[
                ("DJANGO_SECRET_KEY", "key"),
                ("POSTGRES_NAME", "app"),
                ("POSTGRES_USER", "u"),
                ("POSTGRES_HOST_NAME", "db"),
                ("REDIS_CONNECTION_URL", location),
                ("EMAIL_USE_TLS", "false"),
            ]);
            assert_eq!(settings.validate_for_production(), Vec::<String>::new(), "{location}");
        }
    }

    #[test]
    fn test_debug_mode_skips_secret_requirement() {
        let issues = resolve(&[("DJANGO_DEBUG", "true")]).validate_for_production();
        assert!(issues.is_empty(), "{issues:?}");
    }
}
