//! Declarative framework data.
//!
//! Ordered component lists and account policy handed to the web framework.
//! Nothing here depends on the environment except paths rooted at the base
//! directory.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Serialize;

// =============================================================================
// Component identifiers
// =============================================================================

pub const APP_ALLAUTH_UI: &str = "allauth_ui";
pub const APP_ALLAUTH: &str = "allauth";

pub const MIDDLEWARE_SECURITY: &str = "django.middleware.security.SecurityMiddleware";
pub const MIDDLEWARE_WHITENOISE: &str = "whitenoise.middleware.WhiteNoiseMiddleware";

pub const INSTALLED_APPS: &[&str] = &[
    "django.contrib.admin",
    "django.contrib.auth",
    "django.contrib.contenttypes",
    "django.contrib.sessions",
    "django.contrib.messages",
    "django.contrib.staticfiles",
    // UI theme must load before the account apps it overrides
    APP_ALLAUTH_UI,
    APP_ALLAUTH,
    "allauth.account",
    "slippers",
    "widget_tweaks",
    "landing",
    "cli",
];

pub const MIDDLEWARE: &[&str] = &[
    MIDDLEWARE_SECURITY,
    MIDDLEWARE_WHITENOISE,
    "django.contrib.sessions.middleware.SessionMiddleware",
    "django.middleware.common.CommonMiddleware",
    "django.middleware.csrf.CsrfViewMiddleware",
    "django.contrib.auth.middleware.AuthenticationMiddleware",
    "django.contrib.messages.middleware.MessageMiddleware",
    "django.middleware.clickjacking.XFrameOptionsMiddleware",
    "allauth.account.middleware.AccountMiddleware",
];

pub const AUTHENTICATION_BACKENDS: &[&str] = &[
    // Username login for the admin site
    "django.contrib.auth.backends.ModelBackend",
    "allauth.account.auth_backends.AuthenticationBackend",
];

pub const ALLOWED_HOSTS: &[&str] = &["*"];

pub const ROOT_URLCONF: &str = "app.urls";
pub const WSGI_APPLICATION: &str = "app.wsgi.application";
pub const DEFAULT_AUTO_FIELD: &str = "django.db.models.BigAutoField";

/// Minimum password length enforced by the length validator
pub const MIN_PASSWORD_LENGTH: u32 = 8;

// =============================================================================
// Password validation
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum PasswordValidator {
    UserAttributeSimilarity,
    MinimumLength { min_length: u32 },
    CommonPassword,
    Numeric,
}

impl PasswordValidator {
    /// Framework validator path.
    pub fn path(&self) -> &'static str {
        match self {
            Self::UserAttributeSimilarity => {
                "django.contrib.auth.password_validation.UserAttributeSimilarityValidator"
            }
            Self::MinimumLength { .. } => {
                "django.contrib.auth.password_validation.MinimumLengthValidator"
            }
            Self::CommonPassword => "django.contrib.auth.password_validation.CommonPasswordValidator",
            Self::Numeric => "django.contrib.auth.password_validation.NumericPasswordValidator",
        }
    }
}

pub fn password_validators() -> Vec<PasswordValidator> {
    vec![
        PasswordValidator::UserAttributeSimilarity,
        PasswordValidator::MinimumLength {
            min_length: MIN_PASSWORD_LENGTH,
        },
        PasswordValidator::CommonPassword,
        PasswordValidator::Numeric,
    ]
}

// =============================================================================
// Account policy
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailVerification {
    Mandatory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoginMethod {
    Username,
    Email,
}

/// Signup form field; `required` renders as a trailing `*`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignupField {
    pub name: &'static str,
    pub required: bool,
}

impl SignupField {
    pub const fn required(name: &'static str) -> Self {
        Self {
            name,
            required: true,
        }
    }

    /// Framework notation, e.g. `email*`.
    pub fn spec(&self) -> String {
        if self.required {
            format!("{}*", self.name)
        } else {
            self.name.to_string()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountPolicy {
    pub email_verification: EmailVerification,
    pub signup_fields: Vec<SignupField>,
    pub login_methods: BTreeSet<LoginMethod>,
    pub login_redirect_url: &'static str,
    pub ui_theme: &'static str,
}

impl Default for AccountPolicy {
    fn default() -> Self {
        Self {
            email_verification: EmailVerification::Mandatory,
            signup_fields: vec![
                SignupField::required("username"),
                SignupField::required("email"),
                SignupField::required("password1"),
                SignupField::required("password2"),
            ],
            login_methods: [LoginMethod::Username, LoginMethod::Email]
                .into_iter()
                .collect(),
            login_redirect_url: "/",
            ui_theme: "lofi",
        }
    }
}

// =============================================================================
// Templates, static files, i18n, test reporting
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateSettings {
    pub backend: &'static str,
    pub dirs: Vec<PathBuf>,
    pub app_dirs: bool,
    pub context_processors: Vec<&'static str>,
}

impl TemplateSettings {
    pub fn rooted_at(base_dir: &Path) -> Self {
        Self {
            backend: "django.template.backends.django.DjangoTemplates",
            dirs: vec![base_dir.join("templates")],
            app_dirs: true,
            context_processors: vec![
                "django.template.context_processors.request",
                "django.contrib.auth.context_processors.auth",
                "django.contrib.messages.context_processors.messages",
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaticFiles {
    /// URL prefix static assets are served under
    pub url: &'static str,
    /// Collection target
    pub root: PathBuf,
    /// Extra source directories
    pub dirs: Vec<PathBuf>,
    /// Compressed, hashed-manifest storage
    pub storage_backend: &'static str,
}

impl StaticFiles {
    pub fn rooted_at(base_dir: &Path) -> Self {
        Self {
            url: "static/",
            root: base_dir.join("static"),
            dirs: vec![base_dir.join("staticfiles")],
            storage_backend: "whitenoise.storage.CompressedManifestStaticFilesStorage",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Internationalization {
    pub language_code: &'static str,
    pub time_zone: &'static str,
    pub use_i18n: bool,
    pub use_tz: bool,
}

impl Default for Internationalization {
    fn default() -> Self {
        Self {
            language_code: "en-us",
            time_zone: "UTC",
            use_i18n: true,
            use_tz: true,
        }
    }
}

/// JUnit XML output consumed by the CI server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestReporting {
    pub runner: &'static str,
    pub output_dir: &'static str,
    pub output_file_name: &'static str,
}

impl Default for TestReporting {
    fn default() -> Self {
        Self {
            runner: "xmlrunner.extra.djangotestrunner.XMLTestRunner",
            output_dir: "./test-reports",
            output_file_name: "unittest.xml",
        }
    }
}

// =============================================================================
// Invariants
// =============================================================================

/// Check ordering and policy constraints the framework relies on.
///
/// Returns one message per violation; empty means consistent.
pub fn check_component_invariants(
    installed_apps: &[&str],
    middleware: &[&str],
    account: &AccountPolicy,
) -> Vec<String> {
    let mut issues = Vec::new();

    match (
        position(installed_apps, APP_ALLAUTH_UI),
        position(installed_apps, APP_ALLAUTH),
    ) {
        (Some(ui), Some(core)) if ui > core => {
            issues.push(format!("{APP_ALLAUTH_UI} must be installed before {APP_ALLAUTH}"))
        }
        (Some(_), None) => issues.push(format!("{APP_ALLAUTH_UI} requires {APP_ALLAUTH}")),
        _ => {}
    }

    match (
        position(middleware, MIDDLEWARE_SECURITY),
        position(middleware, MIDDLEWARE_WHITENOISE),
    ) {
        (Some(security), Some(whitenoise)) if whitenoise != security + 1 => issues.push(format!(
            "{MIDDLEWARE_WHITENOISE} must directly follow {MIDDLEWARE_SECURITY}"
        )),
        (None, Some(_)) => issues.push(format!(
            "{MIDDLEWARE_WHITENOISE} requires {MIDDLEWARE_SECURITY}"
        )),
        _ => {}
    }

    if account.email_verification == EmailVerification::Mandatory
        && !account
            .signup_fields
            .iter()
            .any(|f| f.name == "email" && f.required)
    {
        issues.push("mandatory email verification requires a required email signup field".into());
    }

    if account.login_methods.is_empty() {
        issues.push("at least one login method must be enabled".into());
    }

    issues
}

fn position(list: &[&str], item: &str) -> Option<usize> {
    list.iter().position(|x| *x == item)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_components_are_consistent() {
        let issues =
            check_component_invariants(INSTALLED_APPS, MIDDLEWARE, &AccountPolicy::default());
        assert!(issues.is_empty(), "{issues:?}");
    }

    #[test]
    fn test_whitenoise_must_follow_security() {
        let middleware = [
            MIDDLEWARE_SECURITY,
            "django.contrib.sessions.middleware.SessionMiddleware",
            MIDDLEWARE_WHITENOISE,
        ];
        let issues =
            check_component_invariants(INSTALLED_APPS, &middleware, &AccountPolicy::default());
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("directly follow"));
    }

    #[test]
    fn test_ui_theme_must_precede_account_app() {
        let apps = [APP_ALLAUTH, APP_ALLAUTH_UI];
        let issues = check_component_invariants(&apps, MIDDLEWARE, &AccountPolicy::default());
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("before"));
    }

    #[test]
    fn test_mandatory_verification_needs_email_field() {
        let account = AccountPolicy {
            signup_fields: vec![SignupField::required("username")],
            ..AccountPolicy::default()
        };
        let issues = check_component_invariants(INSTALLED_APPS, MIDDLEWARE, &account);
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn test_account_policy_serializes_framework_values() {
        let json = serde_json::to_value(AccountPolicy::default()).unwrap();
        assert_eq!(json["email_verification"], "mandatory");
        assert_eq!(json["login_methods"], serde_json::json!(["username", "email"]));
    }

    #[test]
    fn test_signup_field_notation() {
        let specs: Vec<String> = AccountPolicy::default()
            .signup_fields
            .iter()
            .map(SignupField::spec)
            .collect();
        assert_eq!(specs, ["username*", "email*", "password1*", "password2*"]);
    }

    #[test]
    fn test_password_validators_order() {
        let validators = password_validators();
        assert_eq!(validators.len(), 4);
        assert_eq!(
            validators[1],
            PasswordValidator::MinimumLength { min_length: 8 }
        );
        assert!(validators[3].path().ends_with("NumericPasswordValidator"));
    }

    #[test]
    fn test_paths_are_rooted_at_base_dir() {
        let base = Path::new("/srv/app");
        assert_eq!(
            StaticFiles::rooted_at(base).root,
            PathBuf::from("/srv/app/static")
        );
        assert_eq!(
            TemplateSettings::rooted_at(base).dirs,
            vec![PathBuf::from("/srv/app/templates")]
        );
    }
}
