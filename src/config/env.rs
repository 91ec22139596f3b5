//! Environment snapshot and typed casts.
//!
//! Values are read once into an owned map so resolution is a pure function
//! of that map. Tests build the map directly instead of touching the
//! process environment.

use std::collections::{BTreeMap, BTreeSet};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised while reading or casting environment values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnvError {
    #[error("{var} must be a boolean (true/false), got {value:?}")]
    InvalidBool { var: &'static str, value: String },

    #[error("{var} must be an integer, got {value:?}")]
    InvalidInt { var: &'static str, value: String },

    #[error("{var} is set but is not valid unicode")]
    InvalidUnicode { var: &'static str },

    #[error("failed to read dotenv file {}: {message}", path.display())]
    DotEnv { path: PathBuf, message: String },
}

/// Immutable view of the variables visible to the resolver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSource {
    vars: BTreeMap<String, String>,
    /// Names present with a value that is not valid unicode
    non_unicode: BTreeSet<String>,
}

impl EnvSource {
    /// Capture the current process environment.
    pub fn from_process() -> Self {
        Self::from_os_pairs(std::env::vars_os())
    }

    /// Build a source from raw OS pairs.
    ///
    /// A value that is not valid unicode is remembered so reading it fails
    /// instead of looking absent. Names that are not valid unicode can never
    /// match a recognized variable and are skipped.
    pub fn from_os_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        let mut source = Self::default();
        for (key, value) in pairs {
            let Ok(key) = key.into_string() else {
                continue;
            };
            match value.into_string() {
                Ok(value) => {
                    source.vars.insert(key, value);
                }
                Err(_) => {
                    source.non_unicode.insert(key);
                }
            }
        }
        source
    }

    /// Build a source from explicit pairs (fixtures, tests).
    pub fn from_map<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            non_unicode: BTreeSet::new(),
        }
    }

    /// Layer a dotenv file underneath the current values.
    ///
    /// Entries from the file only fill names that are not already set.
    /// A missing file is ignored. The process environment is never modified.
    pub fn with_dotenv_file(mut self, path: &Path) -> Result<Self, EnvError> {
        let dotenv_error = |e: dotenvy::Error| EnvError::DotEnv {
            path: path.to_path_buf(),
            message: e.to_string(),
        };

        let iter = match dotenvy::from_path_iter(path) {
            Ok(iter) => iter,
            Err(e) if e.not_found() => {
                tracing::debug!(path = %path.display(), "No dotenv file found");
                return Ok(self);
            }
            Err(e) => return Err(dotenv_error(e)),
        };

        let mut loaded = 0usize;
        for item in iter {
            let (key, value) = item.map_err(dotenv_error)?;
            if !self.vars.contains_key(&key) && !self.non_unicode.contains(&key) {
                self.vars.insert(key, value);
                loaded += 1;
            }
        }

        tracing::debug!(path = %path.display(), loaded, "Dotenv file applied");
        Ok(self)
    }

    /// Raw value, if present.
    pub fn raw(&self, var: &'static str) -> Result<Option<&str>, EnvError> {
        if self.non_unicode.contains(var) {
            return Err(EnvError::InvalidUnicode { var });
        }
        Ok(self.vars.get(var).map(String::as_str))
    }

    /// String cast: passthrough, `None` when absent.
    pub fn string(&self, var: &'static str) -> Result<Option<String>, EnvError> {
        Ok(self.raw(var)?.map(str::to_owned))
    }

    /// String cast with a default for absent values.
    pub fn string_or(&self, var: &'static str, default: &str) -> Result<String, EnvError> {
        Ok(self.raw(var)?.unwrap_or(default).to_owned())
    }

    /// Boolean cast. Accepts `true`/`false` in any case, surrounding
    /// whitespace ignored.
    pub fn boolean(&self, var: &'static str, default: bool) -> Result<bool, EnvError> {
        let Some(raw) = self.raw(var)? else {
            return Ok(default);
        };

        match raw.trim() {
            v if v.eq_ignore_ascii_case("true") => Ok(true),
            v if v.eq_ignore_ascii_case("false") => Ok(false),
            _ => Err(EnvError::InvalidBool {
                var,
                value: raw.to_owned(),
            }),
        }
    }

    /// Integer cast.
    pub fn integer(&self, var: &'static str, default: i64) -> Result<i64, EnvError> {
        let Some(raw) = self.raw(var)? else {
            return Ok(default);
        };

        raw.trim().parse().map_err(|_| EnvError::InvalidInt {
            var,
            value: raw.to_owned(),
        })
    }
}
