//! # Environment Variables
//!
//! Utilities for reading and parsing environment variables.
//!
//! Lookups go through an [`EnvSource`] so configuration loading can be driven
//! by the real process environment ([`ProcessEnv`]) or by a plain map in tests.
//! Empty and whitespace-only values are treated as unset.

use std::collections::HashMap;
use std::env;
use std::str::FromStr;

/// A source of environment-style key/value pairs.
pub trait EnvSource {
    /// Raw value for `name`, if set.
    fn var(&self, name: &str) -> Option<String>;
}

/// The process environment.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        env::var(name).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Get an optional environment variable, ignoring blank values.
pub fn get_env_opt(source: &impl EnvSource, name: &'static str) -> Option<String> {
    source
        .var(name)
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}

/// Get an environment variable by name.
pub fn get_env(source: &impl EnvSource, name: &'static str) -> Result<String, Error> {
    get_env_opt(source, name).ok_or(Error::MissingEnv(name))
}

/// Get an environment variable, falling back to `default` when unset.
pub fn get_env_or(source: &impl EnvSource, name: &'static str, default: &str) -> String {
    get_env_opt(source, name).unwrap_or_else(|| default.to_string())
}

/// Get and parse an environment variable.
pub fn get_env_parse<T: FromStr>(source: &impl EnvSource, name: &'static str) -> Result<T, Error> {
    let val = get_env(source, name)?;
    val.parse::<T>().map_err(|_| Error::WrongFormat(name))
}

// region:    --- Error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    MissingEnv(&'static str),
    WrongFormat(&'static str),
}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::MissingEnv(name) => write!(fmt, "{name} must be set in environment"),
            Error::WrongFormat(name) => write!(fmt, "{name} has an invalid format"),
        }
    }
}

impl std::error::Error for Error {}
// endregion: --- Error

// region:    --- Tests
#[cfg(test)]
mod tests {
    use super::*;

    fn source(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_get_env_missing() {
        let src = source(&[]);
        assert_eq!(get_env(&src, "PORT"), Err(Error::MissingEnv("PORT")));
    }

    #[test]
    fn test_get_env_blank_counts_as_missing() {
        let src = source(&[("PORT", "   ")]);
        assert_eq!(get_env(&src, "PORT"), Err(Error::MissingEnv("PORT")));
        assert_eq!(get_env_opt(&src, "PORT"), None);
    }

    #[test]
    fn test_get_env_trims_value() {
        let src = source(&[("NODE_ENV", " production ")]);
        assert_eq!(get_env(&src, "NODE_ENV").unwrap(), "production");
    }

    #[test]
    fn test_get_env_parse() {
        let src = source(&[("PORT", "8080"), ("BAD", "eighty")]);
        assert_eq!(get_env_parse::<u16>(&src, "PORT").unwrap(), 8080);
        assert_eq!(
            get_env_parse::<u16>(&src, "BAD"),
            Err(Error::WrongFormat("BAD"))
        );
    }

    #[test]
    fn test_get_env_or_default() {
        let src = source(&[]);
        assert_eq!(get_env_or(&src, "NODE_ENV", "development"), "development");
    }

    #[test]
    fn test_error_display_names_variable() {
        assert_eq!(
            Error::MissingEnv("PORT").to_string(),
            "PORT must be set in environment"
        );
    }
}
// endregion: --- Tests
