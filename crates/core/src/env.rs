//! Environment variable helpers shared by the server and CLI configs.

use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Shortest accepted session secret.
pub const MIN_SECRET_LENGTH: usize = 32;

/// Lowest accepted Shannon entropy for a secret, in bits per character.
pub const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Substrings that mark a secret as copied from a template (case-insensitive).
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Generic variable set by `fly postgres attach`.
const SHARED_DATABASE_URL: &str = "DATABASE_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

impl ConfigError {
    fn invalid(key: &str, reason: impl Display) -> Self {
        Self::InvalidEnvVar(key.to_owned(), reason.to_string())
    }
}

pub fn optional(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// # Errors
///
/// [`ConfigError::MissingEnvVar`] when unset.
pub fn required(key: &str) -> Result<String, ConfigError> {
    optional(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_owned()))
}

#[must_use]
pub fn or_default(key: &str, default: &str) -> String {
    optional(key).unwrap_or_else(|| default.to_owned())
}

/// Parse `key`, or `default` when unset.
///
/// # Errors
///
/// [`ConfigError::InvalidEnvVar`] when the value does not parse.
pub fn parsed<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    or_default(key, default)
        .parse()
        .map_err(|e| ConfigError::invalid(key, e))
}

/// A sampling rate in `0.0..=1.0`.
///
/// # Errors
///
/// [`ConfigError::InvalidEnvVar`] outside that range.
pub fn rate(key: &str, default: f32) -> Result<f32, ConfigError> {
    let Some(raw) = optional(key) else {
        return Ok(default);
    };
    raw.parse::<f32>()
        .ok()
        .filter(|rate| (0.0..=1.0).contains(rate))
        .ok_or_else(|| ConfigError::invalid(key, "must be between 0.0 and 1.0"))
}

/// The first of `keys` that is set, then `DATABASE_URL`.
///
/// # Errors
///
/// [`ConfigError::MissingEnvVar`] naming the first key when none is set.
pub fn database_url(keys: &[&str]) -> Result<SecretString, ConfigError> {
    keys.iter()
        .copied()
        .chain(std::iter::once(SHARED_DATABASE_URL))
        .find_map(optional)
        .map(SecretString::from)
        .ok_or_else(|| {
            let primary = keys.first().copied().unwrap_or(SHARED_DATABASE_URL);
            ConfigError::MissingEnvVar(primary.to_owned())
        })
}

/// A required absolute http(s) URL, returned without a trailing slash.
///
/// # Errors
///
/// Missing, unparsable or non-http URLs.
pub fn base_url(key: &str) -> Result<String, ConfigError> {
    let raw = required(key)?;
    let url = Url::parse(&raw).map_err(|e| ConfigError::invalid(key, e))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::invalid(key, "must be an http or https URL"));
    }
    Ok(raw.trim_end_matches('/').to_owned())
}

/// A required session secret that is long, random-looking and not a
/// template placeholder.
///
/// # Errors
///
/// [`ConfigError::InsecureSecret`] when any check fails.
pub fn session_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = required(key)?;
    check_secret(&value).map_err(|reason| ConfigError::InsecureSecret(key.to_owned(), reason))?;
    Ok(SecretString::from(value))
}

fn check_secret(value: &str) -> Result<(), String> {
    if value.len() < MIN_SECRET_LENGTH {
        return Err(format!(
            "must be at least {MIN_SECRET_LENGTH} characters (got {})",
            value.len()
        ));
    }

    let lower = value.to_lowercase();
    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(**p)) {
        return Err(format!("appears to be a placeholder (contains '{pattern}')"));
    }

    let entropy = shannon_entropy(value);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(format!(
            "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
        ));
    }
    Ok(())
}

/// Shannon entropy in bits per character.
#[must_use]
pub fn shannon_entropy(s: &str) -> f64 {
    let mut counts: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *counts.entry(c).or_default() += 1;
    }

    #[allow(clippy::cast_precision_loss)]
    let len = s.chars().count() as f64;
    counts
        .values()
        .map(|&n| {
            #[allow(clippy::cast_precision_loss)]
            let p = n as f64 / len;
            -p * p.log2()
        })
        .sum()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_shannon_entropy() {
        assert!(shannon_entropy("").abs() < f64::EPSILON);
        assert!((shannon_entropy("abcd") - 2.0).abs() < 0.01);
        assert!((shannon_entropy("aabb") - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_check_secret_length() {
        let err = check_secret("Zq8#vN2!").unwrap_err();
        assert!(err.contains("at least 32"));
    }

    #[test]
    fn test_check_secret_placeholder() {
        let err = check_secret("changeme-changeme-changeme-changeme").unwrap_err();
        assert!(err.contains("placeholder"));
    }

    #[test]
    fn test_check_secret_low_entropy() {
        let err = check_secret(&"ab".repeat(20)).unwrap_err();
        assert!(err.contains("entropy"));
    }

    #[test]
    fn test_check_secret_accepts_random_value() {
        assert!(check_secret("Zq8#vN2!kR5@wM9$tB3%hJ6&cL1*fG4^").is_ok());
    }
}
