//! Environment configuration helpers
//!
//! All secrets and endpoints come from the environment and are read once
//! at startup into explicit configuration objects; these helpers give the
//! lookups a uniform error shape.

use thiserror::Error;

/// Error raised when a required environment variable is missing or empty
#[derive(Debug, Error)]
#[error("environment variable {name} is not set")]
pub struct EnvError {
    /// Name of the missing variable
    pub name: String,
}

/// Read a required environment variable
///
/// An unset or empty variable is an error; callers treat this as a fatal,
/// user-visible configuration problem.
pub fn require_env(name: &str) -> Result<String, EnvError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(EnvError {
            name: name.to_string(),
        }),
    }
}

/// Read an optional environment variable, treating empty values as unset
pub fn optional_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
}
