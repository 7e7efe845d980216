//! Environment variable handling for configuration overrides.
//!
//! This module provides support for DOCFLOW_* environment variables that
//! override configuration file values.

use crate::config::schema::{Config, FailurePolicy};
use crate::error::{Error, Result};
use crate::logging::{LogLevel, LOG_MODE_ENV};
use std::env;

/// Handles environment variable overrides for configuration.
///
/// # Examples
///
/// ```no_run
/// use docflow::config::{Config, EnvironmentConfig};
///
/// let mut config = Config::default();
/// EnvironmentConfig::apply_overrides(&mut config).unwrap();
/// ```
pub struct EnvironmentConfig;

impl EnvironmentConfig {
    /// Apply environment variable overrides to config.
    ///
    /// Reads `DOCFLOW_ROOT`, `DOCFLOW_INPUT`, `DOCFLOW_OUTPUT`,
    /// `DOCFLOW_FAILURE_POLICY`, `DOCFLOW_PARALLEL`,
    /// `DOCFLOW_MAX_PARALLELISM`, `DOCFLOW_MAX_NESTING_DEPTH` and
    /// `DOCFLOW_LOG_MODE`.
    ///
    /// # Errors
    ///
    /// Returns an error if any environment variable value is invalid
    /// (e.g., non-numeric depth, invalid boolean).
    pub fn apply_overrides(config: &mut Config) -> Result<()> {
        if let Ok(root) = env::var("DOCFLOW_ROOT") {
            config.root = Some(root);
        }

        if let Ok(input) = env::var("DOCFLOW_INPUT") {
            config.input = Some(input);
        }

        if let Ok(output) = env::var("DOCFLOW_OUTPUT") {
            config.output = Some(output);
        }

        if let Ok(val) = env::var("DOCFLOW_FAILURE_POLICY") {
            config.failure_policy =
                Some(FailurePolicy::parse(&val).map_err(|message| Error::Validation {
                    field: "DOCFLOW_FAILURE_POLICY".into(),
                    message,
                })?);
        }

        if let Ok(val) = env::var("DOCFLOW_PARALLEL") {
            config.parallel = Some(Self::parse_bool("DOCFLOW_PARALLEL", &val)?);
        }

        if let Ok(val) = env::var("DOCFLOW_MAX_PARALLELISM") {
            config.max_parallelism = Some(Self::parse_usize("DOCFLOW_MAX_PARALLELISM", &val)?);
        }

        if let Ok(val) = env::var("DOCFLOW_MAX_NESTING_DEPTH") {
            config.max_nesting_depth = Some(Self::parse_usize("DOCFLOW_MAX_NESTING_DEPTH", &val)?);
        }

        if let Ok(val) = env::var(LOG_MODE_ENV) {
            LogLevel::parse(&val).map_err(|message| Error::Validation {
                field: LOG_MODE_ENV.into(),
                message,
            })?;
            config.log_mode = Some(val);
        }

        Ok(())
    }

    /// Parse a boolean value from a string.
    ///
    /// Accepts: true/1/yes/on for true, false/0/no/off for false (case-insensitive).
    fn parse_bool(field: &str, s: &str) -> Result<bool> {
        match s.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(Error::Validation {
                field: field.into(),
                message: format!(
                    "Invalid boolean value: '{s}' (expected true/false/1/0/yes/no/on/off)"
                ),
            }),
        }
    }

    fn parse_usize(field: &str, s: &str) -> Result<usize> {
        s.trim().parse().map_err(|_| Error::Validation {
            field: field.into(),
            message: "Must be a non-negative integer".into(),
        })
    }
}
