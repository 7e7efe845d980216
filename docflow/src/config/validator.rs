//! Configuration validation.

use crate::config::schema::Config;
use crate::error::{Error, Result};
use crate::logging::LogLevel;
use crate::path::{NormalizedPath, PathType};

/// Validates configuration values.
///
/// # Examples
///
/// ```
/// use docflow::config::{Config, ConfigValidator};
///
/// ConfigValidator::validate(&Config::default()).unwrap();
///
/// let bad = Config { max_nesting_depth: Some(0), ..Default::default() };
/// assert!(ConfigValidator::validate(&bad).is_err());
/// ```
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a complete configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] naming the first invalid field.
    pub fn validate(config: &Config) -> Result<()> {
        for (field, value) in [
            ("root", &config.root),
            ("input", &config.input),
            ("output", &config.output),
        ] {
            if let Some(literal) = value {
                Self::validate_path(field, literal)?;
            }
        }

        if config.max_nesting_depth == Some(0) {
            return Err(Error::Validation {
                field: "max_nesting_depth".into(),
                message: "Must be greater than 0".into(),
            });
        }

        if let Some(ref mode) = config.log_mode {
            LogLevel::parse(mode).map_err(|message| Error::Validation {
                field: "log_mode".into(),
                message,
            })?;
        }

        if let Some(ref metadata) = config.metadata {
            for key in metadata.keys() {
                Self::validate_key(key)?;
            }
        }

        Ok(())
    }

    /// Checks that a folder literal parses as a directory path.
    fn validate_path(field: &str, literal: &str) -> Result<()> {
        NormalizedPath::parse(PathType::Directory, literal)
            .map(|_| ())
            .map_err(|e| Error::Validation {
                field: field.into(),
                message: e.to_string(),
            })
    }

    fn validate_key(key: &str) -> Result<()> {
        if key.trim().is_empty() {
            return Err(Error::Validation {
                field: "metadata".into(),
                message: "Keys cannot be empty or only whitespace".into(),
            });
        }
        if key.contains('\0') {
            return Err(Error::Validation {
                field: "metadata".into(),
                message: format!("Key '{}' contains a null byte", key.escape_default()),
            });
        }
        Ok(())
    }
}
