//! Resolved engine settings.

use crate::config::schema::{Config, FailurePolicy};
use crate::config::validator::ConfigValidator;
use crate::error::Result;
use crate::logging::LogLevel;
use crate::metadata::{MetaValue, Metadata};
use crate::path::{NormalizedPath, PathType};

/// Default root folder.
pub const DEFAULT_ROOT: &str = ".";
/// Default input folder, relative to the root.
pub const DEFAULT_INPUT: &str = "input";
/// Default output folder, relative to the root.
pub const DEFAULT_OUTPUT: &str = "output";
/// Default limit on nested `execute` calls.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 64;

/// The defaulted, parsed settings an engine runs with.
///
/// `input` and `output` are resolved against `root` unless absolute.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    /// Root folder.
    pub root: NormalizedPath,
    /// Input folder.
    pub input: NormalizedPath,
    /// Output folder.
    pub output: NormalizedPath,
    /// Handling of dependents of failed pipelines.
    pub failure_policy: FailurePolicy,
    /// Run independent pipelines concurrently.
    pub parallel: bool,
    /// Worker threads; 0 uses the available parallelism.
    pub max_parallelism: usize,
    /// Maximum nesting depth of `execute` calls.
    pub max_nesting_depth: usize,
    /// Verbosity of the default trace sink.
    pub log_level: LogLevel,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            root: NormalizedPath::relative_normalized(PathType::Directory, DEFAULT_ROOT),
            input: NormalizedPath::relative_normalized(PathType::Directory, DEFAULT_INPUT),
            output: NormalizedPath::relative_normalized(PathType::Directory, DEFAULT_OUTPUT),
            failure_policy: FailurePolicy::default(),
            parallel: true,
            max_parallelism: 0,
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
            log_level: LogLevel::Normal,
        }
    }
}

impl EngineSettings {
    /// Builds settings with the given folders and default behavior.
    ///
    /// # Errors
    ///
    /// Returns an error if a literal is not a valid directory path.
    pub fn from_literals(root: &str, input: &str, output: &str) -> Result<Self> {
        let root = NormalizedPath::parse(PathType::Directory, root)?;
        let input = root.combine(&NormalizedPath::parse(PathType::Directory, input)?)?;
        let output = root.combine(&NormalizedPath::parse(PathType::Directory, output)?)?;
        Ok(Self {
            root,
            input,
            output,
            ..Self::default()
        })
    }

    /// Resolves a merged configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`](crate::Error::Validation) if the
    /// configuration is invalid.
    ///
    /// # Examples
    ///
    /// ```
    /// use docflow::config::{Config, EngineSettings};
    ///
    /// let config = Config {
    ///     root: Some("/site".to_string()),
    ///     output: Some("public".to_string()),
    ///     ..Default::default()
    /// };
    /// let settings = EngineSettings::from_config(&config).unwrap();
    /// assert_eq!(settings.input.full_path(), "/site/input");
    /// assert_eq!(settings.output.full_path(), "/site/public");
    /// ```
    pub fn from_config(config: &Config) -> Result<Self> {
        ConfigValidator::validate(config)?;

        let mut settings = Self::from_literals(
            config.root.as_deref().unwrap_or(DEFAULT_ROOT),
            config.input.as_deref().unwrap_or(DEFAULT_INPUT),
            config.output.as_deref().unwrap_or(DEFAULT_OUTPUT),
        )?;
        if let Some(policy) = config.failure_policy {
            settings.failure_policy = policy;
        }
        if let Some(parallel) = config.parallel {
            settings.parallel = parallel;
        }
        if let Some(max) = config.max_parallelism {
            settings.max_parallelism = max;
        }
        if let Some(depth) = config.max_nesting_depth {
            settings.max_nesting_depth = depth;
        }
        if let Some(level) = config.log_mode.as_deref().and_then(|m| LogLevel::parse(m).ok()) {
            settings.log_level = level;
        }
        Ok(settings)
    }
}

/// Converts configured metadata into a single metadata layer.
#[must_use]
pub fn global_metadata(config: &Config) -> Metadata {
    config.metadata.as_ref().map_or_else(Metadata::new, |entries| {
        Metadata::from_entries(
            entries
                .iter()
                .map(|(key, value)| (key.clone(), MetaValue::from(value))),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::MetaScalar;
    use crate::error::Error;
    use std::collections::BTreeMap;

    #[test]
    fn test_defaults() {
        let settings = EngineSettings::default();
        assert_eq!(settings.root.full_path(), ".");
        assert_eq!(settings.input.full_path(), "input");
        assert_eq!(settings.output.full_path(), "output");
        assert_eq!(settings.failure_policy, FailurePolicy::BlockDependents);
        assert!(settings.parallel);
        assert_eq!(settings.max_parallelism, 0);
        assert_eq!(settings.max_nesting_depth, 64);
        assert_eq!(settings.log_level, LogLevel::Normal);
        assert_eq!(EngineSettings::from_config(&Config::default()).unwrap(), settings);
    }

    #[test]
    fn test_absolute_folders_not_rebased() {
        let config = Config {
            root: Some("/site".into()),
            input: Some("/data/in".into()),
            ..Default::default()
        };
        let settings = EngineSettings::from_config(&config).unwrap();
        assert_eq!(settings.input.full_path(), "/data/in");
        assert_eq!(settings.output.full_path(), "/site/output");
    }

    #[test]
    fn test_overrides_applied() {
        let config = Config {
            failure_policy: Some(FailurePolicy::Continue),
            parallel: Some(false),
            max_parallelism: Some(2),
            max_nesting_depth: Some(5),
            log_mode: Some("quiet".into()),
            ..Default::default()
        };
        let settings = EngineSettings::from_config(&config).unwrap();
        assert_eq!(settings.failure_policy, FailurePolicy::Continue);
        assert!(!settings.parallel);
        assert_eq!(settings.max_parallelism, 2);
        assert_eq!(settings.max_nesting_depth, 5);
        assert_eq!(settings.log_level, LogLevel::Quiet);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = Config {
            max_nesting_depth: Some(0),
            ..Default::default()
        };
        assert!(matches!(
            EngineSettings::from_config(&config),
            Err(Error::Validation { .. })
        ));
    }

    #[test]
    fn test_global_metadata() {
        let config = Config {
            metadata: Some(BTreeMap::from([
                ("B".to_string(), MetaScalar::Integer(2)),
                ("A".to_string(), MetaScalar::Text("x".into())),
            ])),
            ..Default::default()
        };
        let metadata = global_metadata(&config);
        assert_eq!(metadata.keys(), vec!["A", "B"]);
        assert_eq!(metadata.get_integer("B"), Some(2));
        assert!(global_metadata(&Config::default()).is_empty());
    }
}
