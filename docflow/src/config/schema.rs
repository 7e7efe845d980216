//! Configuration schema definitions.
//!
//! This module defines the configuration structure for docflow: folder
//! locations, scheduling behavior and the global seed metadata.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::metadata::MetaValue;

/// Complete configuration structure.
///
/// Every field is optional so that partial files can be layered on top of
/// each other; [`EngineSettings`](crate::config::EngineSettings) applies the
/// defaults.
///
/// # Examples
///
/// ```
/// use docflow::config::{Config, FailurePolicy};
///
/// let config: Config = serde_yaml::from_str(
///     "input: content\nfailure_policy: continue\nmetadata:\n  SiteTitle: Notes\n",
/// )
/// .unwrap();
/// assert_eq!(config.input.as_deref(), Some("content"));
/// assert_eq!(config.failure_policy, Some(FailurePolicy::Continue));
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Root folder path literal.
    pub root: Option<String>,

    /// Input folder path literal, relative to the root unless absolute.
    pub input: Option<String>,

    /// Output folder path literal, relative to the root unless absolute.
    pub output: Option<String>,

    /// What happens to dependents of a failed pipeline.
    pub failure_policy: Option<FailurePolicy>,

    /// Run independent pipelines concurrently.
    pub parallel: Option<bool>,

    /// Worker threads for concurrent pipelines; 0 uses the available parallelism.
    pub max_parallelism: Option<usize>,

    /// Maximum nesting depth of `execute` calls.
    pub max_nesting_depth: Option<usize>,

    /// Trace verbosity: quiet, normal or verbose.
    pub log_mode: Option<String>,

    /// Global metadata seeded into every initial document.
    pub metadata: Option<BTreeMap<String, MetaScalar>>,
}

/// Handling of pipelines whose dependency failed.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Dependents of a failed pipeline are not started.
    #[default]
    BlockDependents,
    /// Dependents run anyway and see the failed pipeline as absent.
    Continue,
}

impl FailurePolicy {
    /// Parses a policy name (`block_dependents` or `continue`, case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns an error if the name is not recognized.
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "block_dependents" | "block" => Ok(Self::BlockDependents),
            "continue" => Ok(Self::Continue),
            _ => Err(format!("invalid failure policy: {s}")),
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BlockDependents => write!(f, "block_dependents"),
            Self::Continue => write!(f, "continue"),
        }
    }
}

/// A scalar metadata value as written in a configuration file.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum MetaScalar {
    /// A boolean.
    Bool(bool),
    /// An integer.
    Integer(i64),
    /// A floating point number.
    Number(f64),
    /// A string.
    Text(String),
}

impl From<&MetaScalar> for MetaValue {
    fn from(value: &MetaScalar) -> Self {
        match value {
            MetaScalar::Bool(b) => Self::Bool(*b),
            MetaScalar::Integer(i) => Self::Integer(*i),
            MetaScalar::Number(n) => Self::Number(*n),
            MetaScalar::Text(s) => Self::Text(s.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_yaml() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_full_yaml() {
        let yaml = r"
root: /site
input: content
output: public
failure_policy: block_dependents
parallel: false
max_parallelism: 4
max_nesting_depth: 16
log_mode: verbose
metadata:
  Title: Notes
  Draft: false
  Order: 3
  Ratio: 0.5
";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.root.as_deref(), Some("/site"));
        assert_eq!(config.output.as_deref(), Some("public"));
        assert_eq!(config.failure_policy, Some(FailurePolicy::BlockDependents));
        assert_eq!(config.parallel, Some(false));
        assert_eq!(config.max_parallelism, Some(4));
        assert_eq!(config.max_nesting_depth, Some(16));
        assert_eq!(config.log_mode.as_deref(), Some("verbose"));

        let metadata = config.metadata.unwrap();
        assert_eq!(metadata["Title"], MetaScalar::Text("Notes".into()));
        assert_eq!(metadata["Draft"], MetaScalar::Bool(false));
        assert_eq!(metadata["Order"], MetaScalar::Integer(3));
        assert_eq!(metadata["Ratio"], MetaScalar::Number(0.5));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<Config, _> = serde_yaml::from_str("ports: 5000\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_failure_policy_parse() {
        assert_eq!(FailurePolicy::parse("continue").unwrap(), FailurePolicy::Continue);
        assert_eq!(
            FailurePolicy::parse("Block-Dependents").unwrap(),
            FailurePolicy::BlockDependents
        );
        assert!(FailurePolicy::parse("skip").is_err());
        assert_eq!(FailurePolicy::Continue.to_string(), "continue");
    }

    #[test]
    fn test_scalar_to_meta_value() {
        assert_eq!(MetaValue::from(&MetaScalar::Integer(2)), MetaValue::Integer(2));
        assert_eq!(
            MetaValue::from(&MetaScalar::Text("x".into())),
            MetaValue::Text("x".into())
        );
    }
}
